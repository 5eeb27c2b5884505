use std::path::{Path, PathBuf};

use epimap_core_rs::{Collapse, Matrix};
use epimap_epitope_rs::annotation::AnnotationRow;
use epimap_epitope_rs::enrichment::{EventTable, SubtypeTable};
use epimap_epitope_rs::{
    aggregate_into, tabulate, taxa_to_epitopes, EpitopeMap, Normalizer, TabulateConfig,
};
use epimap_io_rs::matrix::TsvSink;
use epimap_io_rs::{gmt, matrix, tsv, WriteRecord};
use eyre::{ensure, eyre, Result};
use itertools::Itertools;

pub fn get_resource_path(resource: impl AsRef<Path>) -> Result<PathBuf> {
    let resource = resource.as_ref();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|x| x.join("resources"))
        .map(|x| x.join(resource))
        .ok_or_else(|| {
            eyre!(
                "Failed to locate requested resource: {}",
                resource.display()
            )
        })?;
    ensure!(
        path.exists(),
        "Requested resource does not exist: {}",
        path.display()
    );
    Ok(path)
}

fn load_map() -> Result<EpitopeMap> {
    let metadata = tsv::read_table(get_resource_path("metadata.tsv")?)?;
    EpitopeMap::from_table(&metadata, Collapse::Viral)
}

#[test]
fn epitope_map() -> Result<()> {
    let map = load_map()?;
    assert_eq!(
        map.identities().collect_vec(),
        ["11320_1_3", "11320_2_5", "11520_7_3", "TW_004"]
    );

    let entry = map
        .get("11320_1_3")
        .ok_or_else(|| eyre!("Missing epitope"))?;
    assert_eq!(entry.code_names(), &["TW_001", "TW_002"]);
    assert_eq!(entry.subtypes(), &["H1N1", "H3N2"]);
    assert_eq!(
        map.get("11520_7_3").map(|x| x.subtypes().clone()),
        Some(vec!["subtypeNA".to_owned()])
    );
    assert_eq!(map.get("TW_004").map(|x| x.category().as_str()), Some("Bacterial"));

    // The map survives a round trip through a gzipped TSV file
    let path = std::env::temp_dir().join("epimap-regression-map.tsv.gz");
    tsv::write_table(&path, &map.to_table()?)?;
    let restored = SubtypeTable::from_table(&tsv::read_table(&path)?)?;
    std::fs::remove_file(&path)?;

    let direct = SubtypeTable::from_map(&map)?;
    assert_eq!(restored.entries(), direct.entries());
    assert_eq!(restored.columns(), direct.columns());
    Ok(())
}

#[test]
fn signal_aggregation() -> Result<()> {
    let map = load_map()?;
    let zscores: Matrix<f64> = matrix::read(get_resource_path("zscores.tsv")?)?;
    assert_eq!(zscores.missing(), 2);

    let mut sink = TsvSink::new(Vec::<u8>::new());
    aggregate_into(&zscores, &map, &mut sink)?;
    let produced = String::from_utf8(sink.into_inner().unwrap_or_default())?;
    assert_eq!(
        produced,
        "ID\tS1\tS2\n\
         11320_1_3\t-4\t0.5\n\
         11320_2_5\t0\t-0.5\n\
         11520_7_3\t1.5\t0\n\
         TW_004\t2\t3\n"
    );
    Ok(())
}

#[test]
fn enrichment_tabulation() -> Result<()> {
    let map = load_map()?;
    let subtypes = SubtypeTable::from_map(&map)?;
    let events = EventTable::from_table(
        "S1",
        &tsv::read_table(get_resource_path("enrichment.tsv")?)?,
    )?;

    let mut config = TabulateConfig::new();
    config.set_library_prefix("TW_");
    let result = tabulate(&[events], &subtypes, &config)?;

    assert_eq!(*result.events(), 2);
    assert_eq!(*result.unresolved(), 1);

    let ranked = |bucket: &str| -> Result<Vec<(String, usize)>> {
        result
            .get(bucket)
            .map(|x| x.counts().clone())
            .ok_or_else(|| eyre!("Missing bucket {bucket}"))
    };
    assert_eq!(
        ranked("species-peptide")?,
        [
            ("Influenza A-TW_001".to_owned(), 3),
            ("Influenza A-TW_003".to_owned(), 1),
            ("Influenza A-TW_002".to_owned(), 1),
        ]
    );
    assert_eq!(
        ranked("species-epitope")?,
        [
            ("Influenza A-11320_1_3".to_owned(), 3),
            ("Influenza A-11520_7_3".to_owned(), 1),
            ("Influenza A-11320_2_5".to_owned(), 1),
        ]
    );
    assert_eq!(
        ranked("subspecies-peptide")?,
        [
            ("Influenza A:H1N1-TW_001".to_owned(), 2),
            ("Influenza A:subtypeNA-TW_001".to_owned(), 1),
            ("Influenza A:H1N1-TW_003".to_owned(), 1),
            ("Influenza A:H3N2-TW_002".to_owned(), 1),
        ]
    );

    let mut stratified = config.clone();
    stratified.set_split_column(Some("Category".to_owned()));
    let result = tabulate(&[], &subtypes, &stratified)?;
    assert_eq!(
        result.buckets().collect_vec(),
        [
            "Viral-species-peptide",
            "Viral-species-epitope",
            "Viral-subspecies-peptide",
            "Bacterial-species-peptide",
            "Bacterial-species-epitope",
            "Bacterial-subspecies-peptide",
        ]
    );
    Ok(())
}

#[test]
fn taxa_sets() -> Result<()> {
    let metadata = tsv::read_table(get_resource_path("metadata.tsv")?)?;
    let rows = AnnotationRow::from_table(&metadata)?;
    let assignments = Normalizer::new(Collapse::Viral).normalize(&rows)?;

    let records = taxa_to_epitopes(&assignments)
        .into_iter()
        .map(|x| {
            let (species_id, species, identities) = x.dissolve();
            gmt::Record::new(species_id, species, identities)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut writer = gmt::Writer::new(Vec::<u8>::new());
    writer.write_records(&records)?;
    assert_eq!(
        String::from_utf8(writer.into_inner())?,
        "11320\tInfluenza A\t11320_1_3\t11320_2_5\n\
         11520\tInfluenza B\t11520_7_3\n\
         1280\tStaphylococcus aureus\tTW_004\n"
    );
    Ok(())
}
