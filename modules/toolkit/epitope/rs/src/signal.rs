use ahash::AHashSet;
use epimap_core_rs::num::Float;
use epimap_core_rs::{Matrix, MatrixSink};
use eyre::{ensure, Result, WrapErr};

use crate::map::EpitopeMap;

/// Aggregates a sample x peptide signal matrix into an identity x sample matrix.
///
/// For every identity of the map and every sample, the value is the largest-magnitude signal
/// (sign preserved) across the peptides of the identity. Missing signals count as zero, ties
/// go to the leftmost peptide column. Each identity must match at least one matrix column.
pub fn aggregate<T: Float>(signal: &Matrix<T>, map: &EpitopeMap) -> Result<Matrix<T>> {
    let (samples, _) = signal.shape();
    let mut filled = signal.clone();
    filled.fill_missing(T::zero());

    let mut data = Vec::with_capacity(map.len() * samples);

    for entry in map.entries() {
        let peptides: AHashSet<&str> = entry.code_names().iter().map(String::as_str).collect();
        let selected: Vec<usize> = signal
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(ind, column)| peptides.contains(column.as_str()).then_some(ind))
            .collect();
        ensure!(
            !selected.is_empty(),
            "None of the peptides of the epitope '{}' are present in the signal matrix: {:?}",
            entry.identity(),
            entry.code_names()
        );

        for sample in 0..samples {
            let row = filled.row(sample);
            let values = selected.iter().map(|&ind| row[ind]);
            // Selection is non-empty, absmax always yields a value
            data.extend(T::absmax(values));
        }
    }

    let rows = map.identities().map(str::to_owned).collect();
    Matrix::new(rows, signal.rows().clone(), data)
        .wrap_err("Failed to assemble the aggregated signal matrix")
}

/// Aggregates the signal and hands the result over to the sink.
pub fn aggregate_into<T: Float>(
    signal: &Matrix<T>,
    map: &EpitopeMap,
    sink: &mut impl MatrixSink<T>,
) -> Result<()> {
    let aggregated = aggregate(signal, map)?;
    log::debug!(
        "Aggregated {} peptides into {} epitopes across {} samples",
        signal.columns().len(),
        aggregated.rows().len(),
        aggregated.columns().len()
    );
    sink.sink(&aggregated)
}
