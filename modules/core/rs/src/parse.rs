use eyre::{ensure, Result};
use itertools::Itertools;

/// Delimiter of multi-valued annotation cells, e.g. `Species` or `CodeName` lists.
pub const LIST_DELIMITER: &str = ";";

/// Splits a multi-valued cell into its ordered elements. Empty elements are preserved.
pub fn list(value: &str) -> Vec<String> {
    value.split(LIST_DELIMITER).map(ToOwned::to_owned).collect()
}

/// Joins ordered elements back into a multi-valued cell.
pub fn join<S: AsRef<str>>(values: &[S]) -> String {
    values.iter().map(|x| x.as_ref()).join(LIST_DELIMITER)
}

pub fn non_empty_string(name: &str, value: impl Into<String>) -> Result<String> {
    let value = value.into();
    ensure!(!value.is_empty(), "{name} must not be an empty string");
    Ok(value)
}

/// Fails if any label repeats. At most a handful of duplicated labels are reported.
pub fn unique<'a>(what: &str, labels: impl IntoIterator<Item = &'a str>) -> Result<()> {
    const REPORTED: usize = 10;

    let duplicated = labels.into_iter().duplicates().take(REPORTED + 1).collect_vec();
    ensure!(
        duplicated.is_empty(),
        "{what} labels must be unique, duplicated: {}{}",
        duplicated.iter().take(REPORTED).map(|x| format!("'{x}'")).join(", "),
        if duplicated.len() > REPORTED { ", ..." } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_join() {
        assert_eq!(list("a;b;c"), ["a", "b", "c"]);
        assert_eq!(list("a;;c"), ["a", "", "c"]);
        assert_eq!(list("single"), ["single"]);
        assert_eq!(join(&["a", "", "c"]), "a;;c");
        assert_eq!(join::<&str>(&[]), "");
    }

    #[test]
    fn test_unique() {
        assert!(unique("Row", ["a", "b"]).is_ok());
        let err = unique("Row", ["a", "b", "a", "b", "a"]).unwrap_err().to_string();
        assert_eq!(err, "Row labels must be unique, duplicated: 'a', 'b'");

        let many = (0..12).map(|x| x.to_string()).collect_vec();
        let labels = many.iter().chain(&many).map(String::as_str);
        let err = unique("Column", labels).unwrap_err().to_string();
        assert!(err.ends_with("'9', ..."));
    }

    #[test]
    fn test_non_empty_string() {
        assert_eq!(non_empty_string("Name", "x").unwrap(), "x");
        assert!(non_empty_string("Name", "").is_err());
    }
}
