//! Header cleaning for [`crate::types::DataSet`].

use std::collections::HashSet;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, HeaderTrim};

/// Truncate every header longer than `max_len` characters to exactly `max_len` characters.
///
/// Values are untouched. Returns the renamed dataset and one [`HeaderTrim`] per shortened
/// header, in column order. Each trim is logged as a structured `tracing` event.
///
/// Errors with [`IngestionError::DuplicateColumn`] if two columns share a name afterwards, and
/// with [`IngestionError::InvalidConfig`] when `max_len` is zero. The readers already rename
/// repeated headers in the file (`a`, `a.1`), so a clash here comes from truncation.
pub fn sanitize_headers(dataset: DataSet, max_len: usize) -> IngestionResult<(DataSet, Vec<HeaderTrim>)> {
    if max_len == 0 {
        return Err(IngestionError::InvalidConfig {
            message: "max header length must be at least 1".to_string(),
        });
    }

    let mut trims = Vec::new();
    let mut cleaned_columns = Vec::with_capacity(dataset.column_count());
    for original in &dataset.columns {
        match truncate_chars(original, max_len) {
            Some(cleaned) => {
                tracing::info!(
                    original = %original,
                    cleaned = %cleaned,
                    max_len,
                    "column header trimmed"
                );
                trims.push(HeaderTrim {
                    original: original.clone(),
                    cleaned: cleaned.clone(),
                });
                cleaned_columns.push(cleaned);
            }
            None => cleaned_columns.push(original.clone()),
        }
    }

    let mut seen = HashSet::with_capacity(cleaned_columns.len());
    for name in &cleaned_columns {
        if !seen.insert(name.as_str()) {
            return Err(IngestionError::DuplicateColumn { name: name.clone() });
        }
    }

    Ok((dataset.with_columns(cleaned_columns)?, trims))
}

fn truncate_chars(name: &str, max_len: usize) -> Option<String> {
    let (cut, _) = name.char_indices().nth(max_len)?;
    Some(name[..cut].to_string())
}

#[cfg(test)]
mod tests {
    use super::sanitize_headers;
    use crate::error::IngestionError;
    use crate::types::{DataSet, HeaderTrim, Value};

    fn dataset(columns: &[&str]) -> DataSet {
        let row = columns.iter().map(|_| Value::Utf8("v".to_string())).collect();
        DataSet::new(columns.iter().map(|c| c.to_string()).collect(), vec![row])
    }

    #[test]
    fn short_headers_pass_through_without_trims() {
        let exact = "b".repeat(125);
        let ds = dataset(&["id", exact.as_str()]);
        let (out, trims) = sanitize_headers(ds.clone(), 125).unwrap();
        assert_eq!(out, ds);
        assert!(trims.is_empty());
    }

    #[test]
    fn long_headers_are_cut_to_exactly_max_len() {
        let long = "A".repeat(130);
        let ds = dataset(&["id", long.as_str()]);
        let (out, trims) = sanitize_headers(ds, 125).unwrap();

        assert_eq!(out.columns[0], "id");
        assert_eq!(out.columns[1], "A".repeat(125));
        assert_eq!(
            trims,
            vec![HeaderTrim {
                original: long,
                cleaned: "A".repeat(125),
            }]
        );
        assert_eq!(out.rows[0], vec![Value::Utf8("v".to_string()), Value::Utf8("v".to_string())]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let ds = dataset(&["ééééé"]);
        let (out, trims) = sanitize_headers(ds, 3).unwrap();
        assert_eq!(out.columns[0], "ééé");
        assert_eq!(trims.len(), 1);
    }

    #[test]
    fn clashing_truncated_headers_are_rejected() {
        let a = format!("{}_first", "x".repeat(10));
        let b = format!("{}_second", "x".repeat(10));
        let err = sanitize_headers(dataset(&[a.as_str(), b.as_str()]), 10).unwrap_err();
        assert!(matches!(err, IngestionError::DuplicateColumn { ref name } if *name == "x".repeat(10)));
    }

    #[test]
    fn zero_max_len_is_rejected() {
        let err = sanitize_headers(dataset(&["a"]), 0).unwrap_err();
        assert!(matches!(err, IngestionError::InvalidConfig { .. }));
    }
}
