//! Reading uploads into memory.
//!
//! Most callers should use [`read_from_path`] (from [`unified`]) which auto-detects the format
//! by file extension (or you can override via [`ReadOptions`]) and produces an in-memory
//! [`crate::types::DataSet`] whose cells are text.
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (feature `excel`)
//!
//! [`observability`] holds the observer hooks the pipeline reports outcomes to.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, TracingObserver, severity_for_error,
};
pub use unified::{IngestionFormat, ReadOptions, infer_format_from_path, read_from_path};

use std::collections::HashMap;

use crate::types::Value;

/// Cell texts read as missing unless configured otherwise.
///
/// Common NA spellings written by spreadsheet and dataframe exports. Matching is exact and
/// case-sensitive.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A",
    "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// [`DEFAULT_NA_VALUES`] as owned strings, e.g. for [`crate::config::IngestConfig::na_values`].
pub fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

/// A text cell as a [`Value`]: empty text and any of `na_values` become [`Value::Null`].
pub(crate) fn text_cell(raw: &str, na_values: &[String]) -> Value {
    if raw.is_empty() || na_values.iter().any(|na| na == raw) {
        Value::Null
    } else {
        Value::Utf8(raw.to_owned())
    }
}

/// Header text for column `idx`; blank headers get a positional `Unnamed: <idx>` name.
pub(crate) fn header_name(idx: usize, raw: &str) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {idx}")
    } else {
        raw.to_string()
    }
}

/// Rename repeated headers to `name.1`, `name.2`, ... so every column is addressable.
///
/// A generated name that is already taken is suffixed again (`a, a.1, a` -> `a, a.1, a.1.1`).
pub(crate) fn dedupe_headers(columns: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::with_capacity(columns.len());
    let mut out = Vec::with_capacity(columns.len());
    for original in columns {
        let mut name = original;
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{name}.{seen}");
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), seen + 1);
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{dedupe_headers, default_na_values, text_cell};
    use crate::types::Value;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn repeated_headers_get_numeric_suffixes() {
        assert_eq!(dedupe_headers(names(&["a", "b", "a", "a"])), names(&["a", "b", "a.1", "a.2"]));
        assert_eq!(dedupe_headers(names(&["a", "a.1", "a"])), names(&["a", "a.1", "a.1.1"]));
        assert_eq!(dedupe_headers(names(&["x", "y"])), names(&["x", "y"]));
    }

    #[test]
    fn na_markers_match_exactly() {
        let na = default_na_values();
        assert_eq!(text_cell("NULL", &na), Value::Null);
        assert_eq!(text_cell("None", &na), Value::Null);
        assert_eq!(text_cell("", &[]), Value::Null);
        assert_eq!(text_cell("Null", &na), Value::Utf8("Null".to_string()));
        assert_eq!(text_cell(" NA", &na), Value::Utf8(" NA".to_string()));
        assert_eq!(text_cell("NA", &[]), Value::Utf8("NA".to_string()));
    }
}
