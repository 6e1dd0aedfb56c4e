//! Core data model types for ingestion.
//!
//! Readers produce an in-memory [`DataSet`] (ordered column names plus row-major [`Value`]s).
//! Header cleaning yields [`HeaderTrim`] records, and type inference yields a [`ColumnTypes`]
//! mapping of column name to [`StorageType`].

use std::fmt;

use crate::error::{IngestionError, IngestionResult};

/// A single cell value in a [`DataSet`].
///
/// CSV cells are always [`Value::Utf8`] or [`Value::Null`]; configured NA markers are already
/// [`Value::Null`] when read. Excel cells keep the workbook's
/// native scalar kind and are converted to text only when they are stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for values that are stored as SQL NULL.
    ///
    /// That is [`Value::Null`], a NaN float, and any string equal to `"nan"` ignoring ASCII case.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(f) => f.is_nan(),
            Value::Utf8(s) => s.eq_ignore_ascii_case("nan"),
            Value::Int64(_) | Value::Bool(_) => false,
        }
    }

    /// Text written to storage for this value, or `None` for SQL NULL.
    ///
    /// Conversions are fixed: strings are kept verbatim, integers use decimal notation, floats
    /// use Rust's shortest round-trip `Display` (`3.0` becomes `"3"`), booleans become
    /// `"true"`/`"false"`.
    pub fn to_storage_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Value::Utf8(s) => Some(s.clone()),
            Value::Int64(i) => Some(i.to_string()),
            Value::Float64(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>`, each row holding one value per entry of `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Column (header) names in file order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the values of one column, top to bottom.
    ///
    /// Rows that are shorter than `idx` yield nothing for that row.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Replace the column names, keeping every value untouched.
    ///
    /// Errors with [`IngestionError::SchemaMismatch`] if `columns` has a different length than
    /// the current column list.
    pub fn with_columns(self, columns: Vec<String>) -> IngestionResult<Self> {
        if columns.len() != self.columns.len() {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "renamed column count {} does not match dataset column count {}",
                    columns.len(),
                    self.columns.len()
                ),
            });
        }
        Ok(Self {
            columns,
            rows: self.rows,
        })
    }
}

/// Storage capacity tier assigned to a column from its longest stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageType {
    /// Up to 10 characters.
    Varchar10,
    /// Up to 50 characters.
    Varchar50,
    /// Up to 100 characters.
    Varchar100,
    /// No length bound (also used for columns without any stored value).
    Unbounded,
}

impl StorageType {
    /// Pick the tier for a column whose longest non-null value has `max_len` characters.
    ///
    /// `None` means the column had no non-null values.
    pub fn for_max_len(max_len: Option<usize>) -> Self {
        match max_len {
            Some(n) if n <= 10 => Self::Varchar10,
            Some(n) if n <= 50 => Self::Varchar50,
            Some(n) if n <= 100 => Self::Varchar100,
            _ => Self::Unbounded,
        }
    }

    /// Character capacity of the tier, `None` when unbounded.
    pub fn capacity(self) -> Option<usize> {
        match self {
            Self::Varchar10 => Some(10),
            Self::Varchar50 => Some(50),
            Self::Varchar100 => Some(100),
            Self::Unbounded => None,
        }
    }

    /// Portable SQL column type for this tier.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Varchar10 => "VARCHAR(10)",
            Self::Varchar50 => "VARCHAR(50)",
            Self::Varchar100 => "VARCHAR(100)",
            Self::Unbounded => "TEXT",
        }
    }
}

/// Ordered mapping from column name to [`StorageType`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypes {
    entries: Vec<(String, StorageType)>,
}

impl ColumnTypes {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every column the same tier.
    pub fn uniform<'a>(columns: impl IntoIterator<Item = &'a str>, storage: StorageType) -> Self {
        columns
            .into_iter()
            .map(|name| (name.to_string(), storage))
            .collect()
    }

    /// Set the tier for `name`, replacing any previous assignment.
    pub fn insert(&mut self, name: impl Into<String>, storage: StorageType) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = storage,
            None => self.entries.push((name, storage)),
        }
    }

    /// Tier assigned to `name`, if any.
    pub fn get(&self, name: &str) -> Option<StorageType> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, storage)| *storage)
    }

    /// Iterate assignments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, StorageType)> + '_ {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Number of assigned columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no column has a tier.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, StorageType)> for ColumnTypes {
    fn from_iter<I: IntoIterator<Item = (String, StorageType)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (name, storage) in iter {
            out.insert(name, storage);
        }
        out
    }
}

/// One header that was shortened by header cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTrim {
    /// Header as read from the file.
    pub original: String,
    /// Header after truncation.
    pub cleaned: String,
}

impl fmt::Display for HeaderTrim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Column '{}' trimmed to {} chars -> '{}'",
            self.original,
            self.cleaned.chars().count(),
            self.cleaned
        )
    }
}
