//! Storage tier inference for [`crate::types::DataSet`] columns.

use crate::types::{ColumnTypes, DataSet, StorageType};

/// Assign each column a [`StorageType`] from the character length of its longest stored value.
///
/// Values that load as SQL NULL (see [`crate::types::Value::is_missing`]) are skipped, so an
/// empty or all-null column is [`StorageType::Unbounded`]. Values are never changed.
pub fn infer_storage_types(dataset: &DataSet) -> ColumnTypes {
    dataset
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let max_len = dataset
                .column_values(idx)
                .filter_map(|v| v.to_storage_text())
                .map(|text| text.chars().count())
                .max();
            let storage = StorageType::for_max_len(max_len);
            tracing::debug!(column = %name, ?max_len, ?storage, "inferred storage type");
            (name.clone(), storage)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::infer_storage_types;
    use crate::types::{DataSet, StorageType, Value};

    fn text(s: &str) -> Value {
        Value::Utf8(s.to_string())
    }

    #[test]
    fn longest_value_picks_the_tier() {
        let ds = DataSet::new(
            vec!["code".to_string(), "note".to_string()],
            vec![
                vec![text("ab"), text(&"n".repeat(11))],
                vec![text(&"c".repeat(10)), Value::Null],
            ],
        );
        let types = infer_storage_types(&ds);
        assert_eq!(types.get("code"), Some(StorageType::Varchar10));
        assert_eq!(types.get("note"), Some(StorageType::Varchar50));
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        let lens = [10, 11, 50, 51, 100, 101];
        let columns: Vec<String> = lens.iter().map(|n| format!("c{n}")).collect();
        let row = lens.iter().map(|n| text(&"x".repeat(*n))).collect();
        let types = infer_storage_types(&DataSet::new(columns, vec![row]));

        let tiers: Vec<_> = types.iter().map(|(_, t)| t).collect();
        assert_eq!(
            tiers,
            vec![
                StorageType::Varchar10,
                StorageType::Varchar50,
                StorageType::Varchar50,
                StorageType::Varchar100,
                StorageType::Varchar100,
                StorageType::Unbounded,
            ]
        );
    }

    #[test]
    fn empty_and_all_null_columns_are_unbounded() {
        let ds = DataSet::new(
            vec!["nulls".to_string(), "nans".to_string()],
            vec![vec![Value::Null, text("nan")], vec![Value::Null, Value::Float64(f64::NAN)]],
        );
        let types = infer_storage_types(&ds);
        assert_eq!(types.get("nulls"), Some(StorageType::Unbounded));
        assert_eq!(types.get("nans"), Some(StorageType::Unbounded));

        let empty = DataSet::new(vec!["only_header".to_string()], Vec::new());
        assert_eq!(
            infer_storage_types(&empty).get("only_header"),
            Some(StorageType::Unbounded)
        );
    }

    #[test]
    fn non_text_cells_are_measured_by_their_stored_text() {
        let ds = DataSet::new(
            vec!["n".to_string()],
            vec![vec![Value::Int64(12_345_678_901)], vec![Value::Bool(false)]],
        );
        assert_eq!(infer_storage_types(&ds).get("n"), Some(StorageType::Varchar50));
    }
}
