use tabular_ingest::IngestionError;
use tabular_ingest::storage::{SqliteStorage, Storage, TableName, TableStatus, ensure_table, insert_rows};
use tabular_ingest::types::{ColumnTypes, DataSet, StorageType, Value};

fn storage() -> SqliteStorage {
    SqliteStorage::open_in_memory("py").unwrap()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn declared_types(storage: &SqliteStorage, table: &str) -> Vec<(String, String)> {
    let mut stmt = storage
        .connection()
        .prepare(&format!("PRAGMA table_info(\"{table}\")"))
        .unwrap();
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

fn all_rows(storage: &SqliteStorage, sql: &str) -> Vec<Vec<Option<String>>> {
    let conn = storage.connection();
    let mut stmt = conn.prepare(sql).unwrap();
    let width = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

#[test]
fn ensure_table_creates_typed_columns() {
    let mut storage = storage();
    let table = TableName::new("sales", None).unwrap();
    let cols = columns(&["code", "note", "blob"]);
    let types: ColumnTypes = vec![
        ("code".to_string(), StorageType::Varchar10),
        ("note".to_string(), StorageType::Varchar100),
        ("blob".to_string(), StorageType::Unbounded),
    ]
    .into_iter()
    .collect();

    let status = ensure_table(&mut storage, &table, &cols, Some(&types)).unwrap();
    assert_eq!(status, TableStatus::Created);
    assert!(storage.table_exists(&table).unwrap());
    assert_eq!(
        declared_types(&storage, "sales"),
        vec![
            ("code".to_string(), "VARCHAR(10)".to_string()),
            ("note".to_string(), "VARCHAR(100)".to_string()),
            ("blob".to_string(), "TEXT".to_string()),
        ]
    );
}

#[test]
fn ensure_table_without_types_uses_unbounded_text() {
    let mut storage = storage();
    let table = TableName::new("plain", None).unwrap();
    ensure_table(&mut storage, &table, &columns(&["a", "b"]), None).unwrap();
    assert_eq!(
        declared_types(&storage, "plain"),
        vec![
            ("a".to_string(), "TEXT".to_string()),
            ("b".to_string(), "TEXT".to_string()),
        ]
    );
}

#[test]
fn ensure_table_is_a_noop_for_existing_tables() {
    let mut storage = storage();
    let table = TableName::new("sales", None).unwrap();
    ensure_table(&mut storage, &table, &columns(&["a"]), None).unwrap();

    // Different columns: the existing schema is left alone and no error is raised.
    let status = ensure_table(&mut storage, &table, &columns(&["x", "y"]), None).unwrap();
    assert_eq!(status, TableStatus::AlreadyExists);
    assert_eq!(declared_types(&storage, "sales"), vec![("a".to_string(), "TEXT".to_string())]);

    // Catalog lookup ignores case like SQLite itself.
    let upper = TableName::new("SALES", None).unwrap();
    assert_eq!(
        ensure_table(&mut storage, &upper, &columns(&["a"]), None).unwrap(),
        TableStatus::AlreadyExists
    );
}

#[test]
fn ensure_table_errors_when_mapping_lacks_a_column() {
    let mut storage = storage();
    let table = TableName::new("t", None).unwrap();
    let types = ColumnTypes::uniform(["a"], StorageType::Varchar10);
    let err = ensure_table(&mut storage, &table, &columns(&["a", "b"]), Some(&types)).unwrap_err();
    assert!(err.to_string().contains("no storage type for column 'b'"));
    assert!(!storage.table_exists(&table).unwrap());
}

#[test]
fn hostile_identifiers_stay_inside_quotes() {
    let mut storage = storage();
    let table = TableName::new("t\"; DROP TABLE victims; --", None).unwrap();
    storage
        .connection()
        .execute_batch("CREATE TABLE victims (id TEXT)")
        .unwrap();

    let cols = columns(&["a] NVARCHAR(MAX)); --", "b\"c"]);
    ensure_table(&mut storage, &table, &cols, None).unwrap();
    let ds = DataSet::new(cols, vec![vec![Value::Utf8("1".to_string()), Value::Utf8("2".to_string())]]);
    insert_rows(&mut storage, &table, &ds).unwrap();

    assert!(storage.table_exists(&TableName::new("victims", None).unwrap()).unwrap());
    assert!(storage.table_exists(&table).unwrap());
    assert_eq!(
        all_rows(&storage, "SELECT \"a] NVARCHAR(MAX)); --\", \"b\"\"c\" FROM \"t\"\"; DROP TABLE victims; --\""),
        vec![vec![Some("1".to_string()), Some("2".to_string())]]
    );
}

#[test]
fn insert_rows_normalizes_nulls_and_stringifies_values() {
    let mut storage = storage();
    let table = TableName::new("vals", None).unwrap();
    let cols = columns(&["v"]);
    ensure_table(&mut storage, &table, &cols, None).unwrap();

    let ds = DataSet::new(
        cols,
        vec![
            vec![Value::Null],
            vec![Value::Utf8("nan".to_string())],
            vec![Value::Utf8("NaN".to_string())],
            vec![Value::Float64(f64::NAN)],
            vec![Value::Int64(42)],
            vec![Value::Bool(true)],
            vec![Value::Float64(2.5)],
            vec![Value::Utf8(" keep me ".to_string())],
        ],
    );
    assert_eq!(insert_rows(&mut storage, &table, &ds).unwrap(), 8);

    let got: Vec<Option<String>> = all_rows(&storage, "SELECT v FROM vals ORDER BY rowid")
        .into_iter()
        .map(|mut r| r.remove(0))
        .collect();
    assert_eq!(
        got,
        vec![
            None,
            None,
            None,
            None,
            Some("42".to_string()),
            Some("true".to_string()),
            Some("2.5".to_string()),
            Some(" keep me ".to_string()),
        ]
    );
}

#[test]
fn rollback_discards_rows_sent_before_a_failed_insert() {
    let mut storage = storage();
    let table = TableName::new("strict", None).unwrap();
    storage
        .connection()
        .execute_batch("CREATE TABLE strict (v TEXT UNIQUE)")
        .unwrap();

    let dupes = DataSet::new(
        columns(&["v"]),
        vec![
            vec![Value::Utf8("1".to_string())],
            vec![Value::Utf8("1".to_string())],
        ],
    );
    let err = insert_rows(&mut storage, &table, &dupes).unwrap_err();
    assert!(matches!(err, IngestionError::Sqlite(_)));

    storage.rollback().unwrap();
    let good = DataSet::new(columns(&["v"]), vec![vec![Value::Utf8("2".to_string())]]);
    assert_eq!(insert_rows(&mut storage, &table, &good).unwrap(), 1);

    assert_eq!(
        all_rows(&storage, "SELECT v FROM strict"),
        vec![vec![Some("2".to_string())]]
    );
}

#[test]
fn rollback_without_pending_work_is_a_no_op() {
    let mut storage = storage();
    storage.rollback().unwrap();
    storage.commit().unwrap();
}

#[test]
fn insert_into_missing_table_is_a_storage_error() {
    let mut storage = storage();
    let table = TableName::new("missing", None).unwrap();
    let ds = DataSet::new(columns(&["v"]), vec![vec![Value::Utf8("x".to_string())]]);
    assert!(matches!(
        insert_rows(&mut storage, &table, &ds),
        Err(IngestionError::Sqlite(_))
    ));
}

#[test]
fn schema_qualified_tables_use_the_named_schema() {
    let mut storage = storage();
    storage
        .connection()
        .execute_batch("ATTACH DATABASE ':memory:' AS staging")
        .unwrap();
    let table = TableName::new("t", Some("staging")).unwrap();

    ensure_table(&mut storage, &table, &columns(&["a"]), None).unwrap();
    assert!(storage.table_exists(&table).unwrap());
    assert!(!storage.table_exists(&TableName::new("t", None).unwrap()).unwrap());
}
