use kancil::{
    executor::{query::QueryEngine, scan::{ScanIterator, Scanner}},
    types::{error::DatabaseError, value::Value},
    utils::mock::{DatabaseBuilder, TempDatabase},
};

fn apple_fixture() -> TempDatabase {
    let mut builder = DatabaseBuilder::new(512);
    let root = builder.add_leaf_page(&[
        (
            1,
            vec![
                Value::Integer(1),
                Value::Text("fuji".to_string()),
                Value::Text("red".to_string()),
            ],
        ),
        (
            2,
            vec![
                Value::Integer(2),
                Value::Text("granny smith".to_string()),
                Value::Text("green".to_string()),
            ],
        ),
        (
            3,
            vec![
                Value::Integer(3),
                Value::Text("honeycrisp".to_string()),
                Value::Text("striped".to_string()),
            ],
        ),
    ]);
    builder.add_table(
        "apples",
        root,
        "CREATE TABLE apples (id integer primary key, name text, color text)",
    );
    builder.build().unwrap()
}

#[test]
fn test_dbinfo_scenario() {
    // Two pages of 512 bytes, one table with three rows on one leaf.
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let info = engine.database_info().unwrap();
    assert_eq!(info.page_size, 512);
    assert_eq!(info.object_count, 1);
    assert_eq!(engine.count_rows("apples").unwrap(), 3);
}

#[test]
fn test_select_projects_in_requested_order() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();

    let scanner = engine
        .select_columns("apples", &["name".to_string(), "color".to_string()])
        .unwrap();
    let rows: Vec<_> = ScanIterator::new(scanner).collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0].values,
        vec![Value::Text("fuji".to_string()), Value::Text("red".to_string())]
    );

    // Reversing the request reverses the value order, not the rows.
    let scanner = engine
        .select_columns("apples", &["color".to_string(), "name".to_string()])
        .unwrap();
    let rows: Vec<_> = ScanIterator::new(scanner).collect::<Result<_, _>>().unwrap();
    assert_eq!(
        rows[1].values,
        vec![
            Value::Text("green".to_string()),
            Value::Text("granny smith".to_string())
        ]
    );
}

#[test]
fn test_row_count_agrees_with_projection_length() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let count = engine.count_rows("apples").unwrap();
    let mut scanner = engine
        .select_columns("apples", &["id".to_string()])
        .unwrap();
    assert_eq!(scanner.remaining() as u64, count);
    let mut seen = 0;
    while scanner.scan().unwrap().is_some() {
        seen += 1;
    }
    assert_eq!(seen, count);
}

#[test]
fn test_multi_level_tree_yields_ascending_rows() {
    let mut builder = DatabaseBuilder::new(512);
    let rows = |ids: [i64; 2]| {
        ids.map(|id| (id, vec![Value::Integer(id), Value::Text(format!("row{}", id))]))
    };
    let left = builder.add_leaf_page(&rows([1, 2]));
    let middle = builder.add_leaf_page(&rows([3, 4]));
    let right = builder.add_leaf_page(&rows([5, 6]));
    let root = builder.add_interior_page(&[(left, 2), (middle, 4)], right);
    builder.add_table("seq", root, "CREATE TABLE seq (id integer, label text)");
    let fixture = builder.build().unwrap();

    let engine = QueryEngine::open(&fixture.path).unwrap();
    assert_eq!(engine.count_rows("seq").unwrap(), 6);
    let scanner = engine.select_columns("seq", &["id".to_string()]).unwrap();
    let ids: Vec<_> = ScanIterator::new(scanner)
        .map(|row| row.unwrap().values[0].as_integer().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_unknown_table_fails() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let err = engine.count_rows("oranges").unwrap_err();
    assert!(matches!(err, DatabaseError::TableNotFound { name } if name == "oranges"));
}

#[test]
fn test_unknown_column_fails_before_any_row() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let err = engine
        .select_columns("apples", &["name".to_string(), "weight".to_string()])
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::ColumnNotFound { name, table } if name == "weight" && table == "apples"
    ));
}

#[test]
fn test_short_records_read_missing_columns_as_null() {
    // Rows written before an ALTER TABLE ADD COLUMN carry fewer columns
    // than the table declares.
    let mut builder = DatabaseBuilder::new(512);
    let root = builder.add_leaf_page(&[(1, vec![Value::Integer(1)])]);
    builder.add_table("t", root, "CREATE TABLE t (a integer, b text, c text)");
    let fixture = builder.build().unwrap();

    let engine = QueryEngine::open(&fixture.path).unwrap();
    let scanner = engine
        .select_columns("t", &["a".to_string(), "c".to_string()])
        .unwrap();
    let rows: Vec<_> = ScanIterator::new(scanner).collect::<Result<_, _>>().unwrap();
    assert_eq!(rows[0].values, vec![Value::Integer(1), Value::Null]);
}

#[test]
fn test_row_display_joins_with_pipes() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let scanner = engine
        .select_columns("apples", &["name".to_string(), "color".to_string()])
        .unwrap();
    let lines: Vec<String> = ScanIterator::new(scanner)
        .map(|row| {
            row.unwrap()
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect();
    assert_eq!(lines, vec!["fuji|red", "granny smith|green", "honeycrisp|striped"]);
}

#[test]
fn test_scan_batch() {
    let fixture = apple_fixture();
    let engine = QueryEngine::open(&fixture.path).unwrap();
    let mut scanner = engine
        .select_columns("apples", &["name".to_string()])
        .unwrap();
    let first = scanner.scan_batch(2).unwrap();
    assert_eq!(first.len(), 2);
    let rest = scanner.scan_batch(10).unwrap();
    assert_eq!(rest.len(), 1);
    assert!(scanner.scan().unwrap().is_none());
}
