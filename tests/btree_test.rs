use kancil::{
    storage::{btree::BTreeWalker, pager::Pager},
    types::{error::DatabaseError, value::Value},
    utils::mock::DatabaseBuilder,
};

const PAGE_SIZE: u32 = 512;

fn fruit_row(row_id: i64, name: &str) -> (i64, Vec<Value>) {
    (row_id, vec![Value::Integer(row_id), Value::Text(name.to_string())])
}

fn row_ids_at(pager: &Pager, locations: &[u64]) -> Vec<i64> {
    locations
        .iter()
        .map(|&location| {
            let (_payload_size, len) = pager.read_varint(location).unwrap();
            let (row_id, _) = pager.read_varint(location + len as u64).unwrap();
            row_id
        })
        .collect()
}

#[test]
fn test_single_leaf_page() {
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    let root = builder.add_leaf_page(&[
        fruit_row(1, "fuji"),
        fruit_row(2, "gala"),
        fruit_row(3, "envy"),
    ]);
    builder.add_table("apples", root, "CREATE TABLE apples (id integer, name text)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let result = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(root)
        .unwrap();
    assert_eq!(result.row_count, 3);
    assert_eq!(result.cell_locations.len(), 3);
    assert_eq!(row_ids_at(&pager, &result.cell_locations), vec![1, 2, 3]);
}

#[test]
fn test_interior_page_preserves_row_id_order() {
    // Two ordinary children plus a rightmost child, each leaf holding two
    // rows; the walk must surface rows 1 through 6 in order.
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    let left = builder.add_leaf_page(&[fruit_row(1, "a"), fruit_row(2, "b")]);
    let middle = builder.add_leaf_page(&[fruit_row(3, "c"), fruit_row(4, "d")]);
    let right = builder.add_leaf_page(&[fruit_row(5, "e"), fruit_row(6, "f")]);
    let root = builder.add_interior_page(&[(left, 2), (middle, 4)], right);
    builder.add_table("letters", root, "CREATE TABLE letters (id integer, name text)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let result = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(root)
        .unwrap();
    assert_eq!(result.row_count, 6);
    assert_eq!(
        row_ids_at(&pager, &result.cell_locations),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn test_two_level_tree_of_interior_pages() {
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    let l1 = builder.add_leaf_page(&[fruit_row(1, "a")]);
    let l2 = builder.add_leaf_page(&[fruit_row(2, "b")]);
    let l3 = builder.add_leaf_page(&[fruit_row(3, "c")]);
    let l4 = builder.add_leaf_page(&[fruit_row(4, "d")]);
    let lower_left = builder.add_interior_page(&[(l1, 1)], l2);
    let lower_right = builder.add_interior_page(&[(l3, 3)], l4);
    let root = builder.add_interior_page(&[(lower_left, 2)], lower_right);
    builder.add_table("deep", root, "CREATE TABLE deep (id integer, name text)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let result = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(root)
        .unwrap();
    assert_eq!(result.row_count, 4);
    assert_eq!(row_ids_at(&pager, &result.cell_locations), vec![1, 2, 3, 4]);
}

#[test]
fn test_root_page_zero_yields_empty_result() {
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    builder.add_table("empty", 0, "CREATE TABLE empty (id integer)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let result = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(0)
        .unwrap();
    assert_eq!(result.row_count, 0);
    assert!(result.cell_locations.is_empty());
}

#[test]
fn test_unknown_page_tag_is_fatal() {
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    let mut bogus = vec![0u8; PAGE_SIZE as usize];
    bogus[0] = 0x41;
    let root = builder.add_raw_page(bogus);
    builder.add_table("broken", root, "CREATE TABLE broken (id integer)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let err = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(root)
        .unwrap_err();
    assert!(matches!(err, DatabaseError::InvalidPageType(0x41)));
}

#[test]
fn test_index_page_rejected_in_table_scan() {
    let mut builder = DatabaseBuilder::new(PAGE_SIZE as usize);
    let mut index_page = vec![0u8; PAGE_SIZE as usize];
    index_page[0] = 0x0A;
    let root = builder.add_raw_page(index_page);
    builder.add_table("notatable", root, "CREATE TABLE notatable (id integer)");
    let fixture = builder.build().unwrap();

    let pager = Pager::open(&fixture.path).unwrap();
    let err = BTreeWalker::new(&pager, PAGE_SIZE)
        .collect_table_cells(root)
        .unwrap_err();
    assert!(matches!(err, DatabaseError::CorruptedPage { .. }));
}
