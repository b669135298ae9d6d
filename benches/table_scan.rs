use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kancil::{
    executor::{query::QueryEngine, scan::Scanner},
    types::value::Value,
    utils::mock::{DatabaseBuilder, TempDatabase},
};

const DATASET_SIZES: &[usize] = &[100, 1_000, 5_000];
const ROWS_PER_LEAF: usize = 50;

fn build_fixture(rows: usize) -> TempDatabase {
    let mut builder = DatabaseBuilder::new(4096);
    let mut leaves = Vec::new();
    let mut row_id = 1i64;
    while (row_id as usize) <= rows {
        let mut page_rows = Vec::new();
        for _ in 0..ROWS_PER_LEAF {
            if row_id as usize > rows {
                break;
            }
            page_rows.push((
                row_id,
                vec![
                    Value::Integer(row_id),
                    Value::Text(format!("item-{:06}", row_id)),
                ],
            ));
            row_id += 1;
        }
        let max_key = page_rows.last().unwrap().0;
        leaves.push((builder.add_leaf_page(&page_rows), max_key));
    }
    let root = if leaves.len() == 1 {
        leaves[0].0
    } else {
        let (rightmost, _) = *leaves.last().unwrap();
        builder.add_interior_page(&leaves[..leaves.len() - 1], rightmost)
    };
    builder.add_table("items", root, "CREATE TABLE items (id integer, name text)");
    builder.build().unwrap()
}

fn benchmark_projection_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_throughput");
    for &size in DATASET_SIZES {
        let fixture = build_fixture(size);
        let engine = QueryEngine::open(&fixture.path).unwrap();
        let columns = ["id".to_string(), "name".to_string()];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut scanner = engine.select_columns("items", &columns).unwrap();
                let mut seen = 0;
                while let Some(row) = scanner.scan().unwrap() {
                    black_box(row);
                    seen += 1;
                }
                assert_eq!(seen, size);
            });
        });
    }
    group.finish();
}

fn benchmark_count_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_rows");
    for &size in DATASET_SIZES {
        let fixture = build_fixture(size);
        let engine = QueryEngine::open(&fixture.path).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let count = engine.count_rows(black_box("items")).unwrap();
                assert_eq!(count, size as u64);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_projection_throughput, benchmark_count_rows);
criterion_main!(benches);
