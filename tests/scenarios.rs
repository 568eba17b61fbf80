//! End-to-end behavior exercised against the public API rather than module
//! internals: chunking, dictionary compression, scans in both encodings,
//! and scan chaining through reference segments.

use std::sync::Arc;

use colstore_core::scan::{ScanOp, TableScan};
use colstore_core::storage::Table;
use colstore_core::types::{AnyValue, ChunkId, ColumnId, DataType};

fn int_string_table(chunk_size: usize) -> Arc<Table> {
    let t = Table::new(chunk_size);
    t.add_column("a", DataType::Int32).unwrap();
    t.add_column("b", DataType::Str).unwrap();
    t
}

#[test]
fn rows_are_split_across_chunk_size_boundaries() {
    let t = int_string_table(2);
    t.append(&[AnyValue::Int32(4), AnyValue::str("Hello,")]).unwrap();
    t.append(&[AnyValue::Int32(6), AnyValue::str("world")]).unwrap();
    t.append(&[AnyValue::Int32(3), AnyValue::str("!")]).unwrap();

    assert_eq!(t.chunk_count(), 2);
    assert_eq!(t.get_chunk(ChunkId(0)).unwrap().size(), 2);
    assert_eq!(t.get_chunk(ChunkId(1)).unwrap().size(), 1);
    assert_eq!(t.row_count(), 3);
}

#[test]
fn compressed_column_reads_back_the_same_values() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in [5, 1, 2, 2, 5, 3, 1, 4, 5, 2] {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }
    let chunk = t.get_chunk(ChunkId(0)).unwrap();
    let seg = chunk.get_segment(ColumnId(0)).unwrap();
    let compressed = seg.compress();

    for (i, expected) in [5, 1, 2, 2, 5, 3, 1, 4, 5, 2].into_iter().enumerate() {
        assert_eq!(compressed.get_any(i).unwrap(), AnyValue::Int32(expected));
    }
}

fn int_col_values(t: &Arc<Table>) -> Vec<i32> {
    let mut out = Vec::new();
    for k in 0..t.chunk_count() {
        let chunk = t.get_chunk(ChunkId(k as u32)).unwrap();
        let seg = chunk.get_segment(ColumnId(0)).unwrap();
        for i in 0..seg.size() {
            match seg.get_any(i).unwrap() {
                AnyValue::Int32(v) => out.push(v),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }
    out
}

#[test]
fn table_scan_filters_a_value_segment_column() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in [10, 20, 30, 40, 50] {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }

    let scan = TableScan::new(t.clone(), ColumnId(0), ScanOp::LessThan, AnyValue::Int32(35));
    let out = scan.execute().unwrap();
    assert_eq!(out.row_count(), 3);
    assert_eq!(int_col_values(&out), vec![10, 20, 30]);
}

#[test]
fn table_scan_gives_the_same_result_before_and_after_compression() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in [10, 20, 30, 40, 50] {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }

    let before = TableScan::new(t.clone(), ColumnId(0), ScanOp::LessThan, AnyValue::Int32(35))
        .execute()
        .unwrap();

    t.compress_chunk(ChunkId(0)).unwrap();

    let after = TableScan::new(t.clone(), ColumnId(0), ScanOp::LessThan, AnyValue::Int32(35))
        .execute()
        .unwrap();

    assert_eq!(int_col_values(&before), int_col_values(&after));
    assert_eq!(int_col_values(&after), vec![10, 20, 30]);
}

#[test]
fn two_stage_scan_resolves_to_original_table() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in 1..=10 {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }

    let mid = TableScan::new(t.clone(), ColumnId(0), ScanOp::GreaterThan, AnyValue::Int32(3))
        .execute()
        .unwrap();
    assert_eq!(int_col_values(&mid), vec![4, 5, 6, 7, 8, 9, 10]);

    let out = TableScan::new(mid.clone(), ColumnId(0), ScanOp::LessThan, AnyValue::Int32(8))
        .execute()
        .unwrap();
    assert_eq!(int_col_values(&out), vec![4, 5, 6, 7]);

    let chunk = out.get_chunk(ChunkId(0)).unwrap();
    let seg = chunk.get_segment(ColumnId(0)).unwrap();
    let reference = seg.as_reference().unwrap();
    assert!(Arc::ptr_eq(&reference.referenced_table, &t));
}

#[test]
fn compress_chunk_rejects_a_non_full_chunk() {
    let t = int_string_table(2);
    for i in 0..7 {
        t.append(&[AnyValue::Int32(i), AnyValue::str("x")]).unwrap();
    }
    assert_eq!(t.chunk_count(), 4);
    t.compress_chunk(ChunkId(1)).unwrap();
    let err = t.compress_chunk(ChunkId(3)).unwrap_err();
    assert!(matches!(err, colstore_core::error::StoreError::ChunkNotFull(_)));
}

#[test]
fn chained_scans_match_a_single_conjunctive_filter() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in [1, 5, 3, 8, 2, 9, 4, 7, 6, 10] {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }

    let mid = TableScan::new(t.clone(), ColumnId(0), ScanOp::GreaterThanEquals, AnyValue::Int32(4))
        .execute()
        .unwrap();
    let chained = TableScan::new(mid, ColumnId(0), ScanOp::LessThanEquals, AnyValue::Int32(8))
        .execute()
        .unwrap();

    let mut direct: Vec<i32> =
        [1, 5, 3, 8, 2, 9, 4, 7, 6, 10].into_iter().filter(|v| *v >= 4 && *v <= 8).collect();
    let mut via_chain = int_col_values(&chained);
    direct.sort_unstable();
    via_chain.sort_unstable();
    assert_eq!(direct, via_chain);
}

#[test]
fn scan_of_a_reference_segment_does_not_point_back_at_it() {
    let t = Table::new(10);
    t.add_column("a", DataType::Int32).unwrap();
    for v in 1..=10 {
        t.append(&[AnyValue::Int32(v)]).unwrap();
    }

    let mid = TableScan::new(t.clone(), ColumnId(0), ScanOp::GreaterThan, AnyValue::Int32(2))
        .execute()
        .unwrap();
    let out = TableScan::new(mid.clone(), ColumnId(0), ScanOp::LessThan, AnyValue::Int32(9))
        .execute()
        .unwrap();

    let chunk = out.get_chunk(ChunkId(0)).unwrap();
    let seg = chunk.get_segment(ColumnId(0)).unwrap();
    let reference = seg.as_reference().unwrap();
    assert!(!Arc::ptr_eq(&reference.referenced_table, &mid));
    assert!(Arc::ptr_eq(&reference.referenced_table, &t));
}

#[test]
fn empty_scan_result_has_a_single_empty_chunk() {
    let t = int_string_table(5);
    t.append(&[AnyValue::Int32(1), AnyValue::str("x")]).unwrap();

    let out = TableScan::new(t.clone(), ColumnId(0), ScanOp::GreaterThan, AnyValue::Int32(999))
        .execute()
        .unwrap();

    assert_eq!(out.chunk_count(), 1);
    assert_eq!(out.get_chunk(ChunkId(0)).unwrap().size(), 0);
    assert_eq!(out.column_names(), t.column_names());
}
