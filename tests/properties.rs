//! Property tests for the storage and scan model's core invariants. Each
//! test generates arbitrary inputs via `proptest` and checks one invariant
//! holds regardless of the specific values drawn.

use proptest::prelude::*;

use colstore_core::scan::ScanOp;
use colstore_core::storage::{DictionarySegment, Table, ValueSegment};
use colstore_core::types::{AnyValue, ChunkId, ColumnId, DataType};

fn value_segment_of(values: &[i32]) -> ValueSegment<i32> {
    let mut seg = ValueSegment::<i32>::new();
    for v in values {
        seg.append(&AnyValue::Int32(*v)).unwrap();
    }
    seg
}

fn apply_op(op: ScanOp, a: i32, b: i32) -> bool {
    match op {
        ScanOp::Equals => a == b,
        ScanOp::NotEquals => a != b,
        ScanOp::LessThan => a < b,
        ScanOp::LessThanEquals => a <= b,
        ScanOp::GreaterThan => a > b,
        ScanOp::GreaterThanEquals => a >= b,
    }
}

fn all_ops() -> [ScanOp; 6] {
    [
        ScanOp::Equals,
        ScanOp::NotEquals,
        ScanOp::LessThan,
        ScanOp::LessThanEquals,
        ScanOp::GreaterThan,
        ScanOp::GreaterThanEquals,
    ]
}

proptest! {
    /// Once a table has a row, `add_column` fails and the row count does
    /// not change.
    #[test]
    fn schema_is_frozen_once_a_row_exists(chunk_size in 1usize..8, first_value in -100i32..100) {
        let t = Table::new(chunk_size);
        t.add_column("a", DataType::Int32).unwrap();
        t.append(&[AnyValue::Int32(first_value)]).unwrap();
        let before = t.row_count();

        let err = t.add_column("b", DataType::Int32).unwrap_err();
        prop_assert!(matches!(err, colstore_core::error::StoreError::SchemaFrozen(_)));
        prop_assert_eq!(t.row_count(), before);
    }

    /// For a table built only via `append`, row count equals the sum of
    /// chunk sizes and chunk count tracks `ceil(row_count / chunk_size)`.
    #[test]
    fn row_count_and_chunk_count_stay_consistent_with_appends(chunk_size in 1usize..8, n_rows in 0usize..40) {
        let t = Table::new(chunk_size);
        t.add_column("a", DataType::Int32).unwrap();
        for i in 0..n_rows {
            t.append(&[AnyValue::Int32(i as i32)]).unwrap();
        }

        let summed: usize = (0..t.chunk_count())
            .map(|k| t.get_chunk(ChunkId(k as u32)).unwrap().size())
            .sum();
        prop_assert_eq!(t.row_count(), summed);
        prop_assert_eq!(t.row_count(), n_rows);

        if n_rows == 0 {
            prop_assert_eq!(t.chunk_count(), 1);
        } else {
            prop_assert_eq!(t.chunk_count(), n_rows.div_ceil(chunk_size));
        }
    }

    /// Every row reads back the same value after dictionary compression.
    #[test]
    fn dictionary_segment_round_trips_every_row(values in prop::collection::vec(-50i32..50, 0..200)) {
        let seg = value_segment_of(&values);
        let dict = DictionarySegment::build(&seg);
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(dict.get_any(i).unwrap(), AnyValue::Int32(*v));
        }
    }

    /// The dictionary domain is strictly increasing: sorted and deduplicated.
    #[test]
    fn dictionary_domain_is_strictly_increasing(values in prop::collection::vec(-50i32..50, 0..200)) {
        let seg = value_segment_of(&values);
        let dict = DictionarySegment::build(&seg);
        let domain = dict.dictionary();
        for w in domain.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
    }

    /// The attribute vector's width is the smallest of {1,2,4} bytes that
    /// can represent every id in the domain.
    #[test]
    fn attribute_vector_width_fits_the_domain_exactly(values in prop::collection::vec(-50i32..50, 0..200)) {
        let seg = value_segment_of(&values);
        let dict = DictionarySegment::build(&seg);
        let domain_len = dict.dictionary().len();
        let width = dict.attribute_vector().width();

        let max_representable = match width {
            1 => u8::MAX as usize,
            2 => u16::MAX as usize,
            4 => u32::MAX as usize,
            other => panic!("unexpected width {other}"),
        };
        prop_assert!(max_representable + 1 >= domain_len);
        // and it's the *smallest* such width
        if width > 1 {
            let smaller_max = match width {
                2 => u8::MAX as usize,
                4 => u16::MAX as usize,
                _ => unreachable!(),
            };
            prop_assert!(domain_len > smaller_max);
        }
    }

    /// A scan over a value segment returns exactly the offsets where the
    /// predicate holds, in order.
    #[test]
    fn value_segment_scan_returns_exactly_the_matching_offsets(
        values in prop::collection::vec(-20i32..20, 0..100),
        cmp in -20i32..20,
        op_idx in 0usize..6,
    ) {
        let op = all_ops()[op_idx];
        let chunk = {
            let t = Table::new(values.len().max(1));
            t.add_column("a", DataType::Int32).unwrap();
            for v in &values {
                t.append(&[AnyValue::Int32(*v)]).unwrap();
            }
            t.get_chunk(ChunkId(0)).unwrap()
        };
        let seg = chunk.get_segment(ColumnId(0)).unwrap();
        let result = colstore_core::scan::scanner::scan(ChunkId(0), &seg, op, &AnyValue::Int32(cmp)).unwrap();

        let expected: Vec<u32> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| apply_op(op, **v, cmp))
            .map(|(i, _)| i as u32)
            .collect();
        let actual: Vec<u32> = result.iter().map(|r| r.chunk_offset.0).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Scanning a value segment and its dictionary-compressed form give the
    /// same result, across all six operators.
    #[test]
    fn scan_results_agree_between_value_and_dictionary_encodings(
        values in prop::collection::vec(-20i32..20, 0..100),
        cmp in -20i32..20,
    ) {
        let chunk = {
            let t = Table::new(values.len().max(1));
            t.add_column("a", DataType::Int32).unwrap();
            for v in &values {
                t.append(&[AnyValue::Int32(*v)]).unwrap();
            }
            t.get_chunk(ChunkId(0)).unwrap()
        };
        let value_seg = chunk.get_segment(ColumnId(0)).unwrap();
        let dict_seg = value_seg.compress();

        for op in all_ops() {
            let via_value =
                colstore_core::scan::scanner::scan(ChunkId(0), &value_seg, op, &AnyValue::Int32(cmp)).unwrap();
            let via_dict =
                colstore_core::scan::scanner::scan(ChunkId(0), &dict_seg, op, &AnyValue::Int32(cmp)).unwrap();
            let value_offsets: Vec<u32> = via_value.iter().map(|r| r.chunk_offset.0).collect();
            let dict_offsets: Vec<u32> = via_dict.iter().map(|r| r.chunk_offset.0).collect();
            prop_assert_eq!(value_offsets, dict_offsets);
        }
    }
}
