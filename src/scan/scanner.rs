//! The predicate scanner: per-operator, per-type evaluation over all three
//! segment variants, producing a [`PosList`] of matching rows.
//!
//! The value, dictionary, and reference paths are each a free function here
//! rather than a trait object, so the per-row comparison is a monomorphized
//! direct call — no virtual dispatch per element.

use crate::error::StoreResult;
use crate::scan::operator::ScanOp;
use crate::storage::attribute_vector::AttributeVector;
use crate::storage::dictionary_segment::DictionarySegment;
use crate::storage::reference_segment::ReferenceSegment;
use crate::storage::segment::{Segment, SegmentData};
use crate::types::{AnyValue, ChunkId, ChunkOffset, PosList, RowId, Scalar, ValueId, INVALID_VALUE_ID};

/// Public entry point: evaluate `op cmp` against every row of `segment`,
/// which lives in chunk `chunk_id`.
pub fn scan(chunk_id: ChunkId, segment: &Segment, op: ScanOp, cmp: &AnyValue<'_>) -> StoreResult<PosList> {
    scan_restricted(chunk_id, segment, op, cmp, None)
}

/// Same as [`scan`], but restricted to the listed offsets when `Some` (used
/// by the reference-segment path to avoid scanning rows the caller doesn't
/// need).
fn scan_restricted(
    chunk_id: ChunkId,
    segment: &Segment,
    op: ScanOp,
    cmp: &AnyValue<'_>,
    offsets: Option<&[ChunkOffset]>,
) -> StoreResult<PosList> {
    match segment {
        Segment::Int32(s) => scan_typed(chunk_id, s, op, &i32::try_from_any_value(cmp)?, offsets),
        Segment::Int64(s) => scan_typed(chunk_id, s, op, &i64::try_from_any_value(cmp)?, offsets),
        Segment::Float32(s) => scan_typed(chunk_id, s, op, &f32::try_from_any_value(cmp)?, offsets),
        Segment::Float64(s) => scan_typed(chunk_id, s, op, &f64::try_from_any_value(cmp)?, offsets),
        Segment::Str(s) => scan_typed(chunk_id, s, op, &String::try_from_any_value(cmp)?, offsets),
    }
}

fn scan_typed<T: Scalar>(
    chunk_id: ChunkId,
    seg: &SegmentData<T>,
    op: ScanOp,
    cmp: &T,
    offsets: Option<&[ChunkOffset]>,
) -> StoreResult<PosList> {
    match seg {
        SegmentData::Value(v) => Ok(scan_value(chunk_id, v.values(), op, cmp, offsets)),
        SegmentData::Dictionary(d) => Ok(scan_dictionary(chunk_id, d, op, cmp, offsets)),
        SegmentData::Reference(r) => scan_reference(op, &cmp.to_any_value(), r, offsets),
    }
}

/// Fast path: direct element-wise comparison against the dense backing
/// array.
fn scan_value<T: PartialOrd>(
    chunk_id: ChunkId,
    values: &[T],
    op: ScanOp,
    cmp: &T,
    offsets: Option<&[ChunkOffset]>,
) -> PosList {
    let mut out = PosList::new();
    let check = |i: usize| values[i].partial_cmp(cmp).map(|ord| op.apply(ord)).unwrap_or(false);
    match offsets {
        None => {
            for i in 0..values.len() {
                if check(i) {
                    out.push(RowId::new(chunk_id, ChunkOffset(i as u32)));
                }
            }
        }
        Some(offs) => {
            for &o in offs {
                if check(o.index()) {
                    out.push(RowId::new(chunk_id, o));
                }
            }
        }
    }
    out
}

/// Translates the predicate into value-id space once via
/// `lower_bound`/`upper_bound`, then scans the attribute vector. Each
/// operator picks whichever boundary query and id comparison actually
/// matches its semantics (e.g. `<` needs `lower_bound` and `id < id*`, `>`
/// needs `upper_bound` and `id >= id*`) — getting this pairing wrong per
/// operator is the easiest way to silently corrupt dictionary-path scans.
fn scan_dictionary<T: Scalar>(
    chunk_id: ChunkId,
    seg: &DictionarySegment<T>,
    op: ScanOp,
    cmp: &T,
    offsets: Option<&[ChunkOffset]>,
) -> PosList {
    let mut out = PosList::new();
    let attr = seg.attribute_vector();

    match op {
        ScanOp::LessThan => {
            let id_star = seg.lower_bound(cmp);
            if id_star.0 != 0 {
                scan_ids(chunk_id, attr, offsets, |id| id.0 < id_star.0, &mut out);
            }
        }
        ScanOp::LessThanEquals => {
            let id_star = seg.upper_bound(cmp);
            if id_star.0 != 0 {
                scan_ids(chunk_id, attr, offsets, |id| id.0 < id_star.0, &mut out);
            }
        }
        ScanOp::GreaterThan => {
            let id_star = seg.upper_bound(cmp);
            if id_star != INVALID_VALUE_ID {
                scan_ids(chunk_id, attr, offsets, |id| id.0 >= id_star.0, &mut out);
            }
        }
        ScanOp::GreaterThanEquals => {
            let id_star = seg.lower_bound(cmp);
            if id_star != INVALID_VALUE_ID {
                scan_ids(chunk_id, attr, offsets, |id| id.0 >= id_star.0, &mut out);
            }
        }
        ScanOp::Equals => {
            if let Some(id_star) = exact_id(seg, cmp) {
                scan_ids(chunk_id, attr, offsets, |id| id.0 == id_star.0, &mut out);
            }
        }
        ScanOp::NotEquals => match exact_id(seg, cmp) {
            Some(id_star) => scan_ids(chunk_id, attr, offsets, |id| id.0 != id_star.0, &mut out),
            None => scan_ids(chunk_id, attr, offsets, |_| true, &mut out),
        },
    }
    out
}

/// `lower_bound(cmp)`, downgraded to `None` unless the dictionary entry at
/// that id is exactly equal to `cmp` (the `=`/`!=` boundary query).
fn exact_id<T: Scalar>(seg: &DictionarySegment<T>, cmp: &T) -> Option<ValueId> {
    let id_star = seg.lower_bound(cmp);
    if id_star == INVALID_VALUE_ID {
        return None;
    }
    if seg.value_by_value_id(id_star) == cmp {
        Some(id_star)
    } else {
        None
    }
}

fn scan_ids(
    chunk_id: ChunkId,
    attr: &AttributeVector,
    offsets: Option<&[ChunkOffset]>,
    matches: impl Fn(ValueId) -> bool,
    out: &mut PosList,
) {
    match offsets {
        None => {
            for i in 0..attr.size() {
                if matches(attr.get(i)) {
                    out.push(RowId::new(chunk_id, ChunkOffset(i as u32)));
                }
            }
        }
        Some(offs) => {
            for &o in offs {
                if matches(attr.get(o.index())) {
                    out.push(RowId::new(chunk_id, o));
                }
            }
        }
    }
}

/// Walks the position list in maximal runs of equal `chunk_id`, evaluating
/// the predicate against the underlying segment restricted to each run's
/// offsets, and concatenating the runs in order. Emitted `RowId`s always
/// carry the underlying `(chunk_id, chunk_offset)` — never the outer scan's
/// chunk id — so a chain of scans over reference segments still resolves
/// back to the original data's coordinates instead of drifting to whatever
/// chunk id the outer scan happened to be looking at.
fn scan_reference(
    op: ScanOp,
    cmp: &AnyValue<'_>,
    r: &ReferenceSegment,
    offsets: Option<&[ChunkOffset]>,
) -> StoreResult<PosList> {
    let positions: Vec<RowId> = match offsets {
        None => r.pos_list.to_vec(),
        Some(offs) => offs.iter().map(|&o| r.pos_list[o.index()]).collect(),
    };

    let mut out = PosList::new();
    let mut i = 0;
    while i < positions.len() {
        let run_chunk_id = positions[i].chunk_id;
        let mut j = i + 1;
        while j < positions.len() && positions[j].chunk_id == run_chunk_id {
            j += 1;
        }
        let run_offsets: Vec<ChunkOffset> = positions[i..j].iter().map(|p| p.chunk_offset).collect();

        let chunk = r.referenced_table.get_chunk(run_chunk_id)?;
        let segment = chunk.get_segment(r.referenced_column_id)?;
        let sub = scan_restricted(run_chunk_id, &segment, op, cmp, Some(&run_offsets))?;
        out.extend(sub.into_inner());
        i = j;
    }
    Ok(out)
}
