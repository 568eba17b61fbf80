//! [`TableScan`]: the operator that evaluates a predicate on one column of
//! an input table and materializes an output table of reference segments.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::scan::operator::ScanOp;
use crate::scan::scanner;
use crate::storage::chunk::Chunk;
use crate::storage::reference_segment::ReferenceSegment;
use crate::storage::segment::Segment;
use crate::storage::table::Table;
use crate::types::{AnyValue, ChunkId, ColumnId, PosList};

/// Something that can be asked for an input table — operators are wired up
/// programmatically rather than produced by a query planner, so this is
/// almost always just a previously-built [`Table`], but keeping the trait
/// lets `TableScan` chain onto the output of a prior `TableScan` without
/// caring that it's reference-segment-backed.
pub trait TableSource {
    fn execute(&self) -> Arc<Table>;
}

impl TableSource for Arc<Table> {
    fn execute(&self) -> Arc<Table> {
        self.clone()
    }
}

/// Configured with an input operator, a target column, a scan operator, and
/// a comparison value.
pub struct TableScan<S: TableSource> {
    input: S,
    column_id: ColumnId,
    op: ScanOp,
    cmp: AnyValue<'static>,
}

impl<S: TableSource> TableScan<S> {
    pub fn new(input: S, column_id: ColumnId, op: ScanOp, cmp: AnyValue<'static>) -> Self {
        TableScan { input, column_id, op, cmp }
    }

    /// Runs the scan: mirror the input schema into a fresh output table,
    /// then for each input chunk resolve the target segment, evaluate the
    /// predicate, and emit reference segments over the matching rows.
    pub fn execute(&self) -> StoreResult<Arc<Table>> {
        let input = self.input.execute();
        input.column_type(self.column_id)?; // validates column_id, surfaces OutOfBounds early

        let output = Table::new(input.chunk_size());
        for (name, dt) in input.column_names().into_iter().zip(column_types(&input)?) {
            output.add_column(&name, dt)?;
        }

        let mut any_rows = false;
        for k in 0..input.chunk_count() {
            let chunk_id = ChunkId(k as u32);
            let chunk = input.get_chunk(chunk_id)?;
            let seg = chunk.get_segment(self.column_id)?;
            let positions = scanner::scan(chunk_id, &seg, self.op, &self.cmp)?;
            if positions.is_empty() {
                continue;
            }
            any_rows = true;

            let backing_table = backing_table_for(&input, &seg)?;
            let pos_list = Arc::new(positions);
            let out_chunk = build_reference_chunk(&backing_table, input.column_count(), &pos_list)?;
            output.emplace_chunk(out_chunk)?;
        }

        if !any_rows {
            let empty = Arc::new(PosList::new());
            let out_chunk = build_reference_chunk(&input, input.column_count(), &empty)?;
            output.emplace_chunk(out_chunk)?;
        }

        Ok(output)
    }
}

fn column_types(table: &Arc<Table>) -> StoreResult<Vec<crate::types::DataType>> {
    (0..table.column_count()).map(|i| table.column_type(ColumnId(i as u16))).collect()
}

/// The backing table for the scanned chunk's reference segments: if the
/// scanned segment was itself a reference, its referenced table (so we
/// never chain a reference onto a reference); otherwise the input table.
fn backing_table_for(input: &Arc<Table>, seg: &Segment) -> StoreResult<Arc<Table>> {
    if seg.is_reference() {
        Ok(seg.as_reference()?.referenced_table.clone())
    } else {
        Ok(input.clone())
    }
}

fn build_reference_chunk(
    backing_table: &Arc<Table>,
    column_count: usize,
    pos_list: &Arc<PosList>,
) -> StoreResult<Chunk> {
    let chunk = Chunk::new();
    for j in 0..column_count {
        let reference = ReferenceSegment::new(backing_table.clone(), ColumnId(j as u16), pos_list.clone())?;
        chunk.add_segment(segment_from_reference(reference, backing_table.column_type(ColumnId(j as u16))?));
    }
    Ok(chunk)
}

/// Wraps a dtype-erased [`ReferenceSegment`] into the matching [`Segment`]
/// arm for column `j`'s declared type.
fn segment_from_reference(reference: ReferenceSegment, data_type: crate::types::DataType) -> Segment {
    use crate::storage::segment::SegmentData;
    use crate::types::DataType;
    match data_type {
        DataType::Int32 => Segment::Int32(SegmentData::Reference(reference)),
        DataType::Int64 => Segment::Int64(SegmentData::Reference(reference)),
        DataType::Float32 => Segment::Float32(SegmentData::Reference(reference)),
        DataType::Float64 => Segment::Float64(SegmentData::Reference(reference)),
        DataType::Str => Segment::Str(SegmentData::Reference(reference)),
    }
}
