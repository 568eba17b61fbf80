//! [`ReferenceSegment`]: a zero-copy view over selected rows of another
//! table's column, expressed as a position list.

use std::sync::Arc;

use crate::error::{store_bail, store_ensure, StoreResult};
use crate::storage::table::Table;
use crate::types::{AnyValue, ColumnId, PosList};

/// `(referenced_table, referenced_column_id, pos_list)`. Immutable:
/// `append` always fails with `ImmutableSegment`.
///
/// Invariant enforced at construction: `referenced_column_id <
/// referenced_table.column_count()`.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    pub referenced_table: Arc<Table>,
    pub referenced_column_id: ColumnId,
    pub pos_list: Arc<PosList>,
}

impl ReferenceSegment {
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        pos_list: Arc<PosList>,
    ) -> StoreResult<Self> {
        store_ensure!(
            referenced_column_id.index() < referenced_table.column_count(),
            OutOfBounds: "referenced column {} >= column count {}",
            referenced_column_id.0, referenced_table.column_count()
        );
        Ok(ReferenceSegment { referenced_table, referenced_column_id, pos_list })
    }

    pub fn size(&self) -> usize {
        self.pos_list.len()
    }

    /// `referenced_table.chunk(pos_list[i].chunk_id).segment(referenced_column_id)[pos_list[i].chunk_offset]`
    pub fn get_any(&self, i: usize) -> StoreResult<AnyValue<'static>> {
        let Some(row) = self.pos_list.get(i) else {
            store_bail!(OutOfBounds: "reference segment offset {i} >= size {}", self.pos_list.len());
        };
        let chunk = self.referenced_table.get_chunk(row.chunk_id)?;
        let segment = chunk.get_segment(self.referenced_column_id)?;
        segment.get_any(row.chunk_offset.index())
    }

    pub fn append(&mut self, _value: &AnyValue<'_>) -> StoreResult<()> {
        store_bail!(ImmutableSegment: "cannot append to a reference segment")
    }
}
