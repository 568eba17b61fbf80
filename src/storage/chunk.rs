//! [`Chunk`]: an ordered collection of segments sharing a row count.

use parking_lot::RwLock;

use crate::error::{store_bail, store_ensure, StoreResult};
use crate::storage::segment::Segment;
use crate::types::{AnyValue, ColumnId};

/// One row partition of a [`super::table::Table`]: one segment per column,
/// all sharing the same row count (except transiently during construction).
///
/// The segment list itself lives behind a lock, and each column's segment
/// lives behind its own lock in turn, so columns can be appended to the
/// schema (`add_segment`) and appended to with row data (`append`) through a
/// shared `&Chunk` — a table handle passed around as `Arc<Chunk>` never needs
/// exclusive ownership back to mutate the chunk it points at.
#[derive(Debug)]
pub struct Chunk {
    segments: RwLock<Vec<RwLock<Segment>>>,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk { segments: RwLock::new(Vec::new()) }
    }

    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Chunk { segments: RwLock::new(segments.into_iter().map(RwLock::new).collect()) }
    }

    /// Appends a freshly created segment. Only valid during schema setup
    /// (building a brand-new chunk), not on a chunk already carrying rows.
    pub fn add_segment(&self, segment: Segment) {
        self.segments.write().push(RwLock::new(segment));
    }

    pub fn column_count(&self) -> usize {
        self.segments.read().len()
    }

    /// `segments[0].size()`, or 0 if the chunk has no columns.
    pub fn size(&self) -> usize {
        self.segments.read().first().map(|s| s.read().size()).unwrap_or(0)
    }

    /// A snapshot clone of the segment at `column_id`. Segments are cheap to
    /// clone (value segments share no interior mutability with the clone;
    /// dictionary/reference segments are immutable/`Arc`-backed), so this
    /// reads as a consistent point-in-time view without holding the lock
    /// past the call.
    pub fn get_segment(&self, column_id: ColumnId) -> StoreResult<Segment> {
        let idx = column_id.index();
        let segments = self.segments.read();
        let Some(lock) = segments.get(idx) else {
            store_bail!(OutOfBounds: "column id {} >= column count {}", idx, segments.len());
        };
        Ok(lock.read().clone())
    }

    /// Appends one value per column, in column order. Fails with
    /// `ArityMismatch` if `values.len() != column_count()`, or
    /// `ImmutableSegment` if any column's segment isn't currently
    /// appendable (i.e. this isn't the table's ingest chunk).
    pub fn append(&self, values: &[AnyValue<'_>]) -> StoreResult<()> {
        let segments = self.segments.read();
        store_ensure!(
            values.len() == segments.len(),
            ArityMismatch: "tuple has {} values, chunk has {} columns",
            values.len(), segments.len()
        );
        for lock in segments.iter() {
            store_ensure!(
                lock.read().is_appendable(),
                ImmutableSegment: "chunk is no longer the ingest chunk"
            );
        }
        for (lock, value) in segments.iter().zip(values) {
            lock.write().append(value)?;
        }
        Ok(())
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Chunk {
    fn clone(&self) -> Self {
        let segments = self.segments.read();
        Chunk {
            segments: RwLock::new(segments.iter().map(|s| RwLock::new(s.read().clone())).collect()),
        }
    }
}
