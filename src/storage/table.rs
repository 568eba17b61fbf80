//! [`Table`]: an ordered sequence of chunks plus the schema and chunk-size
//! policy that governs how rows are partitioned into them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{store_bail, store_ensure, StoreResult};
use crate::storage::chunk::Chunk;
use crate::storage::segment::Segment;
use crate::types::{AnyValue, ChunkId, ColumnId, DataType};

/// Ordered sequence of chunks, schema (`column_names`/`column_types`,
/// indexed by [`ColumnId`]), and the `chunk_size` policy.
///
/// The chunk-list `RwLock` is the only concurrency point in the store:
/// `get_chunk` takes the read lock only long enough to clone an `Arc`
/// handle out of the vector; `compress_chunk` takes the write lock only to
/// swap one slot, with the compressed chunk itself built beforehand against
/// a lock-free snapshot read.
#[derive(Debug)]
pub struct Table {
    chunk_size: usize,
    column_names: RwLock<Vec<String>>,
    column_types: RwLock<Vec<DataType>>,
    schema_frozen: AtomicBool,
    chunks: RwLock<Vec<Arc<Chunk>>>,
}

impl Table {
    pub fn new(chunk_size: usize) -> Arc<Self> {
        Arc::new(Table {
            chunk_size,
            column_names: RwLock::new(Vec::new()),
            column_types: RwLock::new(Vec::new()),
            schema_frozen: AtomicBool::new(false),
            chunks: RwLock::new(Vec::new()),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn column_count(&self) -> usize {
        self.column_types.read().len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.column_names.read().clone()
    }

    pub fn column_name(&self, column_id: ColumnId) -> StoreResult<String> {
        let names = self.column_names.read();
        names.get(column_id.index()).cloned().ok_or_else(|| {
            crate::error::StoreError::OutOfBounds(format!(
                "column id {} >= column count {}",
                column_id.0,
                names.len()
            ))
        })
    }

    pub fn column_type(&self, column_id: ColumnId) -> StoreResult<DataType> {
        let types = self.column_types.read();
        types.get(column_id.index()).copied().ok_or_else(|| {
            crate::error::StoreError::OutOfBounds(format!(
                "column id {} >= column count {}",
                column_id.0,
                types.len()
            ))
        })
    }

    pub fn column_id_by_name(&self, name: &str) -> StoreResult<ColumnId> {
        let names = self.column_names.read();
        match names.iter().position(|n| n == name) {
            Some(idx) => Ok(ColumnId(idx as u16)),
            None => store_bail!(UnknownColumnName: "no column named '{name}'"),
        }
    }

    pub fn row_count(&self) -> usize {
        let chunks = self.chunks.read();
        chunks.iter().map(|c| c.size()).sum()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Appends a fresh value-segment column. Fails with `SchemaFrozen` once
    /// the table has any rows.
    pub fn add_column(&self, name: &str, data_type: DataType) -> StoreResult<()> {
        store_ensure!(
            !self.schema_frozen.load(Ordering::Acquire),
            SchemaFrozen: "cannot add column '{name}': table already has rows"
        );
        self.column_names.write().push(name.to_string());
        self.column_types.write().push(data_type);

        let mut chunks = self.chunks.write();
        if chunks.is_empty() {
            chunks.push(Arc::new(Chunk::new()));
        }
        // `add_segment` only needs `&Chunk`, so this mutates the still-empty
        // ingest chunk in place even while another `Arc<Chunk>` handle to it
        // (e.g. from a concurrent `get_chunk`) is alive.
        chunks.last().unwrap().add_segment(Segment::empty(data_type));
        Ok(())
    }

    fn current_chunk_is_full(chunks: &[Arc<Chunk>], chunk_size: usize) -> bool {
        chunks.last().map(|c| c.size() >= chunk_size).unwrap_or(true)
    }

    fn fresh_chunk(&self) -> Chunk {
        let types = self.column_types.read();
        let chunk = Chunk::new();
        for dt in types.iter() {
            chunk.add_segment(Segment::empty(*dt));
        }
        chunk
    }

    /// Appends one row. Allocates a fresh ingest chunk first if the current
    /// one is full (or if this is the table's very first row).
    pub fn append(&self, values: &[AnyValue<'_>]) -> StoreResult<()> {
        self.schema_frozen.store(true, Ordering::Release);
        let mut chunks = self.chunks.write();
        if chunks.is_empty() || Self::current_chunk_is_full(&chunks, self.chunk_size) {
            chunks.push(Arc::new(self.fresh_chunk()));
        }
        chunks.last().expect("just pushed or already non-empty").append(values)
    }

    /// Inserts a pre-built chunk.
    ///
    /// Once the table already has rows, `emplace_chunk` always appends the
    /// chunk as a new, independent entry — it does not require the current
    /// chunk to be full first (see DESIGN.md for why this rule was chosen
    /// over the alternative). When the table is empty, the emplaced chunk
    /// replaces the (empty) first chunk slot rather than being appended
    /// after it.
    pub fn emplace_chunk(&self, chunk: Chunk) -> StoreResult<()> {
        store_ensure!(
            chunk.size() <= self.chunk_size,
            ArityMismatch: "emplaced chunk has {} rows, exceeds chunk_size {}",
            chunk.size(), self.chunk_size
        );
        store_ensure!(
            chunk.column_count() == self.column_count(),
            ArityMismatch: "emplaced chunk has {} columns, table has {}",
            chunk.column_count(), self.column_count()
        );
        self.schema_frozen.store(true, Ordering::Release);
        let mut chunks = self.chunks.write();
        if self.row_count_locked(&chunks) == 0 {
            if chunks.is_empty() {
                chunks.push(Arc::new(chunk));
            } else {
                chunks[0] = Arc::new(chunk);
            }
        } else {
            chunks.push(Arc::new(chunk));
        }
        Ok(())
    }

    fn row_count_locked(&self, chunks: &[Arc<Chunk>]) -> usize {
        chunks.iter().map(|c| c.size()).sum()
    }

    /// Read access to a chunk by id. The returned `Arc` is independent of
    /// the read lock, which is released as soon as the clone is made.
    pub fn get_chunk(&self, chunk_id: ChunkId) -> StoreResult<Arc<Chunk>> {
        let chunks = self.chunks.read();
        let idx = chunk_id.index();
        chunks.get(idx).cloned().ok_or_else(|| {
            crate::error::StoreError::OutOfBounds(format!(
                "chunk id {} >= chunk count {}",
                idx,
                chunks.len()
            ))
        })
    }

    /// Builds a dictionary-compressed replacement for chunk `chunk_id` and
    /// atomically swaps it into place. Fails with `ChunkNotFull` unless the
    /// target chunk currently holds exactly `chunk_size` rows.
    pub fn compress_chunk(&self, chunk_id: ChunkId) -> StoreResult<()> {
        let source = self.get_chunk(chunk_id)?;
        store_ensure!(
            source.size() == self.chunk_size,
            ChunkNotFull: "chunk {} has {} rows, chunk_size is {}",
            chunk_id.0, source.size(), self.chunk_size
        );
        log::debug!(
            "compressing chunk {} ({} rows, {} columns)",
            chunk_id.0,
            source.size(),
            source.column_count()
        );
        let compressed: Vec<Segment> = (0..source.column_count())
            .map(|i| {
                source
                    .get_segment(ColumnId(i as u16))
                    .expect("i ranges over source.column_count()")
                    .compress()
            })
            .collect();
        let replacement = Arc::new(Chunk::with_segments(compressed));

        let mut chunks = self.chunks.write();
        let idx = chunk_id.index();
        store_ensure!(
            idx < chunks.len(),
            OutOfBounds: "chunk id {} >= chunk count {}", idx, chunks.len()
        );
        chunks[idx] = replacement;
        log::debug!("chunk {} compressed", chunk_id.0);
        Ok(())
    }
}
