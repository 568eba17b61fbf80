//! Core of an in-memory column store.
//!
//! Tables are ordered sequences of fixed-size row partitions ("chunks");
//! each chunk holds one segment per column, stored either as a dense value
//! sequence or as a dictionary-compressed sequence. [`scan::TableScan`]
//! evaluates a predicate over one column of a table chunk-by-chunk and
//! materializes its result as reference segments — zero-copy views back
//! into the original data — rather than copying matching rows.
//!
//! This crate has no SQL parser, planner, or optimizer: operators are
//! constructed programmatically. There is no join, aggregation, projection,
//! or sort — only table construction ([`storage`]) and table scan
//! ([`scan`]).

pub mod error;
pub mod loader;
pub mod logging;
pub mod scan;
pub mod storage;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use storage::{Chunk, StorageManager, Table};
pub use types::{AnyValue, ChunkId, ChunkOffset, ColumnId, DataType, PosList, RowId, ValueId};
