//! Crate-wide error type.
//!
//! A flat enum, a manual `Display` impl rather than `thiserror`, and a pair
//! of macros (`store_bail!`, `store_ensure!`) that read like early-return
//! assertions at the call site.

use std::fmt;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// An `AnyValue` could not be coerced to the scalar type a segment or
    /// column demands.
    TypeMismatch(String),
    /// A tuple passed to `Chunk::append`/`Table::append` did not have one
    /// value per column.
    ArityMismatch(String),
    /// `add_column` was called on a table that already holds rows.
    SchemaFrozen(String),
    /// `append` was attempted on a dictionary or reference segment.
    ImmutableSegment(String),
    /// `compress_chunk` was called on a chunk that is not yet full.
    ChunkNotFull(String),
    /// An offset or column id fell outside the valid range.
    OutOfBounds(String),
    /// A scan was requested with an operator the scanner does not know.
    UnsupportedOperator(String),
    /// A scanner received a segment variant it cannot handle.
    UnsupportedSegment(String),
    /// `column_id_by_name` was asked for a name the table doesn't have.
    UnknownColumnName(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StoreError::*;
        match self {
            TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            ArityMismatch(msg) => write!(f, "arity mismatch: {msg}"),
            SchemaFrozen(msg) => write!(f, "schema frozen: {msg}"),
            ImmutableSegment(msg) => write!(f, "immutable segment: {msg}"),
            ChunkNotFull(msg) => write!(f, "chunk not full: {msg}"),
            OutOfBounds(msg) => write!(f, "out of bounds: {msg}"),
            UnsupportedOperator(msg) => write!(f, "unsupported operator: {msg}"),
            UnsupportedSegment(msg) => write!(f, "unsupported segment: {msg}"),
            UnknownColumnName(msg) => write!(f, "unknown column name: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// `store_bail!(Variant: "msg {}", arg)` constructs and returns a [`StoreError`].
macro_rules! store_bail {
    ($variant:ident: $($arg:tt)*) => {
        return Err($crate::error::StoreError::$variant(format!($($arg)*)))
    };
}

/// `store_ensure!(cond, Variant: "msg {}", arg)` bails unless `cond` holds.
macro_rules! store_ensure {
    ($cond:expr, $variant:ident: $($arg:tt)*) => {
        if !$cond {
            store_bail!($variant: $($arg)*);
        }
    };
}

pub(crate) use store_bail;
pub(crate) use store_ensure;
