//! [`ValueSegment<T>`]: a dense, append-only-until-compressed column chunk.

use crate::error::{store_bail, StoreResult};
use crate::types::{AnyValue, Scalar};

/// Owns a dense sequence of `T`, one element per row of the chunk this
/// segment belongs to. Append-only during ingest; compression replaces the
/// whole segment (see [`super::dictionary_segment::DictionarySegment`])
/// rather than mutating it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSegment<T> {
    values: Vec<T>,
}

impl<T: Scalar> ValueSegment<T> {
    pub fn new() -> Self {
        ValueSegment { values: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        ValueSegment { values: Vec::with_capacity(cap) }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The fast path: a read-only view of the dense backing array, used by
    /// the scanner's value-segment path instead of `get_any`.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn append(&mut self, value: &AnyValue<'_>) -> StoreResult<()> {
        let coerced = T::try_from_any_value(value)?;
        self.values.push(coerced);
        Ok(())
    }

    /// Element access via the type-erased `AnyValue`. Spec calls this the
    /// "slow path": fine for debugging, never used by the scanner's hot
    /// loop.
    pub fn get_any(&self, offset: usize) -> StoreResult<AnyValue<'static>> {
        let Some(v) = self.values.get(offset) else {
            store_bail!(OutOfBounds: "value segment offset {offset} >= size {}", self.values.len());
        };
        log::trace!("value segment slow-path element access at offset {offset}");
        Ok(v.to_any_value())
    }
}

impl<T: Scalar> Default for ValueSegment<T> {
    fn default() -> Self {
        Self::new()
    }
}
