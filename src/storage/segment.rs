//! The tagged union over the three segment variants (value / dictionary /
//! reference), crossed with the five scalar types. A closed `match` stands
//! in for the base-class-plus-downcast polymorphism a dynamically typed or
//! object-oriented implementation would reach for here, so every
//! segment-variant/type combination is enumerated at compile time instead of
//! resolved at runtime.

use crate::error::{store_bail, StoreResult};
use crate::storage::dictionary_segment::DictionarySegment;
use crate::storage::reference_segment::ReferenceSegment;
use crate::storage::value_segment::ValueSegment;
use crate::types::{AnyValue, DataType, Scalar};

/// One column's storage for one type `T`: either a dense, appendable value
/// sequence, an immutable dictionary-compressed sequence, or an immutable
/// zero-copy view into another table.
#[derive(Debug, Clone)]
pub enum SegmentData<T> {
    Value(ValueSegment<T>),
    Dictionary(DictionarySegment<T>),
    Reference(ReferenceSegment),
}

impl<T: Scalar> SegmentData<T> {
    pub fn size(&self) -> usize {
        match self {
            SegmentData::Value(v) => v.size(),
            SegmentData::Dictionary(d) => d.size(),
            SegmentData::Reference(r) => r.size(),
        }
    }

    pub fn get_any(&self, offset: usize) -> StoreResult<AnyValue<'static>> {
        match self {
            SegmentData::Value(v) => v.get_any(offset),
            SegmentData::Dictionary(d) => d.get_any(offset),
            SegmentData::Reference(r) => r.get_any(offset),
        }
    }

    pub fn append(&mut self, value: &AnyValue<'_>) -> StoreResult<()> {
        match self {
            SegmentData::Value(v) => v.append(value),
            SegmentData::Dictionary(d) => d.append(value),
            SegmentData::Reference(r) => r.append(value),
        }
    }

    pub fn is_appendable(&self) -> bool {
        matches!(self, SegmentData::Value(_))
    }
}

/// The dtype-erased, per-column segment stored inside a [`super::chunk::Chunk`].
///
/// One arm per scalar type, each holding a [`SegmentData<T>`]. This is the
/// type callers actually hold a handle to; `Segment::data_type()` plus the
/// usual `match` recovers the concrete `T` at the few call sites that need
/// it (dictionary compression, the scanner's type dispatch).
#[derive(Debug, Clone)]
pub enum Segment {
    Int32(SegmentData<i32>),
    Int64(SegmentData<i64>),
    Float32(SegmentData<f32>),
    Float64(SegmentData<f64>),
    Str(SegmentData<String>),
}

macro_rules! for_each_arm {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Segment::Int32($inner) => $body,
            Segment::Int64($inner) => $body,
            Segment::Float32($inner) => $body,
            Segment::Float64($inner) => $body,
            Segment::Str($inner) => $body,
        }
    };
}

impl Segment {
    pub fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Int32 => Segment::Int32(SegmentData::Value(ValueSegment::new())),
            DataType::Int64 => Segment::Int64(SegmentData::Value(ValueSegment::new())),
            DataType::Float32 => Segment::Float32(SegmentData::Value(ValueSegment::new())),
            DataType::Float64 => Segment::Float64(SegmentData::Value(ValueSegment::new())),
            DataType::Str => Segment::Str(SegmentData::Value(ValueSegment::new())),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Segment::Int32(_) => DataType::Int32,
            Segment::Int64(_) => DataType::Int64,
            Segment::Float32(_) => DataType::Float32,
            Segment::Float64(_) => DataType::Float64,
            Segment::Str(_) => DataType::Str,
        }
    }

    pub fn size(&self) -> usize {
        for_each_arm!(self, s => s.size())
    }

    pub fn get_any(&self, offset: usize) -> StoreResult<AnyValue<'static>> {
        for_each_arm!(self, s => s.get_any(offset))
    }

    pub fn append(&mut self, value: &AnyValue<'_>) -> StoreResult<()> {
        for_each_arm!(self, s => s.append(value))
    }

    pub fn is_appendable(&self) -> bool {
        for_each_arm!(self, s => s.is_appendable())
    }

    pub fn is_reference(&self) -> bool {
        for_each_arm!(self, s => matches!(s, SegmentData::Reference(_)))
    }

    /// Builds a dictionary-compressed replacement for this segment,
    /// dispatching on the column's type tag to call the right
    /// `DictionarySegment::build` monomorphization. A non-value segment
    /// (already dictionary- or reference-encoded) is returned unchanged.
    pub fn compress(&self) -> Self {
        match self {
            Segment::Int32(SegmentData::Value(v)) => {
                Segment::Int32(SegmentData::Dictionary(DictionarySegment::build(v)))
            }
            Segment::Int64(SegmentData::Value(v)) => {
                Segment::Int64(SegmentData::Dictionary(DictionarySegment::build(v)))
            }
            Segment::Float32(SegmentData::Value(v)) => {
                Segment::Float32(SegmentData::Dictionary(DictionarySegment::build(v)))
            }
            Segment::Float64(SegmentData::Value(v)) => {
                Segment::Float64(SegmentData::Dictionary(DictionarySegment::build(v)))
            }
            Segment::Str(SegmentData::Value(v)) => {
                Segment::Str(SegmentData::Dictionary(DictionarySegment::build(v)))
            }
            other => other.clone(),
        }
    }

    pub fn as_reference(&self) -> StoreResult<&ReferenceSegment> {
        for_each_arm!(self, s => match s {
            SegmentData::Reference(r) => Ok(r),
            _ => store_bail!(UnsupportedSegment: "expected a reference segment"),
        })
    }
}
