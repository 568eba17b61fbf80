//! The scalar domain: [`DataType`], [`AnyValue`], the id newtypes, and the
//! [`Scalar`] trait that lets segment code be generic over one concrete
//! column element type at a time.

use std::borrow::Cow;
use std::fmt;

use crate::error::{store_bail, StoreResult};

/// The closed set of column element types this store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int32,
    Int64,
    Float32,
    Float64,
    Str,
}

impl DataType {
    /// Maps a loader/API type name to a [`DataType`]. Centralizes the
    /// string-to-type dispatch so it isn't replicated per call site.
    pub fn from_name(name: &str) -> StoreResult<Self> {
        Ok(match name {
            "int" => DataType::Int32,
            "long" => DataType::Int64,
            "float" => DataType::Float32,
            "double" => DataType::Float64,
            "string" => DataType::Str,
            other => {
                store_bail!(TypeMismatch: "unknown type name '{other}'")
            }
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Int32 => "int",
            DataType::Int64 => "long",
            DataType::Float32 => "float",
            DataType::Float64 => "double",
            DataType::Str => "string",
        };
        f.write_str(s)
    }
}

/// A single scalar value tagged with its type, the currency unit passed
/// across the public API (`append`, scan comparison values, debug element
/// access).
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue<'a> {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Str(Cow<'a, str>),
}

impl<'a> AnyValue<'a> {
    pub fn data_type(&self) -> DataType {
        match self {
            AnyValue::Int32(_) => DataType::Int32,
            AnyValue::Int64(_) => DataType::Int64,
            AnyValue::Float32(_) => DataType::Float32,
            AnyValue::Float64(_) => DataType::Float64,
            AnyValue::Str(_) => DataType::Str,
        }
    }

    /// Borrowing constructor used on the hot comparison path so callers
    /// don't need to allocate a `String` just to compare against `&str`.
    pub fn str(s: &'a str) -> Self {
        AnyValue::Str(Cow::Borrowed(s))
    }

    pub fn into_owned(self) -> AnyValue<'static> {
        match self {
            AnyValue::Int32(v) => AnyValue::Int32(v),
            AnyValue::Int64(v) => AnyValue::Int64(v),
            AnyValue::Float32(v) => AnyValue::Float32(v),
            AnyValue::Float64(v) => AnyValue::Float64(v),
            AnyValue::Str(s) => AnyValue::Str(Cow::Owned(s.into_owned())),
        }
    }
}

impl<'a> fmt::Display for AnyValue<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyValue::Int32(v) => write!(f, "{v}"),
            AnyValue::Int64(v) => write!(f, "{v}"),
            AnyValue::Float32(v) => write!(f, "{v}"),
            AnyValue::Float64(v) => write!(f, "{v}"),
            AnyValue::Str(v) => write!(f, "{v}"),
        }
    }
}

/// One column element type, abstracted over so segment code is written once
/// and monomorphized per `T` rather than dispatching per row.
///
/// `PartialOrd` (not `Ord`) because `Float32`/`Float64` only have a partial
/// order; NaN-containing columns are out of scope for this store, so every
/// comparison used by this crate assumes `partial_cmp` never returns `None`.
pub trait Scalar: Clone + PartialEq + PartialOrd + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    fn try_from_any_value(value: &AnyValue<'_>) -> StoreResult<Self>;

    fn to_any_value(&self) -> AnyValue<'static>;

    /// Total order used for dictionary sort/dedup/binary-search. Panics are
    /// not expected because NaN is out of scope for this crate.
    fn cmp_total(a: &Self, b: &Self) -> std::cmp::Ordering {
        a.partial_cmp(b).expect("comparable scalar (NaN out of scope)")
    }
}

macro_rules! impl_numeric_scalar {
    ($t:ty, $dt:expr, $variant:ident) => {
        impl Scalar for $t {
            const DATA_TYPE: DataType = $dt;

            fn try_from_any_value(value: &AnyValue<'_>) -> StoreResult<Self> {
                match value {
                    AnyValue::$variant(v) => Ok(*v as $t),
                    other => store_bail!(
                        TypeMismatch: "cannot convert {other:?} to {}", stringify!($t)
                    ),
                }
            }

            fn to_any_value(&self) -> AnyValue<'static> {
                AnyValue::$variant(*self)
            }
        }
    };
}

impl_numeric_scalar!(i32, DataType::Int32, Int32);
impl_numeric_scalar!(i64, DataType::Int64, Int64);
impl_numeric_scalar!(f32, DataType::Float32, Float32);
impl_numeric_scalar!(f64, DataType::Float64, Float64);

impl Scalar for String {
    const DATA_TYPE: DataType = DataType::Str;

    fn try_from_any_value(value: &AnyValue<'_>) -> StoreResult<Self> {
        match value {
            AnyValue::Str(s) => Ok(s.clone().into_owned()),
            other => store_bail!(TypeMismatch: "cannot convert {other:?} to string"),
        }
    }

    fn to_any_value(&self) -> AnyValue<'static> {
        AnyValue::Str(Cow::Owned(self.clone()))
    }
}

macro_rules! id_newtype {
    ($name:ident, $repr:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(pub $repr);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<$repr> for $name {
            fn from(v: $repr) -> Self {
                $name(v)
            }
        }
    };
}

id_newtype!(ChunkId, u32);
id_newtype!(ColumnId, u16);
id_newtype!(ChunkOffset, u32);
id_newtype!(ValueId, u32);

pub const INVALID_VALUE_ID: ValueId = ValueId(u32::MAX);

/// A row identified by the chunk it lives in and its offset within that
/// chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

impl RowId {
    pub fn new(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> Self {
        RowId { chunk_id, chunk_offset }
    }
}

/// An ordered sequence of [`RowId`]s produced by a scan.
///
/// Wrapped rather than exposed as a bare `Vec` so the scan APIs have one
/// stable type to grow `Deref`/`FromIterator` impls on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosList(Vec<RowId>);

impl PosList {
    pub fn new() -> Self {
        PosList(Vec::new())
    }

    pub fn with_capacity(cap: usize) -> Self {
        PosList(Vec::with_capacity(cap))
    }

    pub fn push(&mut self, row: RowId) {
        self.0.push(row);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = RowId>) {
        self.0.extend(other);
    }

    pub fn into_inner(self) -> Vec<RowId> {
        self.0
    }
}

impl std::ops::Deref for PosList {
    type Target = [RowId];

    fn deref(&self) -> &[RowId] {
        &self.0
    }
}

impl FromIterator<RowId> for PosList {
    fn from_iter<I: IntoIterator<Item = RowId>>(iter: I) -> Self {
        PosList(Vec::from_iter(iter))
    }
}

impl From<Vec<RowId>> for PosList {
    fn from(v: Vec<RowId>) -> Self {
        PosList(v)
    }
}
