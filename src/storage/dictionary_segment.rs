//! [`DictionarySegment<T>`]: an immutable sorted-unique value domain plus a
//! width-fitted attribute vector of value-ids.

use crate::error::{store_bail, StoreResult};
use crate::storage::attribute_vector::AttributeVector;
use crate::storage::value_segment::ValueSegment;
use crate::types::{AnyValue, Scalar, ValueId, INVALID_VALUE_ID};

/// Built once from a [`ValueSegment<T>`] and immutable thereafter: `append`
/// always fails with `ImmutableSegment`.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionarySegment<T> {
    /// Sorted, deduplicated value domain. Strictly increasing.
    dictionary: Vec<T>,
    attribute_vector: AttributeVector,
}

impl<T: Scalar> DictionarySegment<T> {
    /// Builds a dictionary segment from a value segment: copy, sort, dedup
    /// the domain; pick an attribute-vector width that fits the domain;
    /// binary-search each source value into its id.
    pub fn build(source: &ValueSegment<T>) -> Self {
        let mut dictionary: Vec<T> = source.values().to_vec();
        dictionary.sort_unstable_by(T::cmp_total);
        dictionary.dedup_by(|a, b| T::cmp_total(a, b) == std::cmp::Ordering::Equal);
        dictionary.shrink_to_fit();

        let mut attribute_vector = AttributeVector::new(dictionary.len(), source.size());
        for (i, v) in source.values().iter().enumerate() {
            let id = dictionary
                .binary_search_by(|d| T::cmp_total(d, v))
                .unwrap_or_else(|_| {
                    panic!("value at row {i} missing from its own dictionary domain")
                });
            attribute_vector.set(i, ValueId(id as u32));
        }

        DictionarySegment { dictionary, attribute_vector }
    }

    pub fn size(&self) -> usize {
        self.attribute_vector.size()
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }

    /// Index of the first dictionary entry `>= v`, or `INVALID_VALUE_ID` if
    /// every entry is smaller.
    pub fn lower_bound(&self, v: &T) -> ValueId {
        let idx = self.dictionary.partition_point(|d| T::cmp_total(d, v) == std::cmp::Ordering::Less);
        if idx == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId(idx as u32)
        }
    }

    /// Index of the first dictionary entry `> v`, or `INVALID_VALUE_ID` if
    /// none.
    pub fn upper_bound(&self, v: &T) -> ValueId {
        let idx = self
            .dictionary
            .partition_point(|d| T::cmp_total(d, v) != std::cmp::Ordering::Greater);
        if idx == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            ValueId(idx as u32)
        }
    }

    /// `dictionary[id]`. Undefined for `INVALID_VALUE_ID`.
    pub fn value_by_value_id(&self, id: ValueId) -> &T {
        &self.dictionary[id.index()]
    }

    pub fn get_any(&self, offset: usize) -> StoreResult<AnyValue<'static>> {
        if offset >= self.attribute_vector.size() {
            store_bail!(OutOfBounds: "dictionary segment offset {offset} >= size {}", self.attribute_vector.size());
        }
        let id = self.attribute_vector.get(offset);
        Ok(self.value_by_value_id(id).to_any_value())
    }

    /// Always fails: dictionary segments are immutable once built.
    pub fn append(&mut self, _value: &AnyValue<'_>) -> StoreResult<()> {
        store_bail!(ImmutableSegment: "cannot append to a dictionary segment")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build_int_segment(values: &[i32]) -> ValueSegment<i32> {
        let mut seg = ValueSegment::<i32>::new();
        for v in values {
            seg.append(&AnyValue::Int32(*v)).unwrap();
        }
        seg
    }

    #[test]
    fn build_produces_sorted_domain_and_matching_attribute_vector() {
        let source = build_int_segment(&[5, 1, 2, 2, 5, 3, 1, 4, 5, 2]);
        let dict = DictionarySegment::build(&source);
        assert_eq!(dict.dictionary(), &[1, 2, 3, 4, 5]);
        let ids: Vec<u32> = (0..dict.size()).map(|i| dict.attribute_vector().get(i).0).collect();
        assert_eq!(ids, vec![4, 0, 1, 1, 4, 2, 0, 3, 4, 1]);
        assert_eq!(dict.attribute_vector().width(), 1);
    }

    #[test]
    fn round_trips_source_values() {
        let source = build_int_segment(&[5, 1, 2, 2, 5, 3, 1, 4, 5, 2]);
        let dict = DictionarySegment::build(&source);
        for (i, v) in source.values().iter().enumerate() {
            assert_eq!(dict.get_any(i).unwrap(), AnyValue::Int32(*v));
        }
    }

    #[test]
    fn bounds_on_sorted_domain() {
        let source = build_int_segment(&[10, 20, 30, 40, 50]);
        let dict = DictionarySegment::build(&source);
        assert_eq!(dict.lower_bound(&25).0, 2); // first >= 25 -> 30
        assert_eq!(dict.upper_bound(&30).0, 3); // first > 30 -> 40
        assert_eq!(dict.lower_bound(&100), INVALID_VALUE_ID);
        assert_eq!(dict.upper_bound(&100), INVALID_VALUE_ID);
        assert_eq!(dict.lower_bound(&5).0, 0);
        assert_eq!(dict.upper_bound(&5).0, 0);
    }

    #[test]
    fn append_fails_immutable() {
        let source = build_int_segment(&[1, 2, 3]);
        let mut dict = DictionarySegment::build(&source);
        let err = dict.append(&AnyValue::Int32(4)).unwrap_err();
        assert!(matches!(err, crate::error::StoreError::ImmutableSegment(_)));
    }
}
