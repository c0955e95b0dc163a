//! Query translation
//!
//! Turns a list of validated filter descriptors into a single compound
//! predicate over apartment records. Descriptors targeting the same field
//! merge into one [`RangeConstraint`] instead of acting as independent,
//! overwriting constraints.

use indexmap::IndexMap;

use super::filter::{FilterDescriptor, FilterOp, NumericField};
use crate::apartments::model::Apartment;

/// An inclusive numeric range over a single field
///
/// Either bound may be absent; an absent bound does not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeConstraint {
    pub gte: Option<f64>,
    pub lte: Option<f64>,
}

impl RangeConstraint {
    fn apply(&mut self, op: FilterOp, value: f64) {
        match op {
            FilterOp::Gte => self.gte = Some(value),
            FilterOp::Lte => self.lte = Some(value),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.gte.is_none_or(|min| value >= min) && self.lte.is_none_or(|max| value <= max)
    }
}

/// Compound predicate over apartment records: one range constraint per field
///
/// Field order follows the first descriptor mentioning each field, which
/// keeps translated queries deterministic for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApartmentQuery {
    constraints: IndexMap<NumericField, RangeConstraint>,
}

impl ApartmentQuery {
    /// Evaluate the conjunction of all range constraints against a record
    pub fn matches(&self, apartment: &Apartment) -> bool {
        self.constraints
            .iter()
            .all(|(field, range)| range.contains(apartment.numeric_field(*field)))
    }

    /// Look up the constraint for a field, if any descriptor mentioned it
    pub fn constraint(&self, field: NumericField) -> Option<&RangeConstraint> {
        self.constraints.get(&field)
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Translate validated descriptors into a compound query
///
/// Returns `None` for an empty descriptor list so callers can distinguish
/// "no filter" (fall back to an unfiltered listing) from "match nothing".
///
/// Two descriptors with the same field and operator are resolved last-wins:
/// the later descriptor overwrites the earlier bound. This mirrors the
/// accepted wire contract; rejecting duplicates would break callers that
/// re-send a tightened bound.
pub fn translate(descriptors: &[FilterDescriptor]) -> Option<ApartmentQuery> {
    if descriptors.is_empty() {
        return None;
    }

    let mut constraints: IndexMap<NumericField, RangeConstraint> = IndexMap::new();
    for descriptor in descriptors {
        constraints
            .entry(descriptor.field)
            .or_default()
            .apply(descriptor.op, descriptor.value);
    }

    Some(ApartmentQuery { constraints })
}
