//! Filter parsing and query translation
//!
//! The listing endpoint receives serialized filter descriptors; [`filter`]
//! validates them at the boundary and [`translate`] compiles them into a
//! compound per-field range predicate the entity store can evaluate.

pub mod filter;
pub mod translate;

pub use filter::{FilterDescriptor, FilterOp, NumericField, parse_filters};
pub use translate::{ApartmentQuery, RangeConstraint, translate};
