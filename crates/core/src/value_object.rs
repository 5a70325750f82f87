//! Value object trait: equality by value, not identity.

/// Marker trait for immutable domain values compared by their attributes.
///
/// A `ValueObject` carries no identity: two instances with equal values are
/// interchangeable. `Email` is one; `Account`, which has an id, is an
/// entity. Construct a new instance instead of mutating.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
