//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// A SKU is a value object: two line items carrying `"SKU1"` refer to the same
/// product even though they are distinct units.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
