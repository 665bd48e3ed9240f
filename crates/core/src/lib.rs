//! `ordership-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no logging setup).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::DomainError;
pub use event::Event;
pub use id::{OrderId, Sku, TrackingId};
pub use value_object::ValueObject;
