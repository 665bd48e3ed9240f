//! Order shipment tracking.
//!
//! Orders are sequences of SKU line items; shipment notifications arrive in
//! independent parts, each naming a subset of SKUs shipped under one tracking
//! id. An update is validated against the units still unshipped and then
//! applied as a whole, or rejected without touching stored state.

pub mod error;
pub mod order;
pub mod repository;
pub mod service;
pub mod shared;

pub use error::{ShipmentError, ShipmentResult};
pub use order::{LineItem, Order, OrderCommand, OrderEvent, OrderStatus, RecordShipment, UnitShipped};
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderShipmentService;
pub use shared::SharedShipmentService;

pub use ordership_core::{OrderId, Sku, TrackingId};
