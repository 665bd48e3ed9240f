//! Shipment error taxonomy.

use thiserror::Error;

use ordership_core::{OrderId, Sku};

pub type ShipmentResult<T> = Result<T, ShipmentError>;

/// Errors returned by the shipment operations.
///
/// Every error is detected before any mutation; stored state is unchanged
/// after a failed call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShipmentError {
    #[error("order should contain an order ID")]
    InvalidOrder,

    #[error("no order ID specified")]
    EmptyOrderId,

    #[error("the list of skus to be updated can't be empty")]
    EmptySkuList,

    #[error("shipment tracking id can't be empty")]
    EmptyTrackingId,

    #[error("order id {0} not found")]
    OrderNotFound(OrderId),

    /// The SKU is absent from the order or has no unshipped units left.
    #[error("SKU {0} is either not present or has more quantity than in original order")]
    SkuMismatch(Sku),

    /// The shared service lock was poisoned by a panicking caller.
    #[error("shipment service unavailable")]
    Unavailable,
}
