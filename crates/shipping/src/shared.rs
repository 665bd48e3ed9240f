use std::sync::{Arc, Mutex, MutexGuard};

use ordership_core::OrderId;

use crate::error::{ShipmentError, ShipmentResult};
use crate::order::{LineItem, Order};
use crate::repository::InMemoryOrderRepository;
use crate::service::OrderShipmentService;

/// Thread-safe handle to an [`OrderShipmentService`].
///
/// One lock guards the whole service, so the validate-then-apply sequence of
/// `shipment_update` runs without interleaving and two callers can never
/// claim the same unshipped unit.
#[derive(Debug, Clone, Default)]
pub struct SharedShipmentService {
    inner: Arc<Mutex<OrderShipmentService<InMemoryOrderRepository>>>,
}

impl SharedShipmentService {
    pub fn new(service: OrderShipmentService<InMemoryOrderRepository>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn lock(&self) -> ShipmentResult<MutexGuard<'_, OrderShipmentService<InMemoryOrderRepository>>> {
        self.inner.lock().map_err(|_| {
            tracing::error!("shipment service lock poisoned");
            ShipmentError::Unavailable
        })
    }

    pub fn add_order(&self, order: Order) -> ShipmentResult<OrderId> {
        self.lock()?.add_order(order)
    }

    pub fn validate<S: AsRef<str>>(
        &self,
        skus: &[S],
        tracking_id: &str,
        order_id: &str,
    ) -> ShipmentResult<()> {
        self.lock()?.validate(skus, tracking_id, order_id)
    }

    pub fn shipment_update<S: AsRef<str>>(
        &self,
        skus: &[S],
        tracking_id: &str,
        order_id: &str,
    ) -> ShipmentResult<OrderId> {
        self.lock()?.shipment_update(skus, tracking_id, order_id)
    }

    pub fn get_shipment(&self, order_id: &str) -> ShipmentResult<Vec<LineItem>> {
        self.lock()?.get_shipment(order_id)
    }

    pub fn order(&self, order_id: &str) -> ShipmentResult<Order> {
        self.lock()?.order(order_id)
    }
}
