//! Order shipment service: storage + shipment rules.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use ordership_core::{Aggregate, AggregateRoot, Event, OrderId, Sku, TrackingId};

use crate::error::{ShipmentError, ShipmentResult};
use crate::order::{LineItem, Order, OrderCommand, OrderEvent, RecordShipment};
use crate::repository::{InMemoryOrderRepository, OrderRepository};

/// Owns the orders and applies shipment updates against them.
///
/// Calls are sequential (`&mut self` for mutation). Wrap the service in
/// [`crate::SharedShipmentService`] when several threads need access.
#[derive(Debug, Default, Clone)]
pub struct OrderShipmentService<R = InMemoryOrderRepository> {
    repo: R,
}

impl OrderShipmentService<InMemoryOrderRepository> {
    /// Service backed by a fresh, empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(InMemoryOrderRepository::new())
    }
}

impl<R: OrderRepository> OrderShipmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Store an order, replacing any order previously stored under its id.
    #[instrument(skip(self, order), fields(order_id = %order.id(), lines = order.lines().len()))]
    pub fn add_order(&mut self, order: Order) -> ShipmentResult<OrderId> {
        if order.id().is_empty() {
            return Err(ShipmentError::InvalidOrder);
        }

        let order_id = order.id().clone();
        if self.repo.get(order_id.as_str()).is_some() {
            debug!("replacing existing order");
        }
        self.repo.upsert(order);
        info!("order added");
        Ok(order_id)
    }

    /// Check a prospective shipment update without mutating anything.
    ///
    /// Succeeds only if every SKU occurrence in `skus` can be matched to a
    /// distinct unshipped unit of the order.
    pub fn validate<S: AsRef<str>>(
        &self,
        skus: &[S],
        tracking_id: &str,
        order_id: &str,
    ) -> ShipmentResult<()> {
        self.plan(skus, tracking_id, order_id).map(|_| ())
    }

    /// Validate and then apply a shipment update as a whole.
    ///
    /// Each SKU occurrence marks the first still-unshipped line item with that
    /// SKU as shipped under `tracking_id`. On error nothing is changed.
    #[instrument(skip(self, skus), fields(sku_count = skus.len()))]
    pub fn shipment_update<S: AsRef<str>>(
        &mut self,
        skus: &[S],
        tracking_id: &str,
        order_id: &str,
    ) -> ShipmentResult<OrderId> {
        let events = match self.plan(skus, tracking_id, order_id) {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "shipment update rejected");
                return Err(e);
            }
        };

        let order = self
            .repo
            .get_mut(order_id)
            .ok_or_else(|| ShipmentError::OrderNotFound(OrderId::from(order_id)))?;

        for event in &events {
            debug!(event_type = event.event_type(), "applying event");
            order.apply(event);
        }

        info!(
            units = events.len(),
            remaining = order.lines().iter().filter(|item| !item.is_shipped()).count(),
            version = order.version(),
            "shipment update applied"
        );
        Ok(order.id().clone())
    }

    /// Line items of an order with their current tracking ids, in creation order.
    pub fn get_shipment(&self, order_id: &str) -> ShipmentResult<Vec<LineItem>> {
        Ok(self.find(order_id)?.lines().to_vec())
    }

    /// Copy of a stored order, including its shipment history.
    pub fn order(&self, order_id: &str) -> ShipmentResult<Order> {
        self.find(order_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.repo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    fn find(&self, order_id: &str) -> ShipmentResult<&Order> {
        if order_id.is_empty() {
            return Err(ShipmentError::EmptyOrderId);
        }
        self.repo
            .get(order_id)
            .ok_or_else(|| ShipmentError::OrderNotFound(OrderId::from(order_id)))
    }

    fn plan<S: AsRef<str>>(
        &self,
        skus: &[S],
        tracking_id: &str,
        order_id: &str,
    ) -> ShipmentResult<Vec<OrderEvent>> {
        debug!(order_id, tracking_id, sku_count = skus.len(), "validating shipment update");

        if skus.is_empty() {
            return Err(ShipmentError::EmptySkuList);
        }
        if tracking_id.is_empty() {
            return Err(ShipmentError::EmptyTrackingId);
        }
        let order = self.find(order_id)?;

        let command = OrderCommand::RecordShipment(RecordShipment {
            skus: skus.iter().map(|s| Sku::from(s.as_ref())).collect(),
            tracking_id: TrackingId::from(tracking_id),
            occurred_at: Utc::now(),
        });
        order.handle(&command)
    }
}
