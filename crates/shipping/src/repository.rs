use std::collections::HashMap;

use ordership_core::{AggregateRoot, OrderId};

use crate::order::Order;

/// Order storage seam used by the shipment service.
///
/// Implementations own their orders; callers only receive shared references
/// or copies, and mutation happens through `get_mut` inside the service.
pub trait OrderRepository {
    fn get(&self, order_id: &str) -> Option<&Order>;
    fn get_mut(&mut self, order_id: &str) -> Option<&mut Order>;
    /// Store an order, replacing any existing order with the same id.
    fn upsert(&mut self, order: Order);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory order map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: HashMap<OrderId, Order>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    fn get_mut(&mut self, order_id: &str) -> Option<&mut Order> {
        self.orders.get_mut(order_id)
    }

    fn upsert(&mut self, order: Order) {
        self.orders.insert(order.id().clone(), order);
    }

    fn len(&self) -> usize {
        self.orders.len()
    }
}
