use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordership_core::{Aggregate, AggregateRoot, Event, OrderId, Sku, TrackingId};

use crate::error::ShipmentError;

/// One unit of a SKU within an order.
///
/// `tracking_id` is `None` while the unit is unshipped. It is set exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub sku: Sku,
    pub tracking_id: Option<TrackingId>,
}

impl LineItem {
    /// An unshipped unit.
    pub fn new(sku: impl Into<Sku>) -> Self {
        Self {
            sku: sku.into(),
            tracking_id: None,
        }
    }

    /// A unit that was already shipped when the order was recorded.
    ///
    /// An empty tracking id leaves the unit unshipped.
    pub fn shipped(sku: impl Into<Sku>, tracking_id: impl Into<TrackingId>) -> Self {
        let tracking_id = tracking_id.into();
        Self {
            sku: sku.into(),
            tracking_id: (!tracking_id.is_empty()).then_some(tracking_id),
        }
    }

    pub fn is_shipped(&self) -> bool {
        self.tracking_id.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Shipment progress derived from the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unshipped,
    PartiallyShipped,
    Shipped,
}

/// Aggregate root: Order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    lines: Vec<LineItem>,
    history: Vec<UnitShipped>,
    version: u64,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, lines: Vec<LineItem>) -> Self {
        Self {
            id: id.into(),
            lines,
            history: Vec::new(),
            version: 0,
        }
    }

    /// Order with one unshipped line item per SKU, in the given sequence.
    pub fn with_skus<I, S>(id: impl Into<OrderId>, skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Sku>,
    {
        Self::new(id, skus.into_iter().map(LineItem::new).collect())
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Applied shipment events, in application order.
    pub fn history(&self) -> &[UnitShipped] {
        &self.history
    }

    /// Number of unshipped units per SKU. SKUs with nothing left are absent.
    pub fn unshipped_counts(&self) -> HashMap<&Sku, usize> {
        let mut counts = HashMap::new();
        for item in self.lines.iter().filter(|item| !item.is_shipped()) {
            *counts.entry(&item.sku).or_insert(0) += 1;
        }
        counts
    }

    pub fn unshipped_count(&self, sku: &str) -> usize {
        self.lines
            .iter()
            .filter(|item| !item.is_shipped() && item.sku.as_str() == sku)
            .count()
    }

    pub fn status(&self) -> OrderStatus {
        let shipped = self.lines.iter().filter(|item| item.is_shipped()).count();
        if shipped == self.lines.len() {
            OrderStatus::Shipped
        } else if shipped == 0 {
            OrderStatus::Unshipped
        } else {
            OrderStatus::PartiallyShipped
        }
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RecordShipment.
///
/// `skus` may repeat a SKU; each occurrence ships one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordShipment {
    pub skus: Vec<Sku>,
    pub tracking_id: TrackingId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    RecordShipment(RecordShipment),
}

/// Event: UnitShipped.
///
/// `line` is the zero-based position of the line item in the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitShipped {
    pub order_id: OrderId,
    pub line: usize,
    pub sku: Sku,
    pub tracking_id: TrackingId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    UnitShipped(UnitShipped),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::UnitShipped(_) => "shipping.order.unit_shipped",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::UnitShipped(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = ShipmentError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::UnitShipped(e) => {
                // A shipped unit keeps its first tracking id.
                if let Some(item) = self.lines.get_mut(e.line) {
                    if !item.is_shipped() && item.sku == e.sku {
                        item.tracking_id = Some(e.tracking_id.clone());
                        self.history.push(e.clone());
                    }
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::RecordShipment(cmd) => self.handle_record_shipment(cmd),
        }
    }
}

impl Order {
    /// Checks that every SKU occurrence can be matched to a distinct unshipped unit.
    ///
    /// Reports the first SKU (in input order) whose remaining count is exhausted.
    fn ensure_available(&self, skus: &[Sku]) -> Result<(), ShipmentError> {
        let mut remaining = self.unshipped_counts();
        for sku in skus {
            match remaining.get_mut(sku) {
                Some(count) => {
                    *count -= 1;
                    if *count == 0 {
                        remaining.remove(sku);
                    }
                }
                None => return Err(ShipmentError::SkuMismatch(sku.clone())),
            }
        }
        Ok(())
    }

    fn handle_record_shipment(
        &self,
        cmd: &RecordShipment,
    ) -> Result<Vec<OrderEvent>, ShipmentError> {
        if cmd.skus.is_empty() {
            return Err(ShipmentError::EmptySkuList);
        }
        if cmd.tracking_id.is_empty() {
            return Err(ShipmentError::EmptyTrackingId);
        }

        self.ensure_available(&cmd.skus)?;

        // Each occurrence takes the first unshipped unit not already taken by
        // this command, which matches applying the occurrences one by one.
        let mut claimed = vec![false; self.lines.len()];
        let mut events = Vec::with_capacity(cmd.skus.len());
        for sku in &cmd.skus {
            let line = (0..self.lines.len())
                .find(|&idx| {
                    let item = &self.lines[idx];
                    !claimed[idx] && !item.is_shipped() && item.sku == *sku
                })
                .ok_or_else(|| ShipmentError::SkuMismatch(sku.clone()))?;
            claimed[line] = true;

            events.push(OrderEvent::UnitShipped(UnitShipped {
                order_id: self.id.clone(),
                line,
                sku: sku.clone(),
                tracking_id: cmd.tracking_id.clone(),
                occurred_at: cmd.occurred_at,
            }));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(skus: &[&str], tracking_id: &str) -> OrderCommand {
        OrderCommand::RecordShipment(RecordShipment {
            skus: skus.iter().map(|s| Sku::from(*s)).collect(),
            tracking_id: TrackingId::from(tracking_id),
            occurred_at: Utc::now(),
        })
    }

    fn ship(order: &mut Order, skus: &[&str], tracking_id: &str) -> Result<(), ShipmentError> {
        let events = order.handle(&record(skus, tracking_id))?;
        for e in &events {
            order.apply(e);
        }
        Ok(())
    }

    fn tracking(order: &Order) -> Vec<Option<&str>> {
        order
            .lines()
            .iter()
            .map(|item| item.tracking_id.as_ref().map(TrackingId::as_str))
            .collect()
    }

    #[test]
    fn record_shipment_emits_one_event_per_occurrence() {
        let order = Order::with_skus("ord1", ["SKU1", "SKU1", "SKU2"]);

        let events = order.handle(&record(&["SKU1", "SKU2", "SKU1"], "T1")).unwrap();
        assert_eq!(events.len(), 3);

        let lines: Vec<usize> = events
            .iter()
            .map(|e| match e {
                OrderEvent::UnitShipped(e) => e.line,
            })
            .collect();
        assert_eq!(lines, vec![0, 2, 1]);
        assert_eq!(events[0].event_type(), "shipping.order.unit_shipped");
    }

    #[test]
    fn handle_does_not_mutate() {
        let order = Order::with_skus("ord1", ["SKU1"]);
        let before = order.clone();
        order.handle(&record(&["SKU1"], "T1")).unwrap();
        assert_eq!(order, before);
    }

    #[test]
    fn first_unshipped_unit_is_taken() {
        let mut order = Order::with_skus("ord1", ["SKU1", "SKU2", "SKU1"]);

        ship(&mut order, &["SKU1"], "T1").unwrap();
        assert_eq!(tracking(&order), vec![Some("T1"), None, None]);

        ship(&mut order, &["SKU1"], "T2").unwrap();
        assert_eq!(tracking(&order), vec![Some("T1"), None, Some("T2")]);
    }

    #[test]
    fn duplicate_beyond_remaining_is_rejected() {
        let order = Order::with_skus("order1", ["SKU1"]);
        let err = order.handle(&record(&["SKU1", "SKU1"], "T1")).unwrap_err();
        assert_eq!(err, ShipmentError::SkuMismatch(Sku::from("SKU1")));
    }

    #[test]
    fn unknown_sku_is_reported_in_input_order() {
        let order = Order::with_skus("ord1", ["SKU1", "SKU2"]);
        let err = order.handle(&record(&["SKU3", "SKU4"], "T1")).unwrap_err();
        assert_eq!(err, ShipmentError::SkuMismatch(Sku::from("SKU3")));
    }

    #[test]
    fn already_shipped_units_do_not_count() {
        let mut order = Order::new(
            "ord1",
            vec![LineItem::shipped("SKU1", "T0"), LineItem::new("SKU1")],
        );
        assert_eq!(order.unshipped_count("SKU1"), 1);

        ship(&mut order, &["SKU1"], "T1").unwrap();
        assert_eq!(tracking(&order), vec![Some("T0"), Some("T1")]);

        let err = ship(&mut order, &["SKU1"], "T2").unwrap_err();
        assert_eq!(err, ShipmentError::SkuMismatch(Sku::from("SKU1")));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let order = Order::with_skus("ord1", ["SKU1"]);
        assert_eq!(
            order.handle(&record(&[], "T1")).unwrap_err(),
            ShipmentError::EmptySkuList
        );
        assert_eq!(
            order.handle(&record(&["SKU1"], "")).unwrap_err(),
            ShipmentError::EmptyTrackingId
        );
    }

    #[test]
    fn apply_never_overwrites_tracking_id() {
        let mut order = Order::with_skus("ord1", ["SKU1"]);
        let stale = order.handle(&record(&["SKU1"], "T1")).unwrap();
        let late = order.handle(&record(&["SKU1"], "T2")).unwrap();

        order.apply(&stale[0]);
        order.apply(&late[0]);

        assert_eq!(tracking(&order), vec![Some("T1")]);
        assert_eq!(order.history().len(), 1);
        assert_eq!(order.version(), 2);
    }

    #[test]
    fn status_follows_shipped_units() {
        let mut order = Order::with_skus("ord1", ["SKU1", "SKU2"]);
        assert_eq!(order.status(), OrderStatus::Unshipped);

        ship(&mut order, &["SKU2"], "T1").unwrap();
        assert_eq!(order.status(), OrderStatus::PartiallyShipped);

        ship(&mut order, &["SKU1"], "T2").unwrap();
        assert_eq!(order.status(), OrderStatus::Shipped);

        assert_eq!(Order::new("empty", vec![]).status(), OrderStatus::Shipped);
    }

    #[test]
    fn shipped_constructor_treats_empty_tracking_as_unshipped() {
        let item = LineItem::shipped("SKU1", "");
        assert!(!item.is_shipped());
        assert_eq!(item.tracking_id, None);
    }

    #[test]
    fn line_item_serializes_unshipped_as_null() {
        let json = serde_json::to_string(&LineItem::new("SKU1")).unwrap();
        assert_eq!(json, r#"{"sku":"SKU1","tracking_id":null}"#);

        let json = serde_json::to_string(&LineItem::shipped("SKU1", "T1")).unwrap();
        assert_eq!(json, r#"{"sku":"SKU1","tracking_id":"T1"}"#);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn sku_strategy() -> impl Strategy<Value = String> {
            prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(|s| s.to_string())
        }

        proptest! {
            /// Property: a successful plan claims distinct, previously unshipped lines
            /// carrying the requested SKU.
            #[test]
            fn plan_claims_distinct_unshipped_lines(
                lines in prop::collection::vec(sku_strategy(), 0..12),
                request in prop::collection::vec(sku_strategy(), 1..8),
            ) {
                let order = Order::with_skus("ord", lines.clone());
                let request_refs: Vec<&str> = request.iter().map(String::as_str).collect();

                let fits = ["A", "B", "C", "D"].iter().all(|sku| {
                    request.iter().filter(|s| s == sku).count() <= order.unshipped_count(sku)
                });

                match order.handle(&record(&request_refs, "T")) {
                    Ok(events) => {
                        prop_assert!(fits);
                        prop_assert_eq!(events.len(), request.len());
                        let mut seen = std::collections::HashSet::new();
                        for (e, sku) in events.iter().zip(&request) {
                            let OrderEvent::UnitShipped(e) = e;
                            prop_assert!(seen.insert(e.line));
                            prop_assert_eq!(lines[e.line].as_str(), sku.as_str());
                        }
                    }
                    Err(ShipmentError::SkuMismatch(_)) => prop_assert!(!fits),
                    Err(other) => prop_assert!(false, "unexpected error: {other}"),
                }
            }
        }
    }
}
