//! Example driver: records one order, feeds it split shipment updates and
//! prints the resulting shipment table.

mod config;

use std::io::{self, Write};

use ordership_shipping::{Order, OrderShipmentService};

use crate::config::{DemoConfig, LOG_FORMAT_VAR};

fn main() -> anyhow::Result<()> {
    let config = DemoConfig::from_env();
    ordership_observability::init_with(config.log_format);
    if let Some(e) = &config.log_format_error {
        tracing::warn!(var = LOG_FORMAT_VAR, "{e}; using json");
    }

    let mut service = OrderShipmentService::in_memory();
    run(&mut service, &mut io::stdout().lock())
}

fn run(service: &mut OrderShipmentService, out: &mut impl Write) -> anyhow::Result<()> {
    let order_id = service.add_order(Order::with_skus("ord1", ["SKU1", "SKU1", "SKU2"]))?;
    writeln!(out, "Order placed with ID : {order_id}")?;

    // Parts of one shipment arriving separately; the last mixes a known SKU
    // with an unknown one and is rejected as a whole.
    let updates: [(&[&str], &str); 3] = [
        (&["SKU1"], "Tracking1"),
        (&["SKU2"], "Tracking1"),
        (&["SKU3", "SKU1"], "Tracking1"),
    ];
    for (skus, tracking_id) in updates {
        match service.shipment_update(skus, tracking_id, order_id.as_str()) {
            Ok(id) => writeln!(out, "updated shipment for {id}")?,
            Err(e) => writeln!(out, "shipment update {skus:?} rejected: {e}")?,
        }
    }

    let lines = service.get_shipment(order_id.as_str())?;
    writeln!(out, "{order_id} shipment details")?;
    for item in &lines {
        let tracking = item.tracking_id.as_ref().map_or("-", |t| t.as_str());
        writeln!(out, "{} | {}", item.sku, tracking)?;
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&lines)?)?;
    Ok(())
}
