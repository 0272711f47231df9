//! Simulated procurement order endpoints
//!
//! Creation snapshots product name/unit from the catalog at creation time;
//! delivery recomputes per-line statuses and the order total from the
//! received quantities. Action endpoints overwrite the status without
//! validating the previous one, exactly like the backend they mimic.

use chrono::Utc;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use shared::{
    decimal_from_value, i64_from_value, string_from_value, LineStatus, OrderLine, OrderStats,
    OrderStatus, ProcurementOrder, DEFAULT_PRODUCT_NAME, DEFAULT_PRODUCT_UNIT,
};

use crate::storage::KeyValueStore;

use super::state::{self, DemoData};
use super::{empty_object, match_resource_action, parse_date, to_value};

/// Handle `/api/approvisionnements/` and its sub-paths.
pub fn handle(
    store: &dyn KeyValueStore,
    data: &mut DemoData,
    path: &str,
    method: &Method,
    body: Option<&Value>,
) -> Value {
    if path == "/api/approvisionnements/" {
        if *method == Method::GET {
            return to_value(&data.procurements);
        }
        if *method == Method::POST {
            let payload = body.cloned().unwrap_or_else(empty_object);
            let order = create_order(data, &payload);
            let response = to_value(&order);
            data.procurements.push(order);
            state::save(store, data);
            return response;
        }
    }

    if path == "/api/approvisionnements/stats/" {
        return to_value(&stats(&data.procurements));
    }

    if *method == Method::POST {
        if let Some((id, action)) = match_resource_action(path, "/api/approvisionnements/") {
            if matches!(action.as_str(), "mark_in_transit" | "mark_delivered" | "cancel") {
                let payload = body.cloned().unwrap_or_else(empty_object);
                if let Some(order) = data.procurements.iter_mut().find(|o| o.id == id) {
                    apply_action(order, &action, &payload);
                }
                state::save(store, data);
                return json!({"success": true});
            }
        }
    }

    // Anything else under the prefix is off-catalog.
    json!([])
}

/// Build a new order from caller-supplied line items.
fn create_order(data: &DemoData, payload: &Value) -> ProcurementOrder {
    let id = state::next_id(&data.procurements, 0, |o: &ProcurementOrder| o.id);
    let empty = Vec::new();
    let line_payloads = payload
        .get("lignes")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let lines: Vec<OrderLine> = line_payloads
        .iter()
        .enumerate()
        .map(|(idx, l)| build_line(data, id, idx, l))
        .collect();
    let total_ordered: Decimal = lines.iter().map(|l| l.ordered).sum();

    let now = Utc::now();
    ProcurementOrder {
        id,
        order_number: string_from_value(&payload["numero_commande"])
            .unwrap_or_else(|| format!("APP-{}-{:04}", now.format("%Y%m%d"), id)),
        supplier: string_from_value(&payload["fournisseur"])
            .unwrap_or_else(|| "Fournisseur demo".to_string()),
        status: OrderStatus::Pending,
        order_date: parse_date(&payload["date_commande"]).unwrap_or(now),
        expected_delivery: parse_date(&payload["date_livraison_attendue"]).unwrap_or(now),
        warehouse_name: string_from_value(&payload["entrepot_nom"])
            .unwrap_or_else(|| "Entrepot Central".to_string()),
        manager_name: string_from_value(&payload["gestionnaire_nom"])
            .unwrap_or_else(|| "Gestionnaire Logistique".to_string()),
        total_ordered,
        total_received: Decimal::ZERO,
        lines,
        notes: string_from_value(&payload["notes"]),
    }
}

/// One order line, with the product name and unit snapshotted from the
/// catalog (caller-supplied name, then defaults, when the product is
/// unknown).
fn build_line(data: &DemoData, order_id: i64, idx: usize, payload: &Value) -> OrderLine {
    let product_id = i64_from_value(&payload["produit"]);
    let product = data.products.iter().find(|p| p.id == product_id);

    // `quantite_commandee` wins, `quantite` is the short form some callers
    // send; zero falls through like the backend's falsy check.
    let mut ordered = decimal_from_value(&payload["quantite_commandee"]);
    if ordered.is_zero() {
        ordered = decimal_from_value(&payload["quantite"]);
    }

    OrderLine {
        id: order_id * 100 + idx as i64 + 1,
        product_id,
        product_name: product
            .map(|p| p.name.clone())
            .or_else(|| string_from_value(&payload["produit_nom"]))
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        product_unit: product
            .map(|p| p.unit.clone())
            .unwrap_or_else(|| DEFAULT_PRODUCT_UNIT.to_string()),
        ordered,
        received: Decimal::ZERO,
        status: LineStatus::Pending,
    }
}

fn apply_action(order: &mut ProcurementOrder, action: &str, payload: &Value) {
    match action {
        "mark_in_transit" => order.status = OrderStatus::InTransit,
        "cancel" => {
            order.status = OrderStatus::Cancelled;
            if let Some(reason) = string_from_value(&payload["raison"]) {
                order.notes = Some(reason);
            }
        }
        "mark_delivered" => {
            let empty = Vec::new();
            let receipts = payload
                .get("lignes_receptions")
                .and_then(Value::as_array)
                .unwrap_or(&empty);
            for line in &mut order.lines {
                let received = receipts
                    .iter()
                    .find(|r| i64_from_value(&r["id_ligne"]) == line.id)
                    .map(|r| decimal_from_value(&r["quantite_recue"]))
                    // No receipt entry for the line means full receipt.
                    .unwrap_or(line.ordered);
                line.received = received;
                line.recompute_status();
            }
            order.recompute_total_received();
            order.status = OrderStatus::Delivered;
        }
        _ => {}
    }
}

fn stats(orders: &[ProcurementOrder]) -> OrderStats {
    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
    OrderStats {
        total_pending: count(OrderStatus::Pending),
        total_in_transit: count(OrderStatus::InTransit),
        total_delivered: count(OrderStatus::Delivered),
        total_cancelled: count(OrderStatus::Cancelled),
    }
}
