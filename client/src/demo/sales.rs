//! Simulated sale endpoints

use chrono::Utc;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use shared::{decimal_from_value, string_from_value, Sale, SaleStatus};

use crate::storage::KeyValueStore;

use super::state::{self, DemoData};
use super::{empty_object, match_resource_action, to_value};

/// Sale ids start above this floor so they never collide with lot ids in
/// views that mix both collections.
const SALE_ID_FLOOR: i64 = 500;

/// Handle `/api/ventes/` and its sub-paths.
pub fn handle(
    store: &dyn KeyValueStore,
    data: &mut DemoData,
    path: &str,
    method: &Method,
    body: Option<&Value>,
) -> Value {
    if path == "/api/ventes/" {
        return to_value(&data.sales);
    }

    if path == "/api/ventes/creer_avec_lignes/" && *method == Method::POST {
        let payload = body.cloned().unwrap_or_else(empty_object);
        let sale = create_sale(data, &payload);
        let response = to_value(&sale);
        data.sales.push(sale);
        state::save(store, data);
        return response;
    }

    if *method == Method::POST {
        if let Some((id, action)) = match_resource_action(path, "/api/ventes/") {
            if action == "valider" || action == "annuler" {
                if let Some(sale) = data.sales.iter_mut().find(|s| s.id == id) {
                    sale.status = if action == "valider" {
                        SaleStatus::Validated
                    } else {
                        SaleStatus::Cancelled
                    };
                }
                state::save(store, data);
                return json!({"success": true});
            }
        }
    }

    // Anything else under the prefix is off-catalog.
    json!([])
}

/// Create a draft sale: total = Σ quantity × unit price over the supplied
/// lines, invoice number stamped with today's date and the id.
fn create_sale(data: &DemoData, payload: &Value) -> Sale {
    let id = state::next_id(&data.sales, SALE_ID_FLOOR, |s: &Sale| s.id);

    let empty = Vec::new();
    let total: Decimal = payload
        .get("lignes")
        .and_then(Value::as_array)
        .unwrap_or(&empty)
        .iter()
        .map(|l| decimal_from_value(&l["quantite_vendue"]) * decimal_from_value(&l["prix_unitaire"]))
        .sum();

    let now = Utc::now();
    Sale {
        id,
        // Last five digits of the id, zero-padded.
        invoice_number: format!("FAC-{}-{:05}", now.format("%Y%m%d"), id % 100_000),
        client_name: string_from_value(&payload["nom_client"])
            .unwrap_or_else(|| "Client demo".to_string()),
        total_amount: total,
        status: SaleStatus::Draft,
        date: now,
    }
}
