//! Simulated lot (stock) endpoints

use reqwest::Method;
use serde_json::{json, Value};

use shared::Lot;

use crate::storage::KeyValueStore;

use super::state::{self, DemoData};
use super::{empty_object, match_resource_id, to_value};

/// Handle everything under `/api/lots/`.
pub fn handle(
    store: &dyn KeyValueStore,
    data: &mut DemoData,
    path: &str,
    method: &Method,
    body: Option<&Value>,
) -> Value {
    if *method == Method::GET {
        return to_value(&data.lots);
    }

    if *method == Method::POST {
        let payload = body.cloned().unwrap_or_else(empty_object);
        let id = state::next_id(&data.lots, 0, |l: &Lot| l.id);
        let lot = Lot::from_payload(id, &payload);
        let response = to_value(&lot);
        data.lots.push(lot);
        state::save(store, data);
        return response;
    }

    if let Some(id) = match_resource_id(path, "/api/lots/") {
        if *method == Method::PUT {
            let payload = body.cloned().unwrap_or_else(empty_object);
            for lot in data.lots.iter_mut().filter(|l| l.id == id) {
                lot.merge(&payload);
            }
            state::save(store, data);
            return data
                .lots
                .iter()
                .find(|l| l.id == id)
                .map(to_value)
                .unwrap_or(payload);
        }
        if *method == Method::DELETE {
            data.lots.retain(|l| l.id != id);
            state::save(store, data);
            return json!({"success": true});
        }
    }

    to_value(&data.lots)
}
