//! Demo mode request simulator
//!
//! Re-implements a subset of the backend's business rules against a JSON
//! document in the local key-value store, so the application keeps working
//! with no network at all. `simulate` is the single entry point: it maps
//! (endpoint, method, body) to the response value the backend would have
//! produced, persisting any mutation before returning. It never fails:
//! malformed bodies or stored state degrade to empty defaults, and an
//! unmatched path returns an empty list.

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::storage::KeyValueStore;

pub mod notifications;
pub mod procurement;
pub mod sales;
pub mod seed;
pub mod state;
pub mod stock;

pub use seed::{disable_demo_mode, enable_demo_mode};
pub use state::DemoData;

/// Simulate one backend call against the stored demo document.
pub fn simulate(
    store: &dyn KeyValueStore,
    endpoint: &str,
    method: &Method,
    body: Option<&Value>,
) -> Value {
    let (path, query) = match endpoint.split_once('?') {
        Some((path, query)) => (path, query),
        None => (endpoint, ""),
    };
    tracing::debug!("Demo request: {} {}", method, path);

    let mut data = state::load(store);

    if path.starts_with("/api/produits/") {
        return to_value(&data.products);
    }
    if path.starts_with("/api/categories/") {
        return to_value(&data.categories);
    }
    if path.starts_with("/api/entrepots/") {
        return to_value(&data.warehouses);
    }
    if path.starts_with("/api/lots/") {
        return stock::handle(store, &mut data, path, method, body);
    }
    if path.starts_with("/api/mouvements/") {
        return to_value(&data.movements);
    }
    if path.starts_with("/api/approvisionnements/") {
        return procurement::handle(store, &mut data, path, method, body);
    }
    if path.starts_with("/api/ventes/") {
        return sales::handle(store, &mut data, path, method, body);
    }
    if path.starts_with("/api/livraisons/") {
        return to_value(&data.deliveries);
    }
    if path.starts_with("/api/notifications/") {
        return notifications::handle(store, &mut data, path, query, method, body);
    }
    if path.starts_with("/api/previsions/tous_resumés/") {
        return to_value(&data.forecasts);
    }
    if path.starts_with("/api/previsions/risques_peremption/") {
        return to_value(&data.expiry_risks);
    }
    if path.starts_with("/api/previsions/predictions_ml/") {
        return to_value(&data.ml_predictions);
    }
    if path.starts_with("/api/previsions/alertes_critiques/") {
        return to_value(&data.forecast_alerts);
    }
    if path.starts_with("/api/utilisateurs/") {
        return to_value(&data.users);
    }

    // Unknown surface: empty list, never an error.
    json!([])
}

/// Serialize a collection or record for the response; serialization of our
/// own models cannot fail, so degrade to an empty list just in case.
fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| json!([]))
}

fn empty_object() -> Value {
    json!({})
}

/// Match `/{prefix}{id}/` and return the id.
fn match_resource_id(path: &str, prefix: &str) -> Option<i64> {
    let rest = path.strip_prefix(prefix)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// Match `/{prefix}{id}/{action}/` and return both parts.
fn match_resource_action(path: &str, prefix: &str) -> Option<(i64, String)> {
    let rest = path.strip_prefix(prefix)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let (id, action) = rest.split_once('/')?;
    if action.is_empty() || action.contains('/') || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((id.parse().ok()?, action.to_string()))
}

/// Parse a date field from a payload, accepting RFC 3339 strings.
fn parse_date(value: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}
