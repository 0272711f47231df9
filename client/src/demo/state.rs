//! Demo document persistence
//!
//! The whole demo state is one JSON document in the key-value store. Every
//! simulated call loads it, mutates it in memory, and writes it back as a
//! whole-document overwrite. There is no locking around the load/save
//! cycle: two simulated calls in flight at once can lose updates. That is
//! an accepted limitation of the offline mode, matched to a runtime that
//! serializes storage access between suspension points.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared::{ForecastAlert, Lot, Notification, ProcurementOrder, Product, Sale};

use crate::storage::KeyValueStore;

/// Current document key; older versions are read for backward
/// compatibility but never written.
pub const DEMO_DATA_KEY: &str = "demo_data_v3";
const LEGACY_KEYS: [&str; 2] = ["demo_data_v2", "demo_data_v1"];

/// The demo document. Every collection defaults to empty so a partial or
/// missing document never fails to load; unknown top-level keys written by
/// other frontend versions ride along in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemoData {
    #[serde(rename = "produits", default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Value>,
    #[serde(rename = "entrepots", default)]
    pub warehouses: Vec<Value>,
    #[serde(default)]
    pub lots: Vec<Lot>,
    #[serde(rename = "mouvements", default)]
    pub movements: Vec<Value>,
    #[serde(rename = "approvisionnements", default)]
    pub procurements: Vec<ProcurementOrder>,
    #[serde(rename = "ventes", default)]
    pub sales: Vec<Sale>,
    #[serde(rename = "livraisons", default)]
    pub deliveries: Vec<Value>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(rename = "previsions", default)]
    pub forecasts: Vec<Value>,
    #[serde(rename = "risques_peremption", default)]
    pub expiry_risks: Vec<Value>,
    #[serde(rename = "predictions_ml", default)]
    pub ml_predictions: Vec<Value>,
    #[serde(rename = "previsions_alertes", default)]
    pub forecast_alerts: Vec<ForecastAlert>,
    #[serde(rename = "utilisateurs", default)]
    pub users: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Load the demo document, falling back through older version keys and
/// ending on an empty document when nothing parses.
pub fn load(store: &dyn KeyValueStore) -> DemoData {
    for key in std::iter::once(DEMO_DATA_KEY).chain(LEGACY_KEYS) {
        if let Some(raw) = store.get(key) {
            match serde_json::from_str(&raw) {
                Ok(data) => return data,
                Err(err) => {
                    tracing::warn!("Demo document under {} is unreadable: {}", key, err);
                }
            }
        }
    }
    DemoData::default()
}

/// Write the document back under the current version key.
pub fn save(store: &dyn KeyValueStore, data: &DemoData) {
    match serde_json::to_string(data) {
        Ok(raw) => store.set(DEMO_DATA_KEY, &raw),
        Err(err) => tracing::error!("Failed to serialize demo document: {}", err),
    }
}

/// Next id for a collection: max of existing plus one, with a floor.
pub fn next_id<T>(items: &[T], floor: i64, id: impl Fn(&T) -> i64) -> i64 {
    items.iter().map(&id).max().unwrap_or(0).max(floor) + 1
}
