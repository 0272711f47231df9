//! Forecast alert model
//!
//! Forecast alerts are precomputed by the backend's prediction service and
//! stored read-only in the demo document; the simulator only scans them
//! when generating notifications.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Severity of a forecast alert.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Danger,
    Warning,
    #[default]
    #[serde(other)]
    Info,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastAlert {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "niveau", default)]
    pub level: AlertLevel,
    #[serde(rename = "produit_nom", default)]
    pub product_name: String,
    #[serde(rename = "message", default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
