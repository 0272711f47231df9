//! Product catalog model (read-only from the client's perspective)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback product name used when a procurement line references an
/// unknown product and the caller gave no name.
pub const DEFAULT_PRODUCT_NAME: &str = "Produit";

/// Fallback unit of measure.
pub const DEFAULT_PRODUCT_UNIT: &str = "kg";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_produit", default)]
    pub id: i64,
    #[serde(rename = "nom_produit", default)]
    pub name: String,
    #[serde(rename = "unite", default = "default_unit")]
    pub unit: String,
    #[serde(rename = "prix_unitaire", default)]
    pub unit_price: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_unit() -> String {
    DEFAULT_PRODUCT_UNIT.to_string()
}
