//! Sale ("vente") models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::now;

/// Status of a sale. Wire values are the backend's French labels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SaleStatus {
    #[default]
    #[serde(rename = "brouillon")]
    Draft,
    #[serde(rename = "validée")]
    Validated,
    #[serde(rename = "annulée")]
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "id_vente", default)]
    pub id: i64,
    #[serde(rename = "numero_facture", default)]
    pub invoice_number: String,
    #[serde(rename = "nom_client", default)]
    pub client_name: String,
    #[serde(rename = "montant_total", default)]
    pub total_amount: Decimal,
    #[serde(rename = "statut_vente", default)]
    pub status: SaleStatus,
    #[serde(rename = "date_vente", default = "now")]
    pub date: DateTime<Utc>,
}

impl Default for Sale {
    fn default() -> Self {
        Self {
            id: 0,
            invoice_number: String::new(),
            client_name: String::new(),
            total_amount: Decimal::ZERO,
            status: SaleStatus::Draft,
            date: Utc::now(),
        }
    }
}
