//! Procurement order ("approvisionnement") models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::now;

/// Status of a procurement order.
///
/// Nominal lifecycle: pending -> {in_transit, cancelled},
/// in_transit -> {delivered, cancelled}; delivered and cancelled are
/// terminal. The backend's action endpoints overwrite the status without
/// checking the previous one, and the demo simulator keeps that behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

/// Status of a single order line, derived from received vs ordered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    #[default]
    Pending,
    Partial,
    Delivered,
}

/// One line of a procurement order. Product name and unit are snapshots
/// taken from the catalog at creation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "id_ligne", default)]
    pub id: i64,
    #[serde(rename = "produit_id", default)]
    pub product_id: i64,
    #[serde(rename = "produit_nom", default)]
    pub product_name: String,
    #[serde(rename = "produit_unite", default)]
    pub product_unit: String,
    #[serde(rename = "quantite_commandee", default)]
    pub ordered: Decimal,
    #[serde(rename = "quantite_recue", default)]
    pub received: Decimal,
    #[serde(rename = "statut_ligne", default)]
    pub status: LineStatus,
}

impl OrderLine {
    /// Recompute the line status from its quantities: delivered once the
    /// full ordered quantity arrived, partial for anything in between.
    pub fn recompute_status(&mut self) {
        self.status = if self.received >= self.ordered {
            LineStatus::Delivered
        } else if self.received > Decimal::ZERO {
            LineStatus::Partial
        } else {
            LineStatus::Pending
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementOrder {
    #[serde(rename = "id_approvisionnement", default)]
    pub id: i64,
    #[serde(rename = "numero_commande", default)]
    pub order_number: String,
    #[serde(rename = "fournisseur", default)]
    pub supplier: String,
    #[serde(rename = "statut_approvisionnement", default)]
    pub status: OrderStatus,
    #[serde(rename = "date_commande", default = "now")]
    pub order_date: DateTime<Utc>,
    #[serde(rename = "date_livraison_attendue", default = "now")]
    pub expected_delivery: DateTime<Utc>,
    #[serde(rename = "entrepot_nom", default)]
    pub warehouse_name: String,
    #[serde(rename = "gestionnaire_nom", default)]
    pub manager_name: String,
    #[serde(rename = "total_quantite_commandee", default)]
    pub total_ordered: Decimal,
    #[serde(rename = "total_quantite_recue", default)]
    pub total_received: Decimal,
    #[serde(rename = "lignes", default)]
    pub lines: Vec<OrderLine>,
    #[serde(rename = "notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for ProcurementOrder {
    fn default() -> Self {
        Self {
            id: 0,
            order_number: String::new(),
            supplier: String::new(),
            status: OrderStatus::Pending,
            order_date: Utc::now(),
            expected_delivery: Utc::now(),
            warehouse_name: String::new(),
            manager_name: String::new(),
            total_ordered: Decimal::ZERO,
            total_received: Decimal::ZERO,
            lines: Vec::new(),
            notes: None,
        }
    }
}

impl ProcurementOrder {
    /// Total received quantity is always the sum over the lines.
    pub fn recompute_total_received(&mut self) {
        self.total_received = self.lines.iter().map(|l| l.received).sum();
    }
}

/// Per-status order counts served by the stats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStats {
    pub total_pending: usize,
    pub total_in_transit: usize,
    pub total_delivered: usize,
    pub total_cancelled: usize,
}
