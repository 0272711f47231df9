//! Seeded demo document
//!
//! Builds a realistic starting state so demo mode has data before the
//! first user action: products across every stock scenario (out of stock,
//! low, near expiry, normal, overstock), procurement orders in mixed
//! statuses, validated sales, deliveries, stock movements, and forecast
//! alerts at both severities. Deterministic on purpose: a demo that looks
//! the same on every machine is easier to present and to test against.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use shared::{
    AlertLevel, ForecastAlert, LineStatus, Lot, Notification, OrderLine, OrderStatus,
    ProcurementOrder, Product, Sale, SaleStatus,
};

use crate::storage::{keys, KeyValueStore};

use super::state::{self, DemoData};

/// Turn demo mode on, seeding the document when none exists yet.
pub fn enable_demo_mode(store: &dyn KeyValueStore) {
    store.set(keys::DEMO_MODE, "true");
    let has_document = [state::DEMO_DATA_KEY, "demo_data_v2", "demo_data_v1"]
        .iter()
        .any(|key| store.get(key).is_some());
    if !has_document {
        tracing::info!("Seeding demo document");
        state::save(store, &seed_demo_data());
    }
}

/// Turn demo mode off. The document is kept so re-enabling resumes where
/// the user left off.
pub fn disable_demo_mode(store: &dyn KeyValueStore) {
    store.remove(keys::DEMO_MODE);
}

/// Build the full seeded document.
pub fn seed_demo_data() -> DemoData {
    let today = Utc::now();
    let day = |n: i64| today - Duration::days(n);
    let in_days = |n: i64| today + Duration::days(n);
    let date = |n: i64| day(n).format("%Y-%m-%d").to_string();
    let stamp = today.format("%Y%m");

    let products = vec![
        product(1, "Bar", "kg", 4500),
        product(2, "Tilapia", "kg", 2500),
        product(3, "Crevettes roses", "kg", 8000),
        product(4, "Maquereau", "kg", 1800),
        product(5, "Capitaine", "kg", 5200),
        product(6, "Sole", "kg", 6000),
        product(7, "Dorade", "kg", 4000),
        product(8, "Bonga fumé", "kg", 3000),
    ];

    // One lot per product, covering every stock scenario.
    let scenarios: &[(i64, i64, i64, &str)] = &[
        // (product, quantity, days until expiry, status)
        (1, 1, 4, "epuise"),      // out of stock
        (2, 12, 12, "faible"),    // low stock
        (3, 35, 2, "disponible"), // expires in 2 days
        (4, 120, 20, "disponible"),
        (5, 90, 25, "disponible"),
        (6, 160, 30, "disponible"),
        (7, 420, 35, "disponible"), // overstock
        (8, 60, 18, "disponible"),
    ];
    let lots: Vec<Lot> = scenarios
        .iter()
        .enumerate()
        .map(|(i, (product_id, quantity, expires, status))| {
            let name = &products[(*product_id - 1) as usize].name;
            Lot::from_payload(
                i as i64 + 1,
                &json!({
                    "produit": product_id,
                    "nom_produit": name,
                    "quantite": quantity,
                    "date_reception": date(i as i64 + 1),
                    "date_peremption": in_days(*expires).format("%Y-%m-%d").to_string(),
                    "statut_lot": status,
                    "notes": format!("LOT-{}-{:03} - Pêcherie Douala", stamp, i + 1),
                }),
            )
        })
        .collect();

    let procurements = vec![
        order(1, "Pêcherie Douala", OrderStatus::Pending, &products, &[(2, 100), (4, 150)], today),
        order(2, "Aquaculture Kribi", OrderStatus::InTransit, &products, &[(3, 60), (5, 80)], today),
        order(3, "Import Mer SA", OrderStatus::Delivered, &products, &[(1, 200)], today),
    ];

    let sales = vec![
        sale(501, "Restaurant Le Gourmet", &[(15, 4500), (10, 2500)], SaleStatus::Validated, day(3)),
        sale(502, "Hôtel Hilton", &[(8, 8000)], SaleStatus::Validated, day(1)),
        sale(503, "Supermarché Carrefour", &[(25, 1800)], SaleStatus::Draft, today),
    ];

    let deliveries = vec![
        json!({
            "id_livraison": 1,
            "numero_suivi": format!("LIV-{}-001", stamp),
            "statut_livraison": "en_cours",
            "destination": "Douala - Centre Ville",
            "chauffeur_nom": "Paul Mbarga",
            "date_planifiee": date(2),
            "notes": "Livraison en retard",
        }),
        json!({
            "id_livraison": 2,
            "numero_suivi": format!("LIV-{}-002", stamp),
            "statut_livraison": "livrée",
            "destination": "Yaoundé - Bastos",
            "chauffeur_nom": "Marie Ebelle",
            "date_planifiee": date(1),
            "date_livraison": date(1),
            "notes": "Livraison planifiée",
        }),
    ];

    let movements = vec![
        json!({"id_mouvement": 1, "lot": 4, "type_mouvement": "entree", "quantite": 30, "date_mouvement": date(5)}),
        json!({"id_mouvement": 2, "lot": 4, "type_mouvement": "sortie", "quantite": 12, "date_mouvement": date(3)}),
        json!({"id_mouvement": 3, "lot": 6, "type_mouvement": "ajustement", "quantite": 5, "date_mouvement": date(1)}),
    ];

    let forecast_alerts = vec![
        ForecastAlert {
            kind: "rupture".to_string(),
            level: AlertLevel::Danger,
            product_name: "Bar".to_string(),
            message: "Rupture de stock prévue sous 3 jours".to_string(),
            extra: Default::default(),
        },
        ForecastAlert {
            kind: "peremption".to_string(),
            level: AlertLevel::Danger,
            product_name: "Crevettes roses".to_string(),
            message: "35 kg expirent dans 2 jours".to_string(),
            extra: Default::default(),
        },
        ForecastAlert {
            kind: "surstock".to_string(),
            level: AlertLevel::Warning,
            product_name: "Dorade".to_string(),
            message: "Stock excédentaire de 420 kg".to_string(),
            extra: Default::default(),
        },
    ];

    let expiry_risks = vec![
        json!({"produit_nom": "Crevettes roses", "quantite": 35, "jours_restants": 2, "niveau": "danger"}),
        json!({"produit_nom": "Tilapia", "quantite": 12, "jours_restants": 12, "niveau": "warning"}),
    ];

    let notifications = vec![Notification {
        id: 1,
        kind: "systeme".to_string(),
        message: "Bienvenue dans le mode démo".to_string(),
        user_id: None,
        sent_at: today,
        extra: Default::default(),
    }];

    DemoData {
        products,
        categories: vec![
            json!({"id_categorie": 1, "nom_categorie": "Poissons frais"}),
            json!({"id_categorie": 2, "nom_categorie": "Fruits de mer"}),
            json!({"id_categorie": 3, "nom_categorie": "Produits fumés"}),
        ],
        warehouses: vec![
            json!({"id_entrepot": 1, "nom_entrepot": "Entrepot Central"}),
            json!({"id_entrepot": 2, "nom_entrepot": "Chambre froide Kribi"}),
        ],
        lots,
        movements,
        procurements,
        sales,
        deliveries,
        notifications,
        forecasts: vec![
            json!({"produit_nom": "Tilapia", "tendance": "croissante", "prevision_30j": 180}),
            json!({"produit_nom": "Maquereau", "tendance": "stable", "prevision_30j": 95}),
        ],
        expiry_risks,
        ml_predictions: vec![
            json!({"produit_nom": "Bar", "modele": "moyenne_mobile", "prevision_7j": 28}),
        ],
        forecast_alerts,
        users: vec![
            json!({"id_utilisateur": 1, "nom": "Admin Demo", "role": "admin"}),
            json!({"id_utilisateur": 2, "nom": "Gestionnaire Stock", "role": "gestionnaire_stock"}),
            json!({"id_utilisateur": 3, "nom": "Gestionnaire Logistique", "role": "gestionnaire_logistique"}),
        ],
        extra: Default::default(),
    }
}

fn product(id: i64, name: &str, unit: &str, price: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        unit: unit.to_string(),
        unit_price: Some(Decimal::from(price)),
        extra: Default::default(),
    }
}

fn order(
    id: i64,
    supplier: &str,
    status: OrderStatus,
    products: &[Product],
    items: &[(i64, i64)],
    today: chrono::DateTime<Utc>,
) -> ProcurementOrder {
    let delivered = status == OrderStatus::Delivered;
    let lines: Vec<OrderLine> = items
        .iter()
        .enumerate()
        .map(|(idx, (product_id, quantity))| {
            let product = products.iter().find(|p| p.id == *product_id);
            let ordered = Decimal::from(*quantity);
            OrderLine {
                id: id * 100 + idx as i64 + 1,
                product_id: *product_id,
                product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                product_unit: product.map(|p| p.unit.clone()).unwrap_or_default(),
                ordered,
                received: if delivered { ordered } else { Decimal::ZERO },
                status: if delivered {
                    LineStatus::Delivered
                } else {
                    LineStatus::Pending
                },
            }
        })
        .collect();

    let mut order = ProcurementOrder {
        id,
        order_number: format!("CMD-{}-{:03}", today.format("%Y%m"), id),
        supplier: supplier.to_string(),
        status,
        order_date: today - Duration::days(id),
        expected_delivery: today + Duration::days(3),
        warehouse_name: "Entrepot Central".to_string(),
        manager_name: "Gestionnaire Logistique".to_string(),
        total_ordered: lines.iter().map(|l| l.ordered).sum(),
        total_received: Decimal::ZERO,
        lines,
        notes: None,
    };
    order.recompute_total_received();
    order
}

fn sale(
    id: i64,
    client: &str,
    items: &[(i64, i64)],
    status: SaleStatus,
    date: chrono::DateTime<Utc>,
) -> Sale {
    let total: Decimal = items
        .iter()
        .map(|(quantity, price)| Decimal::from(*quantity) * Decimal::from(*price))
        .sum();
    Sale {
        id,
        invoice_number: format!("FAC-{}-{:05}", date.format("%Y%m%d"), id % 100_000),
        client_name: client.to_string(),
        total_amount: total,
        status,
        date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_document_covers_every_collection() {
        let data = seed_demo_data();
        assert!(!data.products.is_empty());
        assert!(!data.lots.is_empty());
        assert!(!data.procurements.is_empty());
        assert!(!data.sales.is_empty());
        assert!(!data.forecast_alerts.is_empty());
        assert!(!data.users.is_empty());
    }

    #[test]
    fn seeded_order_totals_are_consistent() {
        let data = seed_demo_data();
        for order in &data.procurements {
            let sum: Decimal = order.lines.iter().map(|l| l.received).sum();
            assert_eq!(order.total_received, sum);
        }
    }

    #[test]
    fn seeded_alerts_cover_both_severities() {
        let data = seed_demo_data();
        assert!(data
            .forecast_alerts
            .iter()
            .any(|a| a.level == AlertLevel::Danger));
        assert!(data
            .forecast_alerts
            .iter()
            .any(|a| a.level == AlertLevel::Warning));
    }

    #[test]
    fn enable_seeds_once() {
        let store = crate::storage::MemoryStore::new();
        enable_demo_mode(&store);
        assert_eq!(store.get(keys::DEMO_MODE).as_deref(), Some("true"));
        let first = store.get(state::DEMO_DATA_KEY).unwrap();

        // A second enable must not clobber user mutations.
        store.set(state::DEMO_DATA_KEY, r#"{"lots":[]}"#);
        enable_demo_mode(&store);
        assert_eq!(store.get(state::DEMO_DATA_KEY).as_deref(), Some(r#"{"lots":[]}"#));
        assert_ne!(first, r#"{"lots":[]}"#);
    }
}
