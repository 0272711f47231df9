//! Demo simulator tests: lots, passthroughs, document handling
//!
//! Covers:
//! - Lot creation assigns strictly increasing ids (property-checked)
//! - Lot update shallow-merges fields, delete removes the record
//! - Read-only collections pass through, unmatched paths yield empty lists
//! - Document version fallback v3 -> v2 -> v1 -> empty, skipping bad JSON

use proptest::prelude::*;
use serde_json::{json, Value};

use stock_client::demo::{seed, state};
use stock_client::{simulate, KeyValueStore, MemoryStore, Method};

fn get(store: &MemoryStore, endpoint: &str) -> Value {
    simulate(store, endpoint, &Method::GET, None)
}

fn post(store: &MemoryStore, endpoint: &str, body: Value) -> Value {
    simulate(store, endpoint, &Method::POST, Some(&body))
}

// ============================================================================
// Lots
// ============================================================================

#[test]
fn lot_creation_assigns_the_next_id_and_keeps_caller_fields() {
    let store = MemoryStore::new();

    let lot = post(&store, "/api/lots/", json!({"produit": 2, "quantite": 40}));
    assert_eq!(lot["id_lot"], 1);
    assert_eq!(lot["quantite"], 40);

    let lot = post(&store, "/api/lots/", json!({"produit": 3}));
    assert_eq!(lot["id_lot"], 2);

    let lots = get(&store, "/api/lots/");
    assert_eq!(lots.as_array().unwrap().len(), 2);
}

#[test]
fn lot_update_is_a_shallow_merge() {
    let store = MemoryStore::new();
    post(&store, "/api/lots/", json!({"quantite": 40, "notes": "a"}));

    let updated = simulate(
        &store,
        "/api/lots/1/",
        &Method::PUT,
        Some(&json!({"quantite": 12})),
    );
    assert_eq!(updated["id_lot"], 1);
    assert_eq!(updated["quantite"], 12);
    assert_eq!(updated["notes"], "a");
}

#[test]
fn lot_delete_removes_the_record() {
    let store = MemoryStore::new();
    post(&store, "/api/lots/", json!({"quantite": 40}));
    post(&store, "/api/lots/", json!({"quantite": 10}));

    let response = simulate(&store, "/api/lots/1/", &Method::DELETE, None);
    assert_eq!(response, json!({"success": true}));

    let lots = get(&store, "/api/lots/");
    assert_eq!(lots.as_array().unwrap().len(), 1);
    assert_eq!(lots[0]["id_lot"], 2);
}

#[test]
fn lot_ids_stay_monotonic_after_deletes() {
    let store = MemoryStore::new();
    post(&store, "/api/lots/", json!({}));
    post(&store, "/api/lots/", json!({}));
    simulate(&store, "/api/lots/2/", &Method::DELETE, None);

    // Max existing is 1 again, so the next id is 2, still fresh.
    let lot = post(&store, "/api/lots/", json!({}));
    assert_eq!(lot["id_lot"], 2);
}

proptest! {
    /// Every created lot gets an id strictly greater than all previously
    /// assigned ids in the collection.
    #[test]
    fn created_ids_strictly_increase(quantities in prop::collection::vec(0u32..1000, 1..20)) {
        let store = MemoryStore::new();
        let mut last_id = 0i64;
        for quantity in quantities {
            let lot = post(&store, "/api/lots/", json!({"quantite": quantity}));
            let id = lot["id_lot"].as_i64().unwrap();
            prop_assert!(id > last_id);
            last_id = id;
        }
    }
}

// ============================================================================
// Passthroughs and defaults
// ============================================================================

#[test]
fn read_only_collections_pass_through() {
    let store = MemoryStore::new();
    state::save(&store, &seed::seed_demo_data());

    assert!(!get(&store, "/api/produits/").as_array().unwrap().is_empty());
    assert!(!get(&store, "/api/utilisateurs/").as_array().unwrap().is_empty());
    assert!(!get(&store, "/api/mouvements/").as_array().unwrap().is_empty());
    assert!(!get(&store, "/api/livraisons/").as_array().unwrap().is_empty());
    assert!(!get(&store, "/api/previsions/alertes_critiques/")
        .as_array()
        .unwrap()
        .is_empty());
    assert!(!get(&store, "/api/previsions/risques_peremption/")
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn unmatched_paths_return_an_empty_list_never_an_error() {
    let store = MemoryStore::new();
    assert_eq!(get(&store, "/api/unknown/"), json!([]));
    assert_eq!(
        simulate(&store, "/api/reports/", &Method::POST, Some(&json!({"x": 1}))),
        json!([])
    );
    // Malformed body on a known endpoint degrades instead of failing.
    assert_eq!(
        simulate(&store, "/api/lots/", &Method::POST, Some(&json!("not an object")))["id_lot"],
        1
    );
}

#[test]
fn collections_default_to_empty_on_a_fresh_store() {
    let store = MemoryStore::new();
    assert_eq!(get(&store, "/api/produits/"), json!([]));
    assert_eq!(get(&store, "/api/ventes/"), json!([]));
    assert_eq!(get(&store, "/api/notifications/"), json!([]));
}

// ============================================================================
// Document versioning
// ============================================================================

#[test]
fn reader_falls_back_through_version_keys() {
    let store = MemoryStore::new();
    store.set("demo_data_v1", r#"{"lots":[{"id_lot":1,"quantite":5}]}"#);
    assert_eq!(get(&store, "/api/lots/")[0]["id_lot"], 1);

    store.set("demo_data_v2", r#"{"lots":[{"id_lot":2,"quantite":9}]}"#);
    assert_eq!(get(&store, "/api/lots/")[0]["id_lot"], 2);

    store.set("demo_data_v3", r#"{"lots":[{"id_lot":3,"quantite":1}]}"#);
    assert_eq!(get(&store, "/api/lots/")[0]["id_lot"], 3);
}

#[test]
fn unparsable_current_version_is_skipped() {
    let store = MemoryStore::new();
    store.set("demo_data_v3", "{broken json");
    store.set("demo_data_v2", r#"{"lots":[{"id_lot":7}]}"#);
    assert_eq!(get(&store, "/api/lots/")[0]["id_lot"], 7);
}

#[test]
fn mutations_are_written_to_the_current_version_key() {
    let store = MemoryStore::new();
    store.set("demo_data_v1", r#"{"lots":[{"id_lot":1}]}"#);

    post(&store, "/api/lots/", json!({"quantite": 3}));

    // The v1 document was migrated forward on write.
    let raw = store.get("demo_data_v3").unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["lots"].as_array().unwrap().len(), 2);
}

#[test]
fn unknown_top_level_keys_survive_a_write_cycle() {
    let store = MemoryStore::new();
    store.set(
        "demo_data_v3",
        r#"{"lots":[],"parametres_affichage":{"theme":"sombre"}}"#,
    );

    post(&store, "/api/lots/", json!({}));

    let raw = store.get("demo_data_v3").unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["parametres_affichage"]["theme"], "sombre");
}
