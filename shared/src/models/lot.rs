//! Stock lot model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stock lot (one batch of product held in inventory).
///
/// Beyond the id the backend accepts arbitrary fields on creation, so
/// everything else is carried as-is in `fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lot {
    #[serde(rename = "id_lot", default)]
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Lot {
    /// Build a lot from an arbitrary JSON object, pulling out `id_lot` if
    /// the caller supplied one (it gets overwritten on creation anyway).
    pub fn from_payload(id: i64, payload: &Value) -> Self {
        let mut fields = payload.as_object().cloned().unwrap_or_default();
        fields.remove("id_lot");
        Self { id, fields }
    }

    /// Shallow-merge caller fields into this lot, as a PUT does.
    pub fn merge(&mut self, payload: &Value) {
        if let Some(obj) = payload.as_object() {
            for (key, value) in obj {
                if key != "id_lot" {
                    self.fields.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_arbitrary_fields() {
        let lot = Lot::from_payload(3, &json!({"produit": 1, "quantite": 40}));
        let value = serde_json::to_value(&lot).unwrap();
        assert_eq!(value["id_lot"], 3);
        assert_eq!(value["quantite"], 40);
    }

    #[test]
    fn merge_overwrites_without_touching_id() {
        let mut lot = Lot::from_payload(7, &json!({"quantite": 40}));
        lot.merge(&json!({"quantite": 12, "id_lot": 99, "notes": "x"}));
        assert_eq!(lot.id, 7);
        assert_eq!(lot.fields["quantite"], 12);
        assert_eq!(lot.fields["notes"], "x");
    }
}
