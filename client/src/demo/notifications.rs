//! Simulated notification endpoints

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};

use shared::{i64_from_value, string_from_value, AlertLevel, Notification};

use crate::storage::KeyValueStore;

use super::state::{self, DemoData};
use super::{parse_date, to_value};

/// Handle everything under `/api/notifications/`.
pub fn handle(
    store: &dyn KeyValueStore,
    data: &mut DemoData,
    path: &str,
    query: &str,
    method: &Method,
    body: Option<&Value>,
) -> Value {
    if path == "/api/notifications/generer_alertes/" && *method == Method::POST {
        let created = generate_alerts(data);
        state::save(store, data);
        return json!({"status": "ok", "notifications_creees": created});
    }

    if path == "/api/notifications/" && *method == Method::POST {
        let notification = create_notification(data, body);
        let response = to_value(&notification);
        data.notifications.push(notification);
        state::save(store, data);
        return response;
    }

    if *method == Method::GET {
        if let Some(user_id) = user_filter(query) {
            let visible: Vec<&Notification> = data
                .notifications
                .iter()
                .filter(|n| n.visible_to(user_id))
                .collect();
            return to_value(&visible);
        }
    }

    to_value(&data.notifications)
}

/// One notification per danger-level forecast alert.
fn generate_alerts(data: &mut DemoData) -> usize {
    let next_id = state::next_id(&data.notifications, 0, |n: &Notification| n.id);

    let new: Vec<Notification> = data
        .forecast_alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Danger)
        .enumerate()
        .map(|(idx, alert)| Notification {
            id: next_id + idx as i64,
            kind: format!("alerte_{}", alert.kind),
            message: format!("⚠️ ALERTE {}: {}", alert.product_name, alert.message),
            user_id: None,
            sent_at: Utc::now(),
            extra: Default::default(),
        })
        .collect();

    let created = new.len();
    data.notifications.extend(new);
    created
}

/// Create a notification from caller fields, coercing leniently the way
/// the rest of the simulator does (numeric strings accepted, send date
/// defaulted) and carrying unrecognized fields through untouched.
fn create_notification(data: &DemoData, body: Option<&Value>) -> Notification {
    let next = state::next_id(&data.notifications, 0, |n: &Notification| n.id);
    let mut fields = body
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    // A caller-supplied id wins over the generated one.
    let caller_id = fields
        .remove("id_notification")
        .map(|v| i64_from_value(&v))
        .unwrap_or(0);
    let kind = fields
        .remove("type_notification")
        .and_then(|v| string_from_value(&v))
        .unwrap_or_default();
    let message = fields
        .remove("message")
        .and_then(|v| string_from_value(&v))
        .unwrap_or_default();
    let user_id = fields
        .remove("utilisateur")
        .filter(|v| !v.is_null())
        .map(|v| i64_from_value(&v));
    let sent_at = fields
        .remove("date_envoi")
        .and_then(|v| parse_date(&v))
        .unwrap_or_else(Utc::now);

    Notification {
        id: if caller_id != 0 { caller_id } else { next },
        kind,
        message,
        user_id,
        sent_at,
        extra: fields,
    }
}

/// Extract `utilisateur=N` from the query string, if present.
fn user_filter(query: &str) -> Option<i64> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "utilisateur" {
            value.parse().ok()
        } else {
            None
        }
    })
}
