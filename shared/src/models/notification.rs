//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::now;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "id_notification", default)]
    pub id: i64,
    #[serde(rename = "type_notification", default)]
    pub kind: String,
    #[serde(rename = "message", default)]
    pub message: String,
    /// Recipient user id; a notification without one is visible to everyone.
    #[serde(rename = "utilisateur", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(rename = "date_envoi", default = "now")]
    pub sent_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            id: 0,
            kind: String::new(),
            message: String::new(),
            user_id: None,
            sent_at: Utc::now(),
            extra: Map::new(),
        }
    }
}

impl Notification {
    /// Whether this notification should be shown to the given user:
    /// unaddressed notifications go to everyone.
    pub fn visible_to(&self, user_id: i64) -> bool {
        self.user_id.is_none() || self.user_id == Some(user_id)
    }
}
