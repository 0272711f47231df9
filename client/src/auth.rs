//! Token persistence and lifecycle
//!
//! Tokens are opaque strings issued by the backend; the client only stores
//! them (under both historical key schemes), stamps a local expiry, and
//! decides when a silent refresh is needed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::{keys, KeyValueStore};

/// Login credentials sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token pair returned by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<Value>,
}

/// Store access and refresh tokens under both naming schemes and stamp
/// the expiry `ttl_secs` from now.
pub fn set_tokens(store: &dyn KeyValueStore, access: &str, refresh: &str, ttl_secs: i64) {
    store.set(keys::TOKEN, access);
    store.set(keys::ACCESS_TOKEN, access);
    store.set(keys::REFRESH_TOKEN_CAMEL, refresh);
    store.set(keys::REFRESH_TOKEN, refresh);

    let expiry = Utc::now() + Duration::seconds(ttl_secs);
    store.set(keys::TOKEN_EXPIRY, &expiry.to_rfc3339());
}

/// Clear every stored token and the cached user profile.
pub fn clear_tokens(store: &dyn KeyValueStore) {
    store.remove(keys::TOKEN);
    store.remove(keys::ACCESS_TOKEN);
    store.remove(keys::REFRESH_TOKEN_CAMEL);
    store.remove(keys::REFRESH_TOKEN);
    store.remove(keys::TOKEN_EXPIRY);
    store.remove(keys::USER_DATA);
}

/// Current access token, checking the legacy key first.
pub fn access_token(store: &dyn KeyValueStore) -> Option<String> {
    store
        .get(keys::TOKEN)
        .or_else(|| store.get(keys::ACCESS_TOKEN))
}

/// Current refresh token, checking the legacy key first.
pub fn refresh_token(store: &dyn KeyValueStore) -> Option<String> {
    store
        .get(keys::REFRESH_TOKEN_CAMEL)
        .or_else(|| store.get(keys::REFRESH_TOKEN))
}

/// A token is valid when it exists and its stored expiry is in the future.
pub fn is_token_valid(store: &dyn KeyValueStore) -> bool {
    let Some(_token) = access_token(store) else {
        return false;
    };
    let Some(expiry) = store.get(keys::TOKEN_EXPIRY) else {
        return false;
    };
    match DateTime::parse_from_rfc3339(&expiry) {
        Ok(expiry) => expiry > Utc::now(),
        Err(_) => false,
    }
}
