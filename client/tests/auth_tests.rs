//! Authentication and token lifecycle tests
//!
//! Covers:
//! - Login stores access + refresh tokens under both key schemes with a
//!   1-hour expiry; `is_token_valid` flips once the expiry passes
//! - Logout clears tokens and cached profile even when the remote call fails
//! - Refresh replaces only the access token; failure clears the session
//! - Startup restore: expired token gets one silent refresh

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_client::storage::keys;
use stock_client::{auth, ApiClient, Config, Credentials, KeyValueStore, MemoryStore};

fn client_for(server: &MockServer) -> ApiClient {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    ApiClient::new(config, Arc::new(MemoryStore::new()))
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn login_stores_tokens_with_one_hour_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "acc-1",
            "refresh": "ref-1",
            "user": {"id_utilisateur": 1, "nom": "Admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tokens = client.login(&credentials()).await.unwrap();
    assert_eq!(tokens.access, "acc-1");
    assert_eq!(tokens.refresh, "ref-1");

    let store = client.store();
    assert_eq!(store.get(keys::TOKEN).as_deref(), Some("acc-1"));
    assert_eq!(store.get(keys::ACCESS_TOKEN).as_deref(), Some("acc-1"));
    assert_eq!(store.get(keys::REFRESH_TOKEN_CAMEL).as_deref(), Some("ref-1"));
    assert_eq!(store.get(keys::REFRESH_TOKEN).as_deref(), Some("ref-1"));

    // Expiry is stamped one hour out.
    let expiry = store.get(keys::TOKEN_EXPIRY).unwrap();
    let expiry = DateTime::parse_from_rfc3339(&expiry).unwrap();
    let remaining = expiry.signed_duration_since(Utc::now());
    assert!(remaining > Duration::seconds(3500));
    assert!(remaining <= Duration::seconds(3600));

    assert!(client.is_token_valid());
}

#[tokio::test]
async fn token_is_invalid_once_expiry_passes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "acc-1",
            "refresh": "ref-1"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.login(&credentials()).await.unwrap();
    assert!(client.is_token_valid());

    // Advance past the expiry by rewriting the stored stamp.
    let past = (Utc::now() - Duration::seconds(1)).to_rfc3339();
    client.store().set(keys::TOKEN_EXPIRY, &past);
    assert!(!client.is_token_valid());
}

#[tokio::test]
async fn login_failure_propagates_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Identifiants invalides"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.login(&credentials()).await.unwrap_err();
    assert_eq!(err.status(), 401);
    assert!(err.to_string().contains("Identifiants invalides"));
    assert!(!client.is_token_valid());
}

#[tokio::test]
async fn logout_clears_session_even_when_remote_call_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let store = client.store();
    auth::set_tokens(store, "acc", "ref", 3600);
    store.set(keys::USER_DATA, "{}");

    let result = client.logout().await;
    assert!(result.is_err());
    assert!(auth::access_token(store).is_none());
    assert!(auth::refresh_token(store).is_none());
    assert!(store.get(keys::USER_DATA).is_none());
}

#[tokio::test]
async fn refresh_replaces_access_token_and_keeps_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "acc-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    auth::set_tokens(client.store(), "acc-1", "ref-1", 3600);

    assert!(client.refresh_access_token().await);
    assert_eq!(auth::access_token(client.store()).as_deref(), Some("acc-2"));
    assert_eq!(auth::refresh_token(client.store()).as_deref(), Some("ref-1"));
}

#[tokio::test]
async fn refresh_failure_clears_all_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    auth::set_tokens(client.store(), "acc-1", "ref-1", 3600);

    assert!(!client.refresh_access_token().await);
    assert!(auth::access_token(client.store()).is_none());
    assert!(auth::refresh_token(client.store()).is_none());
}

#[tokio::test]
async fn refresh_without_stored_refresh_token_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "acc-2"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.refresh_access_token().await);
}

#[tokio::test]
async fn restore_session_refreshes_an_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "acc-2"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    auth::set_tokens(client.store(), "acc-1", "ref-1", 3600);
    let past = (Utc::now() - Duration::seconds(5)).to_rfc3339();
    client.store().set(keys::TOKEN_EXPIRY, &past);

    assert!(client.restore_session().await);
    assert_eq!(auth::access_token(client.store()).as_deref(), Some("acc-2"));
    assert!(client.is_token_valid());
}

#[tokio::test]
async fn restore_session_clears_tokens_when_refresh_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    auth::set_tokens(client.store(), "acc-1", "ref-1", 3600);
    let past = (Utc::now() - Duration::seconds(5)).to_rfc3339();
    client.store().set(keys::TOKEN_EXPIRY, &past);

    assert!(!client.restore_session().await);
    assert!(auth::access_token(client.store()).is_none());
}

#[tokio::test]
async fn user_profile_is_cached_and_degrades_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"nom": "Admin"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let profile = client.get_user_profile().await.unwrap();
    assert_eq!(profile["nom"], "Admin");
    assert!(client.store().get(keys::USER_DATA).is_some());

    // Unreachable backend: no panic, no error, just None.
    let offline = ApiClient::with_base_url("http://127.0.0.1:9");
    assert!(offline.get_user_profile().await.is_none());
}
