//! HTTP client for the remote inventory backend
//!
//! All traffic funnels through [`ApiClient::request`]: it joins the fixed
//! base URL with a catalog endpoint, attaches the bearer token, enforces
//! the request timeout, retries exactly once after a token refresh on 401,
//! and normalizes every failure into [`ApiError`]. When the persisted demo
//! flag is set, non-auth requests are diverted to the local simulator and
//! never touch the network.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use shared::{Lot, OrderStats, ProcurementOrder, Product, Sale};

use crate::auth::{self, Credentials, TokenPair};
use crate::config::Config;
use crate::demo;
use crate::endpoints::{self, with_query};
use crate::error::{ApiError, ApiResult};
use crate::storage::{keys, KeyValueStore, MemoryStore};

/// One file to send as a multipart form field. Bytes are owned so the
/// request can be rebuilt for the post-refresh retry.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Per-request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub file: Option<FilePart>,
    /// Overrides the configured timeout for this request only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            file: None,
            timeout: None,
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            file: None,
            timeout: None,
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            file: None,
            timeout: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            body: None,
            file: None,
            timeout: None,
        }
    }

    /// Multipart POST carrying one file field.
    pub fn upload(field_name: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            body: None,
            file: Some(FilePart {
                field_name: field_name.to_string(),
                file_name: file_name.to_string(),
                bytes,
            }),
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A successful response: JSON when the content type says so, raw text
/// otherwise.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// The body as a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        }
    }

    /// Deserialize a JSON body into a typed model.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            ResponseBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
            }
            ResponseBody::Text(_) => {
                Err(ApiError::Decode("expected a JSON response".to_string()))
            }
        }
    }
}

/// Client for the inventory backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<Config>,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client with the given configuration and storage backend.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
            store,
        }
    }

    /// Create a client against a custom base URL with in-memory storage
    /// (for testing).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Config::default();
        config.api.base_url = base_url.into();
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Whether the persisted demo flag is set.
    pub fn demo_mode_enabled(&self) -> bool {
        self.store.get(keys::DEMO_MODE).as_deref() == Some("true")
    }

    // ------------------------------------------------------------------
    // Generic request path
    // ------------------------------------------------------------------

    /// Issue one request against the catalog. Demo mode diverts non-auth
    /// endpoints to the simulator; a 401 triggers at most one token
    /// refresh followed by one retry.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResult<ResponseBody> {
        if self.demo_mode_enabled() && !endpoints::is_auth_endpoint(endpoint) {
            let value = demo::simulate(
                self.store.as_ref(),
                endpoint,
                &options.method,
                options.body.as_ref(),
            );
            return Ok(ResponseBody::Json(value));
        }

        let err = match self.send(endpoint, &options).await {
            Ok(body) => return Ok(body),
            Err(err) => err,
        };

        if let ApiError::Http { status: 401, .. } = &err {
            let refreshable = !endpoint.contains("/token/refresh/")
                && auth::refresh_token(self.store.as_ref()).is_some();
            if refreshable {
                tracing::debug!("401 on {}, attempting token refresh", endpoint);
                if Box::pin(self.refresh_access_token()).await {
                    // One retry with the new token; a second 401 propagates.
                    return self.send(endpoint, &options).await;
                }
            }
        }
        Err(err)
    }

    async fn send(&self, endpoint: &str, options: &RequestOptions) -> ApiResult<ResponseBody> {
        let url = format!("{}{}", self.config.api.base_url, endpoint);
        let timeout = options
            .timeout
            .unwrap_or_else(|| Duration::from_secs(self.config.api.timeout_secs));

        let mut request = self
            .http
            .request(options.method.clone(), &url)
            .timeout(timeout);

        if !endpoints::is_auth_endpoint(endpoint) {
            if let Some(token) = auth::access_token(self.store.as_ref()) {
                request = request.bearer_auth(token);
            }
        }
        if let Some(file) = &options.file {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone());
            let form = reqwest::multipart::Form::new().part(file.field_name.clone(), part);
            request = request.multipart(form);
        } else if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            tracing::error!("API request failed ({}): {}", endpoint, err);
            ApiError::from(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);

        if is_json {
            Ok(ResponseBody::Json(response.json().await?))
        } else {
            Ok(ResponseBody::Text(response.text().await?))
        }
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Log in: clears any stale tokens first, then stores the new pair
    /// with a fresh expiry stamp.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<TokenPair> {
        auth::clear_tokens(self.store.as_ref());

        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let tokens: TokenPair = self
            .request(endpoints::LOGIN, RequestOptions::post(body))
            .await?
            .decode()?;

        auth::set_tokens(
            self.store.as_ref(),
            &tokens.access,
            &tokens.refresh,
            self.config.auth.token_ttl_secs,
        );
        Ok(tokens)
    }

    /// Log out. Stored tokens and the cached profile are cleared even when
    /// the remote call fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self
            .request(endpoints::LOGOUT, RequestOptions::post(json!({})))
            .await;
        auth::clear_tokens(self.store.as_ref());
        result.map(|_| ())
    }

    /// Attempt one token refresh. On success only the access token is
    /// replaced (the refresh token is kept); on failure all tokens are
    /// cleared. Returns whether the refresh succeeded.
    pub async fn refresh_access_token(&self) -> bool {
        let Some(refresh) = auth::refresh_token(self.store.as_ref()) else {
            return false;
        };

        let result = self
            .request(
                endpoints::REFRESH_TOKEN,
                RequestOptions::post(json!({ "refresh": refresh })),
            )
            .await
            .and_then(|body| body.decode::<Value>());

        match result.ok().and_then(|v| {
            v.get("access")
                .and_then(Value::as_str)
                .map(str::to_string)
        }) {
            Some(access) => {
                auth::set_tokens(
                    self.store.as_ref(),
                    &access,
                    &refresh,
                    self.config.auth.token_ttl_secs,
                );
                true
            }
            None => {
                tracing::warn!("Token refresh failed, clearing session");
                auth::clear_tokens(self.store.as_ref());
                false
            }
        }
    }

    /// Startup check: a present-but-expired token gets one silent refresh;
    /// on failure the session is cleared. Returns whether a valid session
    /// remains.
    pub async fn restore_session(&self) -> bool {
        let store = self.store.as_ref();
        if auth::access_token(store).is_some() && !auth::is_token_valid(store) {
            return self.refresh_access_token().await;
        }
        auth::is_token_valid(store)
    }

    /// Token validity from the stored expiry stamp.
    pub fn is_token_valid(&self) -> bool {
        auth::is_token_valid(self.store.as_ref())
    }

    /// Fetch and cache the user profile; degrades to `None` on failure.
    pub async fn get_user_profile(&self) -> Option<Value> {
        match self
            .request(endpoints::USER_PROFILE, RequestOptions::get())
            .await
        {
            Ok(body) => {
                let profile = body.into_value();
                self.store.set(keys::USER_DATA, &profile.to_string());
                Some(profile)
            }
            Err(err) => {
                tracing::warn!("Could not fetch user profile: {}", err);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Stock
    // ------------------------------------------------------------------

    pub async fn get_stocks(&self, params: &[(&str, String)]) -> ApiResult<Vec<Lot>> {
        self.request(&with_query(endpoints::STOCKS, params), RequestOptions::get())
            .await?
            .decode()
    }

    pub async fn get_stock(&self, id: i64) -> ApiResult<Lot> {
        self.request(&format!("{}{}/", endpoints::STOCKS, id), RequestOptions::get())
            .await?
            .decode()
    }

    pub async fn create_stock(&self, stock: Value) -> ApiResult<Lot> {
        self.request(endpoints::STOCKS, RequestOptions::post(stock))
            .await?
            .decode()
    }

    pub async fn update_stock(&self, id: i64, stock: Value) -> ApiResult<Lot> {
        self.request(
            &format!("{}{}/", endpoints::STOCKS, id),
            RequestOptions::put(stock),
        )
        .await?
        .decode()
    }

    pub async fn delete_stock(&self, id: i64) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}{}/", endpoints::STOCKS, id),
                RequestOptions::delete(),
            )
            .await?
            .into_value())
    }

    pub async fn get_stock_stats(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::STOCK_STATS, RequestOptions::get())
            .await?
            .into_value())
    }

    pub async fn get_stock_movements(&self, params: &[(&str, String)]) -> ApiResult<Value> {
        Ok(self
            .request(
                &with_query(endpoints::STOCK_MOVEMENTS, params),
                RequestOptions::get(),
            )
            .await?
            .into_value())
    }

    pub async fn get_stock_alerts(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::STOCK_ALERTS, RequestOptions::get())
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Products, deliveries
    // ------------------------------------------------------------------

    pub async fn get_products(&self, params: &[(&str, String)]) -> ApiResult<Vec<Product>> {
        self.request(
            &with_query(endpoints::PRODUCTS, params),
            RequestOptions::get(),
        )
        .await?
        .decode()
    }

    pub async fn get_product_categories(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::PRODUCT_CATEGORIES, RequestOptions::get())
            .await?
            .into_value())
    }

    pub async fn get_deliveries(&self, params: &[(&str, String)]) -> ApiResult<Value> {
        Ok(self
            .request(
                &with_query(endpoints::DELIVERIES, params),
                RequestOptions::get(),
            )
            .await?
            .into_value())
    }

    pub async fn get_delivery_tracking(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::DELIVERY_TRACKING, RequestOptions::get())
            .await?
            .into_value())
    }

    pub async fn get_users(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::USERS, RequestOptions::get())
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Forecasts
    // ------------------------------------------------------------------

    pub async fn get_forecast_summaries(&self) -> ApiResult<Value> {
        self.forecast("tous_resumés/").await
    }

    pub async fn get_expiry_risks(&self) -> ApiResult<Value> {
        self.forecast("risques_peremption/").await
    }

    pub async fn get_ml_predictions(&self) -> ApiResult<Value> {
        self.forecast("predictions_ml/").await
    }

    pub async fn get_critical_forecast_alerts(&self) -> ApiResult<Value> {
        self.forecast("alertes_critiques/").await
    }

    async fn forecast(&self, suffix: &str) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}{}", endpoints::FORECASTS, suffix),
                RequestOptions::get(),
            )
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Procurement
    // ------------------------------------------------------------------

    pub async fn get_procurements(&self) -> ApiResult<Vec<ProcurementOrder>> {
        self.request(endpoints::PROCUREMENTS, RequestOptions::get())
            .await?
            .decode()
    }

    pub async fn create_procurement(&self, order: Value) -> ApiResult<ProcurementOrder> {
        self.request(endpoints::PROCUREMENTS, RequestOptions::post(order))
            .await?
            .decode()
    }

    pub async fn get_procurement_stats(&self) -> ApiResult<OrderStats> {
        self.request(endpoints::PROCUREMENT_STATS, RequestOptions::get())
            .await?
            .decode()
    }

    pub async fn mark_procurement_in_transit(&self, id: i64) -> ApiResult<Value> {
        self.procurement_action(id, "mark_in_transit", json!({})).await
    }

    /// Mark an order delivered. `receipts` entries carry `id_ligne` and
    /// `quantite_recue`; lines without an entry receive in full.
    pub async fn mark_procurement_delivered(&self, id: i64, receipts: Value) -> ApiResult<Value> {
        self.procurement_action(id, "mark_delivered", json!({ "lignes_receptions": receipts }))
            .await
    }

    pub async fn cancel_procurement(&self, id: i64, reason: Option<String>) -> ApiResult<Value> {
        self.procurement_action(id, "cancel", json!({ "raison": reason }))
            .await
    }

    async fn procurement_action(&self, id: i64, action: &str, body: Value) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}{}/{}/", endpoints::PROCUREMENTS, id, action),
                RequestOptions::post(body),
            )
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Sales
    // ------------------------------------------------------------------

    pub async fn get_sales(&self, params: &[(&str, String)]) -> ApiResult<Vec<Sale>> {
        self.request(&with_query(endpoints::SALES, params), RequestOptions::get())
            .await?
            .decode()
    }

    pub async fn get_sales_stats(&self) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::SALES_STATS, RequestOptions::get())
            .await?
            .into_value())
    }

    pub async fn create_sale_with_lines(&self, sale: Value) -> ApiResult<Sale> {
        self.request(
            endpoints::SALES_CREATE_WITH_LINES,
            RequestOptions::post(sale),
        )
        .await?
        .decode()
    }

    pub async fn validate_sale(&self, id: i64) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}{}/valider/", endpoints::SALES, id),
                RequestOptions::post(json!({})),
            )
            .await?
            .into_value())
    }

    pub async fn cancel_sale(&self, id: i64) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}{}/annuler/", endpoints::SALES, id),
                RequestOptions::post(json!({})),
            )
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub async fn get_notifications(&self, user_id: Option<i64>) -> ApiResult<Value> {
        let endpoint = match user_id {
            Some(id) => with_query(endpoints::NOTIFICATIONS, &[("utilisateur", id.to_string())]),
            None => endpoints::NOTIFICATIONS.to_string(),
        };
        Ok(self
            .request(&endpoint, RequestOptions::get())
            .await?
            .into_value())
    }

    pub async fn create_notification(&self, notification: Value) -> ApiResult<Value> {
        Ok(self
            .request(endpoints::NOTIFICATIONS, RequestOptions::post(notification))
            .await?
            .into_value())
    }

    /// Generate one notification per danger-level forecast alert.
    pub async fn generate_alert_notifications(&self) -> ApiResult<Value> {
        Ok(self
            .request(
                &format!("{}generer_alertes/", endpoints::NOTIFICATIONS),
                RequestOptions::post(json!({})),
            )
            .await?
            .into_value())
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Multipart file upload. Uploads go through [`ApiClient::request`]
    /// like every other call, so they get the same demo diversion and the
    /// single refresh-and-retry on 401.
    pub async fn upload_file(
        &self,
        endpoint: &str,
        field_name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<ResponseBody> {
        self.request(endpoint, RequestOptions::upload(field_name, file_name, bytes))
            .await
    }
}
