//! Gestion Stock Halieutique - API client
//!
//! HTTP client for the remote inventory-management backend (stock,
//! procurement, sales, forecasts), with a local "demo mode" that
//! intercepts the same endpoint surface and simulates responses against a
//! JSON document held in a pluggable key-value store.
//!
//! Execution model: every remote call is one `async` operation with a
//! per-request timeout; simulated calls are synchronous read-modify-write
//! cycles over the stored document. See `demo::state` for the (accepted)
//! absence of locking around that cycle.

pub mod api;
pub mod auth;
pub mod config;
pub mod demo;
pub mod endpoints;
pub mod error;
pub mod storage;

pub use api::{ApiClient, FilePart, RequestOptions, ResponseBody};
pub use reqwest::Method;
pub use auth::{Credentials, TokenPair};
pub use config::Config;
pub use demo::{disable_demo_mode, enable_demo_mode, simulate, DemoData};
pub use error::{ApiError, ApiResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
