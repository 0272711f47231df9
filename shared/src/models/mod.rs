//! Wire models for the inventory backend

pub mod forecast;
pub mod lot;
pub mod notification;
pub mod procurement;
pub mod product;
pub mod sale;

pub use forecast::*;
pub use lot::*;
pub use notification::*;
pub use procurement::*;
pub use product::*;
pub use sale::*;

use chrono::{DateTime, Utc};

/// serde default for timestamp fields the backend fills at creation time
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}
