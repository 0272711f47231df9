//! Shared types and wire models for the Gestion Stock Halieutique client
//!
//! This crate contains the models exchanged with the remote inventory
//! backend. Serialized field names follow the backend's French wire
//! contract (`id_lot`, `statut_vente`, ...); Rust identifiers are English.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
