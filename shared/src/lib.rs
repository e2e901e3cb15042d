//! Shared types and models for the Stockroom inventory service
//!
//! This crate holds the domain model, the ledger-derived stock computation and
//! the form validation stage. It performs no I/O so that the backend and its
//! tests can exercise the rules directly.

pub mod models;
pub mod stock;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use validation::*;
