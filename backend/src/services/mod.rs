//! Business logic services for the Stockroom inventory service

pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod inventory;
pub mod movement;

pub use auth::AuthService;
pub use bootstrap::ensure_bootstrap_user;
pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use movement::MovementService;
