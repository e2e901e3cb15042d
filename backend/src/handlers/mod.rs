//! HTTP request handlers

pub mod auth;
pub mod health;
pub mod inventory;
pub mod items;
pub mod movements;
pub mod suppliers;
pub mod users;

pub use auth::*;
pub use health::*;
pub use inventory::*;
pub use items::*;
pub use movements::*;
pub use suppliers::*;
pub use users::*;
