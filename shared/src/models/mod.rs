//! Domain models for the Stockroom inventory service

mod item;
mod movement;
mod supplier;
mod user;

pub use item::*;
pub use movement::*;
pub use supplier::*;
pub use user::*;
