//! Persistence ports for users, the catalog and the stock ledger
//!
//! Services receive an `Arc<dyn Store>` rather than a connection pool so the
//! same logic runs against PostgreSQL in production and the in-memory adapter
//! in tests.

use async_trait::async_trait;
use shared::{
    Item, ItemDraft, ItemWithSupplier, LedgerEntry, NewMovement, Role, StockMovement, Supplier,
    SupplierDraft, User,
};
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A user together with the stored credential hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// An account ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up credentials by exact username
    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>>;

    /// Look up credentials by identifier
    async fn find_credentials_by_id(&self, id: Uuid) -> AppResult<Option<UserCredentials>>;

    async fn count_users(&self) -> AppResult<i64>;

    /// Insert an account; a taken username is a `Conflict`
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Insert an account only while no account exists at all
    ///
    /// Returns `None` when another account was already present, including one
    /// created concurrently.
    async fn create_first_user(&self, new_user: NewUser) -> AppResult<Option<User>>;

    /// Replace a stored credential hash; an unknown id is `NotFound`
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All suppliers ordered by name
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>>;

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>>;

    async fn create_supplier(&self, draft: SupplierDraft) -> AppResult<Supplier>;

    /// Full-field replace; `None` when the supplier does not exist
    async fn update_supplier(&self, id: Uuid, draft: SupplierDraft) -> AppResult<Option<Supplier>>;

    /// Delete a supplier, detaching every item that referenced it
    ///
    /// Returns the number of detached items, or `None` when the supplier does
    /// not exist.
    async fn delete_supplier(&self, id: Uuid) -> AppResult<Option<u64>>;

    /// All items ordered by location, then name
    async fn list_items(&self) -> AppResult<Vec<Item>>;

    /// All items ordered by location, then name, with supplier names
    async fn list_items_with_suppliers(&self) -> AppResult<Vec<ItemWithSupplier>>;

    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>>;

    async fn create_item(&self, draft: ItemDraft) -> AppResult<Item>;

    /// Full-field replace; `None` when the item does not exist
    async fn update_item(&self, id: Uuid, draft: ItemDraft) -> AppResult<Option<Item>>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append one movement; nothing already in the ledger is touched
    async fn append_movement(&self, movement: NewMovement) -> AppResult<StockMovement>;

    /// Movements of one item, newest first
    async fn movements_for_item(&self, item_id: Uuid) -> AppResult<Vec<StockMovement>>;

    async fn count_movements(&self) -> AppResult<i64>;

    /// The whole ledger as entries for aggregation
    ///
    /// Adapters may pre-sum quantities per (item, kind); the sign of each
    /// kind is applied by the aggregator, not here.
    async fn ledger_entries(&self) -> AppResult<Vec<LedgerEntry>>;
}

/// Everything the services need from persistence
#[async_trait]
pub trait Store: UserStore + CatalogStore + LedgerStore {
    /// Whether the backing datastore is reachable
    async fn ping(&self) -> bool;
}
