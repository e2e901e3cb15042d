//! In-memory adapter for the persistence ports
//!
//! Backs the integration tests and local experiments without PostgreSQL. All
//! state sits behind one lock so every operation is atomic, mirroring the
//! single-statement guarantees of the database adapter.

use async_trait::async_trait;
use shared::{
    Item, ItemDraft, ItemWithSupplier, LedgerEntry, NewMovement, StockMovement, Supplier,
    SupplierDraft, User,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, LedgerStore, NewUser, Store, UserCredentials, UserStore};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct State {
    users: Vec<UserCredentials>,
    suppliers: Vec<Supplier>,
    items: Vec<Item>,
    movements: Vec<StockMovement>,
}

impl State {
    fn sorted_items(&self) -> Vec<Item> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| {
            (&a.location, &a.name, a.id).cmp(&(&b.location, &b.name, b.id))
        });
        items
    }

    fn supplier_exists(&self, id: Option<Uuid>) -> bool {
        id.map_or(true, |id| self.suppliers.iter().any(|s| s.id == id))
    }
}

fn unknown_reference(field: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: format!("{} does not refer to an existing record", field),
        message_ja: format!("参照先が存在しません（{}）", field),
    }
}

/// Store holding everything in process memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn find_credentials_by_id(&self, id: Uuid) -> AppResult<Option<UserCredentials>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|c| c.user.id == id).cloned())
    }

    async fn count_users(&self) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state.users.len() as i64)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|c| c.user.username == new_user.username) {
            return Err(AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists".to_string(),
                message_ja: "このユーザー名は既に使われています。".to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            role: new_user.role,
        };
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn create_first_user(&self, new_user: NewUser) -> AppResult<Option<User>> {
        let mut state = self.state.write().await;
        if !state.users.is_empty() {
            return Ok(None);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            role: new_user.role,
        };
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(Some(user))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let credentials = state
            .users
            .iter_mut()
            .find(|c| c.user.id == id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;
        credentials.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let state = self.state.read().await;
        let mut suppliers = state.suppliers.clone();
        suppliers.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(suppliers)
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let state = self.state.read().await;
        Ok(state.suppliers.iter().find(|s| s.id == id).cloned())
    }

    async fn create_supplier(&self, draft: SupplierDraft) -> AppResult<Supplier> {
        let mut state = self.state.write().await;
        let supplier = Supplier::from_draft(Uuid::new_v4(), draft);
        state.suppliers.push(supplier.clone());
        Ok(supplier)
    }

    async fn update_supplier(&self, id: Uuid, draft: SupplierDraft) -> AppResult<Option<Supplier>> {
        let mut state = self.state.write().await;
        Ok(state.suppliers.iter_mut().find(|s| s.id == id).map(|slot| {
            *slot = Supplier::from_draft(id, draft);
            slot.clone()
        }))
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<Option<u64>> {
        let mut state = self.state.write().await;
        let before = state.suppliers.len();
        state.suppliers.retain(|s| s.id != id);
        if state.suppliers.len() == before {
            return Ok(None);
        }

        let mut detached = 0;
        for item in state.items.iter_mut().filter(|i| i.supplier_id == Some(id)) {
            item.supplier_id = None;
            detached += 1;
        }
        Ok(Some(detached))
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let state = self.state.read().await;
        Ok(state.sorted_items())
    }

    async fn list_items_with_suppliers(&self) -> AppResult<Vec<ItemWithSupplier>> {
        let state = self.state.read().await;
        Ok(state
            .sorted_items()
            .into_iter()
            .map(|item| {
                let supplier_name = item.supplier_id.and_then(|sid| {
                    state
                        .suppliers
                        .iter()
                        .find(|s| s.id == sid)
                        .map(|s| s.name.clone())
                });
                ItemWithSupplier {
                    item,
                    supplier_name,
                }
            })
            .collect())
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    async fn create_item(&self, draft: ItemDraft) -> AppResult<Item> {
        let mut state = self.state.write().await;
        if !state.supplier_exists(draft.supplier_id) {
            return Err(unknown_reference("supplier_id"));
        }

        let item = Item::from_draft(Uuid::new_v4(), draft);
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: Uuid, draft: ItemDraft) -> AppResult<Option<Item>> {
        let mut state = self.state.write().await;
        if !state.items.iter().any(|i| i.id == id) {
            return Ok(None);
        }
        if !state.supplier_exists(draft.supplier_id) {
            return Err(unknown_reference("supplier_id"));
        }

        Ok(state.items.iter_mut().find(|i| i.id == id).map(|slot| {
            *slot = Item::from_draft(id, draft);
            slot.clone()
        }))
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn append_movement(&self, movement: NewMovement) -> AppResult<StockMovement> {
        let mut state = self.state.write().await;
        if !state.items.iter().any(|i| i.id == movement.item_id) {
            return Err(unknown_reference("item_id"));
        }
        if !state.users.iter().any(|c| c.user.id == movement.user_id) {
            return Err(unknown_reference("user_id"));
        }

        let recorded = StockMovement {
            id: Uuid::new_v4(),
            item_id: movement.item_id,
            kind: movement.kind,
            qty: movement.qty,
            note: movement.note,
            user_id: Some(movement.user_id),
            recorded_at: movement.recorded_at,
        };
        state.movements.push(recorded.clone());
        Ok(recorded)
    }

    async fn movements_for_item(&self, item_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let state = self.state.read().await;
        // Appended in time order; reversing yields newest first.
        Ok(state
            .movements
            .iter()
            .rev()
            .filter(|m| m.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn count_movements(&self) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state.movements.len() as i64)
    }

    async fn ledger_entries(&self) -> AppResult<Vec<LedgerEntry>> {
        let state = self.state.read().await;
        Ok(state.movements.iter().map(LedgerEntry::from).collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}
