//! Catalog service for items and suppliers

use std::sync::Arc;

use shared::{Item, ItemDraft, ItemWithSupplier, Supplier, SupplierDraft};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::store::Store;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    /// List suppliers ordered by name
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.store.list_suppliers().await
    }

    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        self.store
            .get_supplier(supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    pub async fn create_supplier(&self, actor: &AuthUser, draft: SupplierDraft) -> AppResult<Supplier> {
        let supplier = self.store.create_supplier(draft).await?;
        tracing::info!(
            supplier_id = %supplier.id,
            name = %supplier.name,
            by = %actor.username,
            "Supplier created"
        );
        Ok(supplier)
    }

    /// Replace every field of an existing supplier
    pub async fn update_supplier(
        &self,
        actor: &AuthUser,
        supplier_id: Uuid,
        draft: SupplierDraft,
    ) -> AppResult<Supplier> {
        let supplier = self
            .store
            .update_supplier(supplier_id, draft)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        tracing::info!(supplier_id = %supplier.id, by = %actor.username, "Supplier updated");
        Ok(supplier)
    }

    /// Delete a supplier; items it supplied keep existing without a supplier
    pub async fn delete_supplier(&self, actor: &AuthUser, supplier_id: Uuid) -> AppResult<u64> {
        actor.require_admin()?;

        let detached = self
            .store
            .delete_supplier(supplier_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        tracing::info!(
            supplier_id = %supplier_id,
            detached_items = detached,
            by = %actor.username,
            "Supplier deleted"
        );
        Ok(detached)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// List items ordered by location then name, with supplier names
    pub async fn list_items(&self) -> AppResult<Vec<ItemWithSupplier>> {
        self.store.list_items_with_suppliers().await
    }

    pub async fn get_item(&self, item_id: Uuid) -> AppResult<Item> {
        self.store
            .get_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    pub async fn create_item(&self, actor: &AuthUser, draft: ItemDraft) -> AppResult<Item> {
        self.ensure_supplier_exists(draft.supplier_id).await?;

        let item = self.store.create_item(draft).await?;
        tracing::info!(
            item_id = %item.id,
            name = %item.name,
            by = %actor.username,
            "Item created"
        );
        Ok(item)
    }

    /// Replace every field of an existing item
    ///
    /// A missing item is reported before an unresolved supplier reference.
    pub async fn update_item(&self, actor: &AuthUser, item_id: Uuid, draft: ItemDraft) -> AppResult<Item> {
        self.get_item(item_id).await?;
        self.ensure_supplier_exists(draft.supplier_id).await?;

        let item = self
            .store
            .update_item(item_id, draft)
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        tracing::info!(item_id = %item.id, by = %actor.username, "Item updated");
        Ok(item)
    }

    async fn ensure_supplier_exists(&self, supplier_id: Option<Uuid>) -> AppResult<()> {
        let Some(supplier_id) = supplier_id else {
            return Ok(());
        };

        if self.store.get_supplier(supplier_id).await?.is_none() {
            return Err(AppError::Validation {
                field: "supplier_id".to_string(),
                message: "Selected supplier does not exist".to_string(),
                message_ja: "選択された仕入先が存在しません。".to_string(),
            });
        }
        Ok(())
    }
}
