//! Inventory view: catalog items with ledger-derived stock and reorder advice

use std::sync::Arc;

use shared::{inventory_rows, InventoryRow, StockLevels};

use crate::error::AppResult;
use crate::store::Store;

/// Inventory service
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Current quantity of every item, folded from the full ledger
    pub async fn stock_levels(&self) -> AppResult<StockLevels> {
        let entries = self.store.ledger_entries().await?;
        Ok(StockLevels::from_entries(entries))
    }

    /// All items in display order with current quantity and suggestion
    pub async fn inventory(&self) -> AppResult<Vec<InventoryRow>> {
        let items = self.store.list_items().await?;
        let levels = self.stock_levels().await?;

        tracing::debug!(
            items = items.len(),
            stocked_items = levels.len(),
            "Computed inventory"
        );
        Ok(inventory_rows(items, &levels))
    }
}
