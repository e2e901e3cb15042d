//! Ledger-derived stock levels and reorder advice
//!
//! Current stock is never stored. [`StockLevels::from_entries`] folds the whole
//! ledger on every read, and [`suggested_reorder`] turns the result into an
//! advisory quantity against the item's par level.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Item, MovementKind, StockMovement};

/// One ledger quantity attributed to an item and movement kind
///
/// Entries may be single movements or per-kind subtotals; the fold is linear
/// in `qty`, so both produce the same levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub item_id: Uuid,
    pub kind: MovementKind,
    pub qty: f64,
}

impl From<&StockMovement> for LedgerEntry {
    fn from(movement: &StockMovement) -> Self {
        Self {
            item_id: movement.item_id,
            kind: movement.kind,
            qty: movement.qty,
        }
    }
}

/// Current on-hand quantity per item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockLevels {
    levels: HashMap<Uuid, f64>,
}

impl StockLevels {
    /// Fold ledger entries into per-item quantities
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LedgerEntry>,
    {
        let mut levels: HashMap<Uuid, f64> = HashMap::new();
        for entry in entries {
            *levels.entry(entry.item_id).or_insert(0.0) += entry.kind.contribution(entry.qty);
        }
        Self { levels }
    }

    /// Quantity on hand; items without movements have 0.0
    pub fn current(&self, item_id: Uuid) -> f64 {
        self.levels.get(&item_id).copied().unwrap_or(0.0)
    }

    /// Number of items with at least one movement
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Quantity to order to bring an item back to par
///
/// `max(0, par - current)` truncated to a whole number. Never negative.
pub fn suggested_reorder(par: i32, current: f64) -> u64 {
    let gap = f64::from(par) - current;
    if gap > 0.0 {
        // Float-to-int casts saturate, so an enormous deficit cannot wrap.
        gap.trunc() as u64
    } else {
        0
    }
}

/// An item with its derived stock figures
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryRow {
    #[serde(flatten)]
    pub item: Item,
    pub current_quantity: f64,
    pub suggested_reorder: u64,
}

impl InventoryRow {
    pub fn new(item: Item, levels: &StockLevels) -> Self {
        let current_quantity = levels.current(item.id);
        let suggested_reorder = suggested_reorder(item.par, current_quantity);
        Self {
            item,
            current_quantity,
            suggested_reorder,
        }
    }
}

/// Combine catalog items (already in display order) with stock levels
pub fn inventory_rows(items: Vec<Item>, levels: &StockLevels) -> Vec<InventoryRow> {
    items
        .into_iter()
        .map(|item| InventoryRow::new(item, levels))
        .collect()
}
