//! Inventory tests
//!
//! Tests for ledger-derived stock levels including:
//! - Current quantity is the signed sum of movements, independent of order
//! - Suggested reorder is never negative and tracks par minus current
//! - The inventory view over the in-memory store

mod common;

use proptest::prelude::*;
use shared::{suggested_reorder, LedgerEntry, MovementForm, MovementKind, StockLevels};
use stockroom_backend::services::{InventoryService, MovementService};
use uuid::Uuid;

// ============================================================================
// Property Test Strategies
// ============================================================================

fn kind_strategy() -> impl Strategy<Value = MovementKind> {
    prop_oneof![
        Just(MovementKind::In),
        Just(MovementKind::Out),
        Just(MovementKind::Waste),
        Just(MovementKind::Adj),
    ]
}

/// Whole-number quantities keep float sums exact under reordering
fn entry_strategy() -> impl Strategy<Value = LedgerEntry> {
    (0u128..3, kind_strategy(), 0i32..1000, any::<bool>()).prop_map(
        |(item, kind, qty, negative)| {
            let qty = if kind == MovementKind::Adj && negative {
                -f64::from(qty)
            } else {
                f64::from(qty)
            };
            LedgerEntry {
                item_id: Uuid::from_u128(item),
                kind,
                qty,
            }
        },
    )
}

fn ledger_strategy() -> impl Strategy<Value = (Vec<LedgerEntry>, Vec<LedgerEntry>)> {
    prop::collection::vec(entry_strategy(), 0..60)
        .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
}

fn sum_of(entries: &[LedgerEntry], item_id: Uuid, kind: MovementKind) -> f64 {
    entries
        .iter()
        .filter(|e| e.item_id == item_id && e.kind == kind)
        .map(|e| e.qty)
        .sum()
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// current = Σin − Σout − Σwaste + Σadj for every item
    #[test]
    fn test_current_matches_signed_sums((entries, _) in ledger_strategy()) {
        let levels = StockLevels::from_entries(entries.iter().copied());

        for item in 0u128..3 {
            let id = Uuid::from_u128(item);
            let expected = sum_of(&entries, id, MovementKind::In)
                - sum_of(&entries, id, MovementKind::Out)
                - sum_of(&entries, id, MovementKind::Waste)
                + sum_of(&entries, id, MovementKind::Adj);
            prop_assert_eq!(levels.current(id), expected);
        }
    }

    /// The order movements were recorded in does not matter
    #[test]
    fn test_levels_are_order_independent((entries, shuffled) in ledger_strategy()) {
        let original = StockLevels::from_entries(entries);
        let reordered = StockLevels::from_entries(shuffled);
        prop_assert_eq!(original, reordered);
    }

    /// Suggested reorder is never negative and equals the truncated gap
    #[test]
    fn test_suggestion_formula(par in 0i32..10_000, current in -10_000.0f64..20_000.0) {
        let suggested = suggested_reorder(par, current);
        let gap = f64::from(par) - current;

        if gap <= 0.0 {
            prop_assert_eq!(suggested, 0);
        } else {
            prop_assert_eq!(suggested, gap.floor() as u64);
            prop_assert!(suggested as f64 <= gap);
        }
    }
}

// ============================================================================
// Inventory View
// ============================================================================

#[cfg(test)]
mod inventory_view_tests {
    use super::*;

    async fn record(
        ctx: &common::TestContext,
        actor: &stockroom_backend::middleware::AuthUser,
        item_id: Uuid,
        kind: &str,
        qty: &str,
    ) {
        let draft = MovementForm {
            item_id: Some(item_id.to_string()),
            kind: Some(kind.to_string()),
            qty: Some(qty.to_string()),
            note: None,
        }
        .into_draft()
        .expect("valid movement form");
        MovementService::new(ctx.store.clone())
            .record(actor, draft)
            .await
            .expect("movement recorded");
    }

    #[tokio::test]
    async fn test_item_without_movements_suggests_par() {
        let ctx = common::setup().await;
        let admin = ctx.admin().await;
        let draft = common::item_form("Oat milk", "冷蔵", "12").into_draft().unwrap();
        let item = ctx.catalog().create_item(&admin, draft).await.unwrap();

        let rows = InventoryService::new(ctx.store.clone()).inventory().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.id, item.id);
        assert_eq!(rows[0].current_quantity, 0.0);
        assert_eq!(rows[0].suggested_reorder, 12);
    }

    #[tokio::test]
    async fn test_restocked_item_needs_nothing() {
        let ctx = common::setup().await;
        let admin = ctx.admin().await;
        let draft = common::item_form("Beans", "常温", "10").into_draft().unwrap();
        let item = ctx.catalog().create_item(&admin, draft).await.unwrap();

        record(&ctx, &admin, item.id, "in", "15").await;
        record(&ctx, &admin, item.id, "out", "3").await;
        record(&ctx, &admin, item.id, "waste", "2").await;

        let rows = InventoryService::new(ctx.store.clone()).inventory().await.unwrap();
        assert_eq!(rows[0].current_quantity, 10.0);
        assert_eq!(rows[0].suggested_reorder, 0);
    }

    #[tokio::test]
    async fn test_partial_stock_suggests_difference() {
        let ctx = common::setup().await;
        let admin = ctx.admin().await;
        let draft = common::item_form("Cups", "常温", "10").into_draft().unwrap();
        let item = ctx.catalog().create_item(&admin, draft).await.unwrap();

        record(&ctx, &admin, item.id, "in", "5").await;

        let rows = InventoryService::new(ctx.store.clone()).inventory().await.unwrap();
        assert_eq!(rows[0].current_quantity, 5.0);
        assert_eq!(rows[0].suggested_reorder, 5);
    }

    #[tokio::test]
    async fn test_negative_adjustment_with_zero_par() {
        let ctx = common::setup().await;
        let admin = ctx.admin().await;
        let draft = common::item_form("Lids", "常温", "0").into_draft().unwrap();
        let item = ctx.catalog().create_item(&admin, draft).await.unwrap();

        record(&ctx, &admin, item.id, "adj", "-4").await;

        let rows = InventoryService::new(ctx.store.clone()).inventory().await.unwrap();
        assert_eq!(rows[0].current_quantity, -4.0);
        assert_eq!(rows[0].suggested_reorder, 4);
    }

    #[tokio::test]
    async fn test_inventory_follows_location_then_name() {
        let ctx = common::setup().await;
        let admin = ctx.admin().await;
        for (name, location) in [("Milk", "B-fridge"), ("Sugar", "A-shelf"), ("Cocoa", "A-shelf")] {
            let draft = common::item_form(name, location, "1").into_draft().unwrap();
            ctx.catalog().create_item(&admin, draft).await.unwrap();
        }

        let rows = InventoryService::new(ctx.store.clone()).inventory().await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.item.name.as_str()).collect();
        assert_eq!(names, ["Cocoa", "Sugar", "Milk"]);
    }
}
