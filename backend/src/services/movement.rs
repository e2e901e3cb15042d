//! Movement recording service
//!
//! The ledger only grows: a movement is appended once and never revised.
//! Corrections are new `adj` movements.

use std::sync::Arc;

use chrono::Utc;
use shared::{MovementDraft, NewMovement, StockMovement};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::store::Store;

/// Movement service
#[derive(Clone)]
pub struct MovementService {
    store: Arc<dyn Store>,
}

impl MovementService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Append one movement on behalf of the actor
    pub async fn record(&self, actor: &AuthUser, draft: MovementDraft) -> AppResult<StockMovement> {
        if self.store.get_item(draft.item_id).await?.is_none() {
            return Err(AppError::Validation {
                field: "item_id".to_string(),
                message: "Selected item does not exist".to_string(),
                message_ja: "選択された品目が存在しません。".to_string(),
            });
        }

        let movement = self
            .store
            .append_movement(NewMovement {
                item_id: draft.item_id,
                kind: draft.kind,
                qty: draft.qty,
                note: draft.note,
                user_id: actor.user_id,
                recorded_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            movement_id = %movement.id,
            item_id = %movement.item_id,
            kind = %movement.kind,
            qty = movement.qty,
            by = %actor.username,
            "Movement recorded"
        );
        Ok(movement)
    }

    /// Movements of one item, newest first
    pub async fn history(&self, item_id: Uuid) -> AppResult<Vec<StockMovement>> {
        if self.store.get_item(item_id).await?.is_none() {
            return Err(AppError::NotFound("Item".to_string()));
        }
        self.store.movements_for_item(item_id).await
    }
}
