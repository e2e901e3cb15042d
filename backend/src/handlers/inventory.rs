//! HTTP handlers for the inventory view

use axum::{extract::State, Json};
use shared::InventoryRow;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::InventoryService;
use crate::AppState;

/// List items with current quantity and suggested reorder
pub async fn list_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryRow>>> {
    let service = InventoryService::new(state.store);
    let rows = service.inventory().await?;
    Ok(Json(rows))
}
