//! HTTP handlers for stock movements

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use shared::{MovementForm, StockMovement};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{Form, Path};
use crate::middleware::CurrentUser;
use crate::services::MovementService;
use crate::AppState;

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(form): Form<MovementForm>,
) -> AppResult<(StatusCode, Json<StockMovement>)> {
    let draft = form.into_draft()?;
    let service = MovementService::new(state.store);
    let movement = service.record(&current_user.0, draft).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Movement history of one item, newest first
pub async fn get_item_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = MovementService::new(state.store);
    let movements = service.history(item_id).await?;
    Ok(Json(movements))
}
