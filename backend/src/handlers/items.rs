//! HTTP handlers for catalog items

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use shared::{Item, ItemForm, ItemWithSupplier};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{Form, Path};
use crate::middleware::CurrentUser;
use crate::services::CatalogService;
use crate::AppState;

/// List items ordered by location then name
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ItemWithSupplier>>> {
    let service = CatalogService::new(state.store);
    let items = service.list_items().await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    let service = CatalogService::new(state.store);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create a catalog item
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(form): Form<ItemForm>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let draft = form.into_draft()?;
    let service = CatalogService::new(state.store);
    let item = service.create_item(&current_user.0, draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Replace every field of an item
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Form(form): Form<ItemForm>,
) -> AppResult<Json<Item>> {
    let draft = form.into_draft()?;
    let service = CatalogService::new(state.store);
    let item = service.update_item(&current_user.0, item_id, draft).await?;
    Ok(Json(item))
}
