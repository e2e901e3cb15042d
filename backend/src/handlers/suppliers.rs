//! HTTP handlers for suppliers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::{Supplier, SupplierForm};
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{Form, Path};
use crate::middleware::CurrentUser;
use crate::services::CatalogService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteSupplierResponse {
    pub id: Uuid,
    pub detached_items: u64,
}

/// List suppliers ordered by name
pub async fn list_suppliers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Supplier>>> {
    let service = CatalogService::new(state.store);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = CatalogService::new(state.store);
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(form): Form<SupplierForm>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let draft = form.into_draft()?;
    let service = CatalogService::new(state.store);
    let supplier = service.create_supplier(&current_user.0, draft).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Replace every field of a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Form(form): Form<SupplierForm>,
) -> AppResult<Json<Supplier>> {
    let draft = form.into_draft()?;
    let service = CatalogService::new(state.store);
    let supplier = service
        .update_supplier(&current_user.0, supplier_id, draft)
        .await?;
    Ok(Json(supplier))
}

/// Delete a supplier (admin only)
pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<DeleteSupplierResponse>> {
    let service = CatalogService::new(state.store);
    let detached_items = service
        .delete_supplier(&current_user.0, supplier_id)
        .await?;
    Ok(Json(DeleteSupplierResponse {
        id: supplier_id,
        detached_items,
    }))
}
