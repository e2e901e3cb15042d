//! Route definitions for the Stockroom inventory service

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// Takes the state up front because the token check needs the JWT secret.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - inventory view and movements
        .merge(stock_routes(state.clone()))
        // Protected routes - catalog
        .nest("/items", item_routes(state.clone()))
        .nest("/suppliers", supplier_routes(state.clone()))
        // Protected routes - user administration
        .nest("/users", user_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}

/// Inventory and movement routes (protected)
fn stock_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/inventory", get(handlers::list_inventory))
        .route("/movements", post(handlers::record_movement))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Item management routes (protected)
fn item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            get(handlers::get_item).put(handlers::update_item),
        )
        .route("/:item_id/movements", get(handlers::get_item_movements))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier management routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// User administration routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_user))
        .route("/me/password", put(handlers::change_password))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
