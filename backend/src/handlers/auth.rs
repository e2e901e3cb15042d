//! Authentication handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::Form;
use crate::services::auth::{AuthService, LoginOutcome};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> Result<Json<LoginOutcome>, AppError> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let outcome = auth_service
        .login(
            body.username.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(outcome))
}
