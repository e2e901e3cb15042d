//! User administration handlers

use axum::{extract::State, http::StatusCode, Json};
use shared::{NewUserForm, PasswordChangeForm, User};

use crate::error::AppResult;
use crate::extract::Form;
use crate::middleware::CurrentUser;
use crate::services::AuthService;
use crate::AppState;

/// Create a user account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(form): Form<NewUserForm>,
) -> AppResult<(StatusCode, Json<User>)> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    // Non-admins get 403 even for an invalid form.
    current_user.0.require_admin()?;
    let draft = form.into_draft()?;
    let user = auth_service.create_user(&current_user.0, draft).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Change the current user's password
pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Form(form): Form<PasswordChangeForm>,
) -> AppResult<StatusCode> {
    let draft = form.into_draft()?;
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    auth_service.change_password(&current_user.0, draft).await?;
    Ok(StatusCode::NO_CONTENT)
}
