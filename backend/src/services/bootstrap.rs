//! First-run administrator account

use shared::{Role, User};

use crate::config::BootstrapConfig;
use crate::error::AppResult;
use crate::services::AuthService;
use crate::store::{NewUser, Store};

/// Create the configured admin account when no user exists yet
///
/// Safe to run on every startup and from several instances at once: the store
/// inserts only while the user set is empty. Returns the account when this
/// call created it.
pub async fn ensure_bootstrap_user(
    store: &dyn Store,
    auth: &AuthService,
    bootstrap: &BootstrapConfig,
) -> AppResult<Option<User>> {
    if store.count_users().await? > 0 {
        tracing::debug!("Users present, skipping bootstrap");
        return Ok(None);
    }

    let password_hash = auth.hash_password(&bootstrap.admin_password)?;
    let created = store
        .create_first_user(NewUser {
            username: bootstrap.admin_username.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await?;

    if let Some(user) = &created {
        tracing::warn!(
            username = %user.username,
            "Created bootstrap admin with the default password; change it after first login"
        );
    }

    Ok(created)
}
