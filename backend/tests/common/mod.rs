//! Shared fixtures for the backend integration tests
//!
//! Everything runs against the in-memory store, so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use shared::{ItemForm, NewUserForm, Role, SupplierForm};
use stockroom_backend::{
    config::{AuthConfig, BootstrapConfig, DatabaseConfig, JwtConfig, ServerConfig},
    middleware::AuthUser,
    services::{ensure_bootstrap_user, AuthService, CatalogService},
    store::{MemoryStore, Store},
    AppState, Config,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Configuration with a cheap bcrypt cost
pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        },
        auth: AuthConfig { bcrypt_cost: 4 },
        bootstrap: BootstrapConfig {
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        },
    }
}

pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub auth: AuthService,
}

impl TestContext {
    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone(), self.config.clone())
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.store.clone())
    }

    /// The bootstrap admin as an actor
    pub async fn admin(&self) -> AuthUser {
        self.actor(ADMIN_USERNAME).await
    }

    /// A freshly created staff account as an actor
    pub async fn staff(&self, username: &str) -> AuthUser {
        let admin = self.admin().await;
        let draft = NewUserForm {
            username: Some(username.to_string()),
            password: Some("staff-password".to_string()),
            role: Some("staff".to_string()),
        }
        .into_draft()
        .expect("valid user form");
        self.auth
            .create_user(&admin, draft)
            .await
            .expect("staff user created");
        self.actor(username).await
    }

    async fn actor(&self, username: &str) -> AuthUser {
        let credentials = self
            .store
            .find_credentials(username)
            .await
            .expect("store reachable")
            .expect("user exists");
        AuthUser {
            user_id: credentials.user.id,
            username: credentials.user.username,
            role: credentials.user.role,
        }
    }
}

/// An in-memory store without any user
pub fn setup_empty() -> TestContext {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let config = test_config();
    let auth = AuthService::new(store.clone(), &config);

    TestContext {
        store,
        config,
        auth,
    }
}

/// An in-memory store with the bootstrap admin in place
pub async fn setup() -> TestContext {
    let ctx = setup_empty();
    ensure_bootstrap_user(ctx.store.as_ref(), &ctx.auth, &ctx.config.bootstrap)
        .await
        .expect("bootstrap succeeds");
    ctx
}

pub fn item_form(name: &str, location: &str, par: &str) -> ItemForm {
    ItemForm {
        name: Some(name.to_string()),
        location: Some(location.to_string()),
        par: Some(par.to_string()),
        ..ItemForm::default()
    }
}

pub fn supplier_form(name: &str) -> SupplierForm {
    SupplierForm {
        name: Some(name.to_string()),
        ..SupplierForm::default()
    }
}

pub fn assert_role(actor: &AuthUser, role: Role) {
    assert_eq!(actor.role, role);
}
