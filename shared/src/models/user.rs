//! User and role models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{check, trimmed, ValidationError};

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    /// Whether this role may create accounts and delete suppliers
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(ValidationError::new(
                "role",
                format!("Unknown role '{}'", other),
            )),
        }
    }
}

/// Raw account creation form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewUserForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Validated account creation command
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewUserDraft {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

impl NewUserForm {
    pub fn into_draft(self) -> Result<NewUserDraft, ValidationError> {
        let role = match self.role.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => Role::default(),
        };

        check(NewUserDraft {
            username: trimmed(self.username),
            password: self.password.unwrap_or_default(),
            role,
        })
    }
}

/// Raw password change form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Validated password change command
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PasswordChangeDraft {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

impl PasswordChangeForm {
    pub fn into_draft(self) -> Result<PasswordChangeDraft, ValidationError> {
        check(PasswordChangeDraft {
            current_password: self.current_password.unwrap_or_default(),
            new_password: self.new_password.unwrap_or_default(),
        })
    }
}
