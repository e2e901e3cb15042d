//! Supplier models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{check, optional_text, parse_int_or, trimmed, ValidationError};

/// Lead time assumed when the form leaves it blank
pub const DEFAULT_LEAD_TIME_DAYS: i32 = 1;

/// A supplier that delivers catalog items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Free-text delivery schedule (e.g. "Mon/Thu")
    pub delivery_days: Option<String>,
    pub lead_time_days: i32,
}

impl Supplier {
    pub fn from_draft(id: Uuid, draft: SupplierDraft) -> Self {
        Self {
            id,
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            delivery_days: draft.delivery_days,
            lead_time_days: draft.lead_time_days,
        }
    }
}

/// Raw supplier form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SupplierForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub delivery_days: Option<String>,
    pub lead_time_days: Option<String>,
}

/// Validated supplier fields, used for both create and full replace
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SupplierDraft {
    #[validate(length(min = 1, max = 120, message = "Supplier name is required (max 120 characters)"))]
    pub name: String,
    #[validate(length(max = 120, message = "Phone must be at most 120 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 120, message = "Email must be at most 120 characters"))]
    pub email: Option<String>,
    #[validate(length(max = 120, message = "Delivery days must be at most 120 characters"))]
    pub delivery_days: Option<String>,
    #[validate(range(min = 0, message = "Lead time cannot be negative"))]
    pub lead_time_days: i32,
}

impl SupplierForm {
    pub fn into_draft(self) -> Result<SupplierDraft, ValidationError> {
        let lead_time_days = parse_int_or(
            "lead_time_days",
            self.lead_time_days.as_deref(),
            DEFAULT_LEAD_TIME_DAYS,
        )?;

        check(SupplierDraft {
            name: trimmed(self.name),
            phone: optional_text(self.phone),
            email: optional_text(self.email),
            delivery_days: optional_text(self.delivery_days),
            lead_time_days,
        })
    }
}
