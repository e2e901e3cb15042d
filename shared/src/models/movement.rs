//! Stock movement (ledger) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{check, optional_text, parse_id, parse_quantity, ValidationError};

/// Kind of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Stock received
    In,
    /// Stock consumed
    Out,
    /// Stock discarded
    Waste,
    /// Manual correction; the quantity carries its own sign
    Adj,
}

impl MovementKind {
    pub const ALL: [MovementKind; 4] = [
        MovementKind::In,
        MovementKind::Out,
        MovementKind::Waste,
        MovementKind::Adj,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "in",
            MovementKind::Out => "out",
            MovementKind::Waste => "waste",
            MovementKind::Adj => "adj",
        }
    }

    /// Signed effect of a movement of this kind on the on-hand quantity
    pub fn contribution(&self, qty: f64) -> f64 {
        match self {
            MovementKind::In | MovementKind::Adj => qty,
            MovementKind::Out | MovementKind::Waste => -qty,
        }
    }

    /// Only adjustments may carry a negative quantity
    pub fn allows_negative(&self) -> bool {
        matches!(self, MovementKind::Adj)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in" => Ok(MovementKind::In),
            "out" => Ok(MovementKind::Out),
            "waste" => Ok(MovementKind::Waste),
            "adj" => Ok(MovementKind::Adj),
            other => Err(ValidationError::new(
                "kind",
                format!("Unknown movement kind '{}' (expected in, out, waste or adj)", other),
            )),
        }
    }
}

/// An immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    pub id: Uuid,
    pub item_id: Uuid,
    pub kind: MovementKind,
    pub qty: f64,
    pub note: Option<String>,
    /// Acting user; absent only for rows whose user no longer exists
    pub user_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

/// Raw movement form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovementForm {
    pub item_id: Option<String>,
    pub kind: Option<String>,
    pub qty: Option<String>,
    pub note: Option<String>,
}

/// Validated movement command
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MovementDraft {
    pub item_id: Uuid,
    pub kind: MovementKind,
    pub qty: f64,
    #[validate(length(max = 255, message = "Note must be at most 255 characters"))]
    pub note: Option<String>,
}

impl MovementForm {
    pub fn into_draft(self) -> Result<MovementDraft, ValidationError> {
        let item_id = parse_id("item_id", self.item_id.as_deref())?;
        let kind: MovementKind = self
            .kind
            .as_deref()
            .ok_or_else(|| ValidationError::new("kind", "kind is required"))?
            .parse()?;
        let qty = parse_quantity("qty", self.qty.as_deref())?;

        if qty < 0.0 && !kind.allows_negative() {
            return Err(ValidationError::new(
                "qty",
                format!("Quantity for '{}' movements cannot be negative", kind),
            ));
        }

        check(MovementDraft {
            item_id,
            kind,
            qty,
            note: optional_text(self.note),
        })
    }
}

/// A movement ready to be appended to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub item_id: Uuid,
    pub kind: MovementKind,
    pub qty: f64,
    pub note: Option<String>,
    pub user_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}
