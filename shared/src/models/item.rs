//! Catalog item models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validation::{
    check, optional_text, parse_int_or, parse_optional_id, text_or, trimmed, ValidationError,
};

/// Unit of measure used when the form leaves it blank ("pieces")
pub const DEFAULT_UNIT: &str = "個";

/// Storage location used when the form leaves it blank ("room temperature")
pub const DEFAULT_LOCATION: &str = "常温";

/// A trackable stock-keeping unit
///
/// Items carry no quantity of their own; on-hand stock is always derived from
/// the movement ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub location: String,
    /// Target stock quantity
    pub par: i32,
    /// Stored threshold; not consulted by the reorder suggestion
    pub reorder_point: i32,
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl Item {
    pub fn from_draft(id: Uuid, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            unit: draft.unit,
            location: draft.location,
            par: draft.par,
            reorder_point: draft.reorder_point,
            supplier_id: draft.supplier_id,
            notes: draft.notes,
        }
    }
}

/// Item together with the name of its supplier, for catalog listings
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemWithSupplier {
    #[serde(flatten)]
    pub item: Item,
    pub supplier_name: Option<String>,
}

/// Raw item form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub par: Option<String>,
    pub reorder_point: Option<String>,
    pub supplier_id: Option<String>,
    pub notes: Option<String>,
}

/// Validated item fields, used for both create and full replace
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ItemDraft {
    #[validate(length(min = 1, max = 200, message = "Item name is required (max 200 characters)"))]
    pub name: String,
    #[validate(length(max = 50, message = "Unit must be at most 50 characters"))]
    pub unit: String,
    #[validate(length(max = 50, message = "Location must be at most 50 characters"))]
    pub location: String,
    #[validate(range(min = 0, message = "Par level cannot be negative"))]
    pub par: i32,
    #[validate(range(min = 0, message = "Reorder point cannot be negative"))]
    pub reorder_point: i32,
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl ItemForm {
    pub fn into_draft(self) -> Result<ItemDraft, ValidationError> {
        let par = parse_int_or("par", self.par.as_deref(), 0)?;
        let reorder_point = parse_int_or("reorder_point", self.reorder_point.as_deref(), 0)?;
        let supplier_id = parse_optional_id("supplier_id", self.supplier_id.as_deref())?;

        check(ItemDraft {
            name: trimmed(self.name),
            unit: text_or(self.unit, DEFAULT_UNIT),
            location: text_or(self.location, DEFAULT_LOCATION),
            par,
            reorder_point,
            supplier_id,
            notes: optional_text(self.notes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> ItemForm {
        ItemForm {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_item_form_defaults() {
        let draft = form("Milk").into_draft().unwrap();

        assert_eq!(draft.unit, DEFAULT_UNIT);
        assert_eq!(draft.location, DEFAULT_LOCATION);
        assert_eq!(draft.par, 0);
        assert_eq!(draft.reorder_point, 0);
        assert_eq!(draft.supplier_id, None);
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_item_form_parses_numbers_and_supplier() {
        let supplier_id = Uuid::new_v4();
        let draft = ItemForm {
            name: Some("Milk".to_string()),
            unit: Some("本".to_string()),
            location: Some("冷蔵".to_string()),
            par: Some("12".to_string()),
            reorder_point: Some("4".to_string()),
            supplier_id: Some(supplier_id.to_string()),
            notes: Some("  1L cartons ".to_string()),
        }
        .into_draft()
        .unwrap();

        assert_eq!(draft.par, 12);
        assert_eq!(draft.reorder_point, 4);
        assert_eq!(draft.supplier_id, Some(supplier_id));
        assert_eq!(draft.notes.as_deref(), Some("1L cartons"));
    }

    #[test]
    fn test_item_form_requires_name() {
        let err = form("   ").into_draft().unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_item_form_rejects_non_numeric_par() {
        let err = ItemForm {
            par: Some("lots".to_string()),
            ..form("Milk")
        }
        .into_draft()
        .unwrap_err();

        assert_eq!(err.field, "par");
    }

    #[test]
    fn test_item_form_rejects_negative_par() {
        let err = ItemForm {
            par: Some("-3".to_string()),
            ..form("Milk")
        }
        .into_draft()
        .unwrap_err();

        assert_eq!(err.field, "par");
    }

    #[test]
    fn test_item_name_length_counts_characters() {
        let name = "牛".repeat(200);
        assert!(form(&name).into_draft().is_ok());

        let too_long = "牛".repeat(201);
        assert!(form(&too_long).into_draft().is_err());
    }
}
