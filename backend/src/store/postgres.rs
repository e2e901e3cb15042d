//! PostgreSQL adapter for the persistence ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    Item, ItemDraft, ItemWithSupplier, LedgerEntry, MovementKind, NewMovement, Role,
    StockMovement, Supplier, SupplierDraft, User,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{CatalogStore, LedgerStore, NewUser, Store, UserCredentials, UserStore};
use crate::error::{AppError, AppResult};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for UserCredentials {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            AppError::Internal(format!("Unknown role '{}' stored for user {}", row.role, row.id))
        })?;

        Ok(UserCredentials {
            user: User {
                id: row.id,
                username: row.username,
                role,
            },
            password_hash: row.password_hash,
        })
    }
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    delivery_days: Option<String>,
    lead_time_days: i32,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            delivery_days: row.delivery_days,
            lead_time_days: row.lead_time_days,
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    unit: String,
    location: String,
    par: i32,
    reorder_point: i32,
    supplier_id: Option<Uuid>,
    notes: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            unit: row.unit,
            location: row.location,
            par: row.par,
            reorder_point: row.reorder_point,
            supplier_id: row.supplier_id,
            notes: row.notes,
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemWithSupplierRow {
    #[sqlx(flatten)]
    item: ItemRow,
    supplier_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    item_id: Uuid,
    kind: String,
    qty: f64,
    note: Option<String>,
    user_id: Option<Uuid>,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        Ok(StockMovement {
            id: row.id,
            item_id: row.item_id,
            kind: parse_kind(&row.kind)?,
            qty: row.qty,
            note: row.note,
            user_id: row.user_id,
            recorded_at: row.recorded_at,
        })
    }
}

fn parse_kind(raw: &str) -> AppResult<MovementKind> {
    raw.parse()
        .map_err(|_| AppError::Internal(format!("Unknown movement kind '{}' in ledger", raw)))
}

/// Translate constraint violations into the errors callers can act on
fn map_write_error(err: sqlx::Error, reference_field: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict {
                resource: "username".to_string(),
                message: "Username already exists".to_string(),
                message_ja: "このユーザー名は既に使われています。".to_string(),
            };
        }
        if db_err.is_foreign_key_violation() {
            let field = match db_err.constraint() {
                Some(name) if name.contains("user_id") => "user_id",
                _ => reference_field,
            };
            return AppError::Validation {
                field: field.to_string(),
                message: format!("{} does not refer to an existing record", field),
                message_ja: format!("参照先が存在しません（{}）", field),
            };
        }
        if db_err.is_check_violation() {
            if let Some(name) = db_err.constraint().filter(|name| name.contains("qty")) {
                tracing::warn!(constraint = name, "Quantity rejected by the database");
                return AppError::Validation {
                    field: "qty".to_string(),
                    message: "qty is out of range".to_string(),
                    message_ja: "数量が範囲外です。".to_string(),
                };
            }
        }
    }
    AppError::DatabaseError(err)
}

const SUPPLIER_COLUMNS: &str = "id, name, phone, email, delivery_days, lead_time_days";
const ITEM_COLUMNS: &str = "id, name, unit, location, par, reorder_point, supplier_id, notes";
const MOVEMENT_COLUMNS: &str = "id, item_id, kind, qty, note, user_id, recorded_at";

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn find_credentials(&self, username: &str) -> AppResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        row.map(UserCredentials::try_from).transpose()
    }

    async fn find_credentials_by_id(&self, id: Uuid) -> AppResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(UserCredentials::try_from).transpose()
    }

    async fn count_users(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, "username"))?;

        Ok(UserCredentials::try_from(row)?.user)
    }

    async fn create_first_user(&self, new_user: NewUser) -> AppResult<Option<User>> {
        // Single statement: the emptiness check and the insert cannot interleave
        // with another starter, and a concurrent insert of the same username is
        // absorbed by ON CONFLICT.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, role)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM users)
            ON CONFLICT (username) DO NOTHING
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_optional(&self.db)
        .await?;

        row.map(|r| UserCredentials::try_from(r).map(|c| c.user))
            .transpose()
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers ORDER BY name ASC, id ASC",
            SUPPLIER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    async fn get_supplier(&self, id: Uuid) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers WHERE id = $1",
            SUPPLIER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Supplier::from))
    }

    async fn create_supplier(&self, draft: SupplierDraft) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (name, phone, email, delivery_days, lead_time_days)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.delivery_days)
        .bind(draft.lead_time_days)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_supplier(&self, id: Uuid, draft: SupplierDraft) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, phone = $2, email = $3, delivery_days = $4, lead_time_days = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.delivery_days)
        .bind(draft.lead_time_days)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Supplier::from))
    }

    async fn delete_supplier(&self, id: Uuid) -> AppResult<Option<u64>> {
        let mut tx = self.db.begin().await?;

        let detached = sqlx::query(
            "UPDATE items SET supplier_id = NULL, updated_at = NOW() WHERE supplier_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let deleted = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(detached))
    }

    async fn list_items(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {} FROM items ORDER BY location ASC, name ASC, id ASC",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn list_items_with_suppliers(&self) -> AppResult<Vec<ItemWithSupplier>> {
        let rows = sqlx::query_as::<_, ItemWithSupplierRow>(
            r#"
            SELECT i.id, i.name, i.unit, i.location, i.par, i.reorder_point, i.supplier_id,
                   i.notes, s.name AS supplier_name
            FROM items i
            LEFT JOIN suppliers s ON s.id = i.supplier_id
            ORDER BY i.location ASC, i.name ASC, i.id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ItemWithSupplier {
                item: row.item.into(),
                supplier_name: row.supplier_name,
            })
            .collect())
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {} FROM items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn create_item(&self, draft: ItemDraft) -> AppResult<Item> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO items (name, unit, location, par, reorder_point, supplier_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.unit)
        .bind(&draft.location)
        .bind(draft.par)
        .bind(draft.reorder_point)
        .bind(draft.supplier_id)
        .bind(&draft.notes)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, "supplier_id"))?;

        Ok(row.into())
    }

    async fn update_item(&self, id: Uuid, draft: ItemDraft) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE items
            SET name = $1, unit = $2, location = $3, par = $4, reorder_point = $5,
                supplier_id = $6, notes = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.unit)
        .bind(&draft.location)
        .bind(draft.par)
        .bind(draft.reorder_point)
        .bind(draft.supplier_id)
        .bind(&draft.notes)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, "supplier_id"))?;

        Ok(row.map(Item::from))
    }
}

// ============================================================================
// Ledger
// ============================================================================

#[async_trait]
impl LedgerStore for PgStore {
    async fn append_movement(&self, movement: NewMovement) -> AppResult<StockMovement> {
        let row = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            INSERT INTO stock_movements (item_id, kind, qty, note, user_id, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(movement.item_id)
        .bind(movement.kind.as_str())
        .bind(movement.qty)
        .bind(&movement.note)
        .bind(movement.user_id)
        .bind(movement.recorded_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, "item_id"))?;

        row.try_into()
    }

    async fn movements_for_item(&self, item_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"
            SELECT {}
            FROM stock_movements
            WHERE item_id = $1
            ORDER BY recorded_at DESC, id DESC
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockMovement::try_from).collect()
    }

    async fn count_movements(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn ledger_entries(&self) -> AppResult<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, (Uuid, String, f64)>(
            r#"
            SELECT item_id, kind, SUM(qty) AS qty
            FROM stock_movements
            GROUP BY item_id, kind
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|(item_id, kind, qty)| {
                Ok(LedgerEntry {
                    item_id,
                    kind: parse_kind(&kind)?,
                    qty,
                })
            })
            .collect()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db).await.is_ok()
    }
}
