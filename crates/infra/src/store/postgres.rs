//! Postgres-backed item store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|-----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict(field)` (field taken from the constraint name) |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Tls / Other | N/A | `Backend` |
//!
//! Every write runs in its own transaction. A failed statement rolls the
//! transaction back before the error is returned, so no partial write is ever
//! committed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::OnceCell;
use tracing::instrument;

use stockbook_core::ItemId;
use stockbook_inventory::{AuxiliaryFields, ConflictField, InventoryItem, ItemDraft, MacAddress};

use super::{ItemStore, StoreError};

const MAC_CONSTRAINT: &str = "inventory_mac_address_key";
const SERIAL_CONSTRAINT: &str = "inventory_serial_number_key";

/// Schema for the `inventory` table.
///
/// Idempotent; applied lazily before the first query.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    id             BIGSERIAL PRIMARY KEY,
    name           VARCHAR(100) NOT NULL,
    price          DOUBLE PRECISION NOT NULL,
    mac_address    VARCHAR(17) NOT NULL,
    serial_number  VARCHAR(50) NOT NULL,
    manufacturer   TEXT NOT NULL,
    description    TEXT,
    text_field     TEXT,
    date_field     TIMESTAMPTZ,
    boolean_field  BOOLEAN,
    decimal_field  NUMERIC(10, 2),
    CONSTRAINT inventory_mac_address_key UNIQUE (mac_address),
    CONSTRAINT inventory_serial_number_key UNIQUE (serial_number)
)
"#;

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    price: f64,
    mac_address: String,
    serial_number: String,
    manufacturer: String,
    description: Option<String>,
    text_field: Option<String>,
    date_field: Option<DateTime<Utc>>,
    boolean_field: Option<bool>,
    decimal_field: Option<Decimal>,
}

impl TryFrom<ItemRow> for InventoryItem {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let mac_address = MacAddress::parse(&row.mac_address)
            .map_err(|e| StoreError::Backend(format!("row {}: {e}", row.id)))?;
        Ok(InventoryItem {
            id: ItemId::new(row.id),
            name: row.name,
            price: row.price,
            mac_address,
            serial_number: row.serial_number,
            manufacturer: row.manufacturer,
            description: row.description,
            aux: AuxiliaryFields {
                text_field: row.text_field,
                date_field: row.date_field,
                boolean_field: row.boolean_field,
                decimal_field: row.decimal_field,
            },
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        price,
        mac_address,
        serial_number,
        manufacturer,
        description,
        text_field,
        date_field,
        boolean_field,
        decimal_field
    FROM inventory
"#;

/// Postgres-backed item store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
/// The schema is created on first successful use, so a store built while the
/// database was down starts working once it comes back.
#[derive(Debug, Clone)]
pub struct PostgresItemStore {
    pool: Arc<PgPool>,
    schema: Arc<OnceCell<()>>,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// Create the `inventory` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(SCHEMA)
                    .execute(&*self.pool)
                    .await
                    .map(|_| ())
                    .map_err(|e| map_sqlx_error("ensure_schema", e))
            })
            .await
            .map(|_| ())
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.ensure_schema().await?;
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))
    }
}

/// Roll back and return the triggering error.
async fn abort(tx: Transaction<'static, Postgres>, err: StoreError) -> StoreError {
    if let Err(e) = tx.rollback().await {
        tracing::error!("rollback failed: {e}");
    }
    err
}

async fn commit(tx: Transaction<'static, Postgres>, operation: &str) -> Result<(), StoreError> {
    tx.commit()
        .await
        .map_err(|e| map_sqlx_error(&format!("{operation}_commit"), e))
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.ensure_schema().await?;
        let rows: Vec<ItemRow> = sqlx::query_as(SELECT_COLUMNS)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items", e))?;

        rows.into_iter().map(InventoryItem::try_from).collect()
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        self.ensure_schema().await?;
        let row: Option<ItemRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_item", e))?;

        row.map(InventoryItem::try_from).transpose()
    }

    #[instrument(skip(self, draft), fields(serial_number = %draft.serial_number()), err)]
    async fn insert(&self, draft: ItemDraft) -> Result<InventoryItem, StoreError> {
        let mut tx = self.begin().await?;

        let inserted: Result<(i64,), _> = sqlx::query_as(
            r#"
            INSERT INTO inventory (
                name,
                price,
                mac_address,
                serial_number,
                manufacturer,
                description
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(draft.name())
        .bind(draft.price())
        .bind(draft.mac_address().as_str())
        .bind(draft.serial_number())
        .bind(draft.manufacturer())
        .bind(draft.description())
        .fetch_one(&mut *tx)
        .await;

        let (id,) = match inserted {
            Ok(row) => row,
            Err(e) => return Err(abort(tx, map_sqlx_error("insert_item", e)).await),
        };

        commit(tx, "insert_item").await?;
        Ok(draft.into_item(ItemId::new(id), AuxiliaryFields::default()))
    }

    #[instrument(skip(self, item), fields(item_id = %item.id), err)]
    async fn update(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                name = $2,
                price = $3,
                mac_address = $4,
                serial_number = $5,
                manufacturer = $6,
                description = $7
            WHERE id = $1
            "#,
        )
        .bind(item.id.get())
        .bind(&item.name)
        .bind(item.price)
        .bind(item.mac_address.as_str())
        .bind(&item.serial_number)
        .bind(&item.manufacturer)
        .bind(item.description.as_deref())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(abort(tx, StoreError::NotFound(item.id)).await)
            }
            Ok(_) => commit(tx, "update_item").await,
            Err(e) => Err(abort(tx, map_sqlx_error("update_item", e)).await),
        }
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    async fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;

        let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(abort(tx, StoreError::NotFound(id)).await),
            Ok(_) => commit(tx, "delete_item").await,
            Err(e) => Err(abort(tx, map_sqlx_error("delete_item", e)).await),
        }
    }

    #[instrument(skip(self, draft), err)]
    async fn find_conflict(
        &self,
        draft: &ItemDraft,
        exclude: Option<ItemId>,
    ) -> Result<Option<ConflictField>, StoreError> {
        self.ensure_schema().await?;
        let (mac_taken, serial_taken): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(BOOL_OR(mac_address = $1), FALSE),
                COALESCE(BOOL_OR(serial_number = $2), FALSE)
            FROM inventory
            WHERE ($3::BIGINT IS NULL OR id <> $3)
                AND (mac_address = $1 OR serial_number = $2)
            "#,
        )
        .bind(draft.mac_address().as_str())
        .bind(draft.serial_number())
        .bind(exclude.map(ItemId::get))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_conflict", e))?;

        Ok(if mac_taken {
            Some(ConflictField::MacAddress)
        } else if serial_taken {
            Some(ConflictField::SerialNumber)
        } else {
            None
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("ping", e))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                match db_err.constraint() {
                    Some(MAC_CONSTRAINT) => return StoreError::Conflict(ConflictField::MacAddress),
                    Some(SERIAL_CONSTRAINT) => {
                        return StoreError::Conflict(ConflictField::SerialNumber);
                    }
                    _ => {}
                }
            }
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}
