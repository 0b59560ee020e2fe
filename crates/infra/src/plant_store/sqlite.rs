//! SQLite-backed plant store.
//!
//! ## Schema
//!
//! A single `plants` table, created on start-up by [`SqlitePlantStore::migrate`].
//! `id` is `INTEGER PRIMARY KEY AUTOINCREMENT`, so ids of deleted rows are never
//! handed out again. The stock flag default lives in the column definition.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed / PoolTimedOut | `Unavailable` |
//! | anything else | `Database` |
//!
//! ## Locking
//!
//! Units of work open with `BEGIN IMMEDIATE`. A deferred transaction that
//! reads and then writes can fail with `SQLITE_BUSY` while upgrading its lock,
//! and the busy timeout is not applied to that upgrade. Taking the write lock
//! up front makes concurrent units of work queue on the busy timeout instead,
//! and the last one to commit wins.

use std::time::Duration;

use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::instrument;

use nursery_plants::{NewPlant, Plant, PlantId};

use super::r#trait::{PlantStore, PlantUnitOfWork, StoreError};

/// Plant store backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqlitePlantStore {
    pool: SqlitePool,
}

impl SqlitePlantStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists.
    ///
    /// An in-memory URL (`sqlite::memory:`) is pinned to a single connection
    /// that is never recycled, since every SQLite connection would otherwise
    /// see its own empty database.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = database_url.contains(":memory:");
        let options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { max_connections })
            .acquire_timeout(Duration::from_secs(5));
        let options = if in_memory {
            options
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            options
        };

        let pool = options
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Create the `plants` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS plants (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT    NOT NULL,
                image       TEXT    NOT NULL,
                price       REAL    NOT NULL,
                is_in_stock BOOLEAN NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;

        tracing::debug!("plants table ready");
        Ok(())
    }
}

#[async_trait::async_trait]
impl PlantStore for SqlitePlantStore {
    async fn begin(&self) -> Result<Box<dyn PlantUnitOfWork>, StoreError> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}

/// A SQLite transaction. Dropping it without commit rolls back.
struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait::async_trait]
impl PlantUnitOfWork for SqliteUnitOfWork {
    #[instrument(skip(self), err)]
    async fn find_all(&mut self) -> Result<Vec<Plant>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, image, price, is_in_stock
            FROM plants
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(plant_from_row).collect()
    }

    #[instrument(skip(self), fields(plant_id = %id), err)]
    async fn find_by_id(&mut self, id: PlantId) -> Result<Option<Plant>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, image, price, is_in_stock
            FROM plants
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(plant_from_row).transpose()
    }

    #[instrument(skip(self, plant), fields(name = %plant.name), err)]
    async fn insert(&mut self, plant: NewPlant) -> Result<Plant, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO plants (name, image, price)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, image, price, is_in_stock
            "#,
        )
        .bind(&plant.name)
        .bind(&plant.image)
        .bind(plant.price)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        plant_from_row(&row)
    }

    #[instrument(skip(self, plant), fields(plant_id = %plant.id), err)]
    async fn update(&mut self, plant: &Plant) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE plants
            SET name = ?1, image = ?2, price = ?3, is_in_stock = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&plant.name)
        .bind(&plant.image)
        .bind(plant.price)
        .bind(plant.is_in_stock)
        .bind(plant.id.get())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(plant.id));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(plant_id = %id), err)]
    async fn delete(&mut self, id: PlantId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = ?1")
            .bind(id.get())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

fn plant_from_row(row: &SqliteRow) -> Result<Plant, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Database(format!("failed to decode plant row: {e}"));

    Ok(Plant {
        id: PlantId::new(row.try_get::<i64, _>("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        image: row.try_get("image").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        is_in_stock: row.try_get("is_in_stock").map_err(decode)?,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Database(db_err) => {
            StoreError::Database(format!("database error in {operation}: {}", db_err.message()))
        }
        _ => StoreError::Database(format!("sqlx error in {operation}: {err}")),
    }
}
