//! SQLite-backed entity store.
//!
//! Tables mirror the record shapes one-to-one. Reference columns are plain
//! integers with no foreign key constraints, so deleting a product or location
//! leaves movements pointing at it.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use stockroom_core::{LocationId, MovementId, ProductId};
use stockroom_inventory::{Location, LocationFields, Movement, MovementFields, Product, ProductFields};

use super::r#trait::{EntityStore, StoreError};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS location (
        id      INTEGER PRIMARY KEY,
        name    VARCHAR(120) NOT NULL,
        address VARCHAR(250)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product (
        id          INTEGER PRIMARY KEY,
        name        VARCHAR(120) NOT NULL,
        description VARCHAR(250),
        quantity    INTEGER NOT NULL DEFAULT 0,
        location_id INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_movement (
        id            INTEGER PRIMARY KEY,
        timestamp     DATETIME NOT NULL,
        from_location INTEGER,
        to_location   INTEGER,
        product_id    INTEGER NOT NULL,
        qty           INTEGER NOT NULL
    )
    "#,
];

/// Columns added to `product` after the first schema version shipped.
const PRODUCT_LATE_COLUMNS: [(&str, &str); 2] = [
    ("quantity", "ALTER TABLE product ADD COLUMN quantity INTEGER NOT NULL DEFAULT 0"),
    ("location_id", "ALTER TABLE product ADD COLUMN location_id INTEGER"),
];

/// SQLite entity store over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct SqliteEntityStore {
    pool: SqlitePool,
}

impl SqliteEntityStore {
    /// Connect to `url`, creating the database file if it does not exist.
    ///
    /// In-memory URLs get a single long-lived connection so every query sees
    /// the same database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse_url", e))?
            .create_if_missing(true)
            .foreign_keys(false);

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        tracing::info!(in_memory, "connected to sqlite entity store");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create missing tables and add columns missing from older `product` tables.
    ///
    /// Safe to run on every boot.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("create_schema", e))?;
        }

        let existing: Vec<String> = sqlx::query("PRAGMA table_info(product)")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("inspect_product_columns", e))?
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("inspect_product_columns", e))?;

        for (column, statement) in PRODUCT_LATE_COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("add_product_column", e))?;
            tracing::info!(column, "added missing product column");
        }

        Ok(())
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        quantity: row.try_get("quantity")?,
        location_id: row.try_get::<Option<i64>, _>("location_id")?.map(LocationId::new),
    })
}

fn location_from_row(row: &SqliteRow) -> Result<Location, sqlx::Error> {
    Ok(Location {
        id: LocationId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        address: row.try_get("address")?,
    })
}

fn movement_from_row(row: &SqliteRow) -> Result<Movement, sqlx::Error> {
    Ok(Movement {
        id: MovementId::new(row.try_get("id")?),
        timestamp: row.try_get::<DateTime<Utc>, _>("timestamp")?,
        product_id: ProductId::new(row.try_get("product_id")?),
        from_location: row.try_get::<Option<i64>, _>("from_location")?.map(LocationId::new),
        to_location: row.try_get::<Option<i64>, _>("to_location")?.map(LocationId::new),
        qty: row.try_get("qty")?,
    })
}

fn collect_rows<T>(
    operation: &str,
    rows: Vec<SqliteRow>,
    map: fn(&SqliteRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, StoreError> {
    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| map_sqlx_error(operation, e))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Storage(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            StoreError::Storage(format!("failed to decode column {index} in {operation}: {source}"))
        }
        other => StoreError::Storage(format!("{operation}: {other}")),
    }
}

#[async_trait::async_trait]
impl EntityStore for SqliteEntityStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT id, name, description, quantity, location_id FROM product ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;
        collect_rows("list_products", rows, product_from_row)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query("SELECT id, name, address FROM location ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_locations", e))?;
        collect_rows("list_locations", rows, location_from_row)
    }

    async fn list_movements(&self) -> Result<Vec<Movement>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, from_location, to_location, product_id, qty
            FROM product_movement
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_movements", e))?;

        // Stored timestamps are text; order on the decoded value.
        let mut movements = collect_rows("list_movements", rows, movement_from_row)?;
        movements.sort_by_key(|m| (m.timestamp, m.id));
        Ok(movements)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        sqlx::query("SELECT id, name, description, quantity, location_id FROM product WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_product", e))?
            .map(|row| product_from_row(&row))
            .transpose()
            .map_err(|e| map_sqlx_error("get_product", e))
    }

    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, StoreError> {
        sqlx::query("SELECT id, name, address FROM location WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_location", e))?
            .map(|row| location_from_row(&row))
            .transpose()
            .map_err(|e| map_sqlx_error("get_location", e))
    }

    async fn get_movement(&self, id: MovementId) -> Result<Option<Movement>, StoreError> {
        sqlx::query(
            r#"
            SELECT id, timestamp, from_location, to_location, product_id, qty
            FROM product_movement
            WHERE id = ?1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_movement", e))?
        .map(|row| movement_from_row(&row))
        .transpose()
        .map_err(|e| map_sqlx_error("get_movement", e))
    }

    async fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        sqlx::query(
            r#"
            SELECT id, name, description, quantity, location_id
            FROM product
            WHERE name = ?1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e))?
        .map(|row| product_from_row(&row))
        .transpose()
        .map_err(|e| map_sqlx_error("find_product_by_name", e))
    }

    async fn find_location_by_name(&self, name: &str) -> Result<Option<Location>, StoreError> {
        sqlx::query("SELECT id, name, address FROM location WHERE name = ?1 ORDER BY id LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_location_by_name", e))?
            .map(|row| location_from_row(&row))
            .transpose()
            .map_err(|e| map_sqlx_error("find_location_by_name", e))
    }

    async fn create_product(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO product (name, description, quantity, location_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.quantity)
        .bind(fields.location_id.map(|l| l.get()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        Ok(Product::from_fields(ProductId::new(result.last_insert_rowid()), fields))
    }

    async fn create_location(&self, fields: LocationFields) -> Result<Location, StoreError> {
        let result = sqlx::query("INSERT INTO location (name, address) VALUES (?1, ?2)")
            .bind(&fields.name)
            .bind(fields.address.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_location", e))?;

        Ok(Location::from_fields(LocationId::new(result.last_insert_rowid()), fields))
    }

    async fn create_movement(&self, fields: MovementFields) -> Result<Movement, StoreError> {
        let timestamp = fields.timestamp.unwrap_or_else(Utc::now);
        let result = sqlx::query(
            r#"
            INSERT INTO product_movement (timestamp, from_location, to_location, product_id, qty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(timestamp)
        .bind(fields.from_location.map(|l| l.get()))
        .bind(fields.to_location.map(|l| l.get()))
        .bind(fields.product_id.get())
        .bind(fields.qty)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_movement", e))?;

        Ok(Movement::from_fields(
            MovementId::new(result.last_insert_rowid()),
            timestamp,
            fields,
        ))
    }

    async fn update_product(&self, id: ProductId, fields: ProductFields) -> Result<Product, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE product
            SET name = ?1, description = ?2, quantity = ?3, location_id = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&fields.name)
        .bind(fields.description.as_deref())
        .bind(fields.quantity)
        .bind(fields.location_id.map(|l| l.get()))
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(Product::from_fields(id, fields))
    }

    async fn update_location(&self, id: LocationId, fields: LocationFields) -> Result<Location, StoreError> {
        let result = sqlx::query("UPDATE location SET name = ?1, address = ?2 WHERE id = ?3")
            .bind(&fields.name)
            .bind(fields.address.as_deref())
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_location", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("location", id));
        }
        Ok(Location::from_fields(id, fields))
    }

    async fn update_movement(&self, id: MovementId, fields: MovementFields) -> Result<Movement, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE product_movement
            SET timestamp = COALESCE(?1, timestamp),
                from_location = ?2,
                to_location = ?3,
                product_id = ?4,
                qty = ?5
            WHERE id = ?6
            "#,
        )
        .bind(fields.timestamp)
        .bind(fields.from_location.map(|l| l.get()))
        .bind(fields.to_location.map(|l| l.get()))
        .bind(fields.product_id.get())
        .bind(fields.qty)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_movement", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("movement", id));
        }

        self.get_movement(id)
            .await?
            .ok_or_else(|| StoreError::not_found("movement", id))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        delete_row(&self.pool, "DELETE FROM product WHERE id = ?1", "product", id.get()).await
    }

    async fn delete_location(&self, id: LocationId) -> Result<(), StoreError> {
        delete_row(&self.pool, "DELETE FROM location WHERE id = ?1", "location", id.get()).await
    }

    async fn delete_movement(&self, id: MovementId) -> Result<(), StoreError> {
        delete_row(&self.pool, "DELETE FROM product_movement WHERE id = ?1", "movement", id.get()).await
    }
}

async fn delete_row(pool: &SqlitePool, sql: &'static str, entity: &'static str, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query(sql)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("delete", e))?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found(entity, id));
    }
    Ok(())
}
