//! SQLite-backed record store for schools.
//!
//! The store owns persisted records. It supports exactly two operations,
//! insert and full scan; listing does no filtering in SQL, so every request
//! reads the whole table. That is fine for small registries and is the main
//! scalability limit of the service.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::error::Result;
use crate::school::{NewSchool, School, SchoolId};

const CREATE_SCHOOLS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schools (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(name) > 0),
        address TEXT NOT NULL CHECK (length(address) > 0),
        latitude REAL NOT NULL,
        longitude REAL NOT NULL
    )
"#;

/// Durable collection of school records.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct SchoolStore {
    pool: SqlitePool,
}

impl SchoolStore {
    /// Open (creating if needed) the database at `database_url` and ensure the
    /// schema exists.
    ///
    /// `sqlite::memory:` URLs are served from a single connection that is
    /// never recycled, since each in-memory connection is its own database.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Open a private in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Wrap an existing pool, creating the schema if missing.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_SCHOOLS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert a record and return the identifier the database assigned.
    pub async fn insert(&self, school: &NewSchool) -> Result<SchoolId> {
        let result = sqlx::query(
            "INSERT INTO schools (name, address, latitude, longitude) VALUES (?, ?, ?, ?)",
        )
        .bind(&school.name)
        .bind(&school.address)
        .bind(school.location.latitude)
        .bind(school.location.longitude)
        .execute(&self.pool)
        .await?;

        Ok(SchoolId(result.last_insert_rowid()))
    }

    /// Read every record, ordered by identifier.
    pub async fn all(&self) -> Result<Vec<School>> {
        let rows = sqlx::query("SELECT id, name, address, latitude, longitude FROM schools ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<School> {
                Ok(School {
                    id: SchoolId(row.try_get("id")?),
                    name: row.try_get("name")?,
                    address: row.try_get("address")?,
                    latitude: row.try_get("latitude")?,
                    longitude: row.try_get("longitude")?,
                })
            })
            .collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schools")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool, waiting for in-flight queries to finish.
    ///
    /// Any later call on this store (or its clones) fails with a
    /// persistence error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
