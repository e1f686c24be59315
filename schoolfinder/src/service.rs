//! School registration and proximity listing.
//!
//! This module provides [`SchoolService`], which validates caller input,
//! persists schools through the [`SchoolStore`] and ranks stored schools by
//! great-circle distance from a query location.
//!
//! ```ignore
//! use schoolfinder::{LocationQuery, SchoolServiceBuilder};
//!
//! let service = SchoolServiceBuilder::new("sqlite://schools.db")
//!     .max_connections(5)
//!     .build()
//!     .await?;
//!
//! let nearest = service
//!     .list_by_proximity(&LocationQuery::new("40.0", "-75.0"))
//!     .await?;
//! ```

use crate::error::{Result, SchoolError};
use crate::school::{Coordinates, LocationQuery, RankedSchool, School, SchoolId, SchoolSubmission};
use crate::store::SchoolStore;
use crate::validate::{validate_location, validate_submission};

/// Default number of pooled database connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Read `SCHOOLS_MAX_CONNECTIONS`, defaulting when unset.
fn max_connections_from_env() -> Result<u32> {
    match std::env::var("SCHOOLS_MAX_CONNECTIONS") {
        Ok(value) => value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                SchoolError::Config(format!(
                    "SCHOOLS_MAX_CONNECTIONS must be a positive integer, got {value:?}"
                ))
            }),
        Err(_) => Ok(DEFAULT_MAX_CONNECTIONS),
    }
}

/// Pair every school with its distance from `origin` and sort nearest first.
///
/// The sort is stable: schools at exactly the same distance keep their input
/// order, so the same input always produces the same output.
pub fn rank_by_distance(origin: Coordinates, schools: Vec<School>) -> Vec<RankedSchool> {
    let mut ranked: Vec<RankedSchool> = schools
        .into_iter()
        .map(|school| {
            let distance = origin.distance_km(&school.coordinates());
            RankedSchool { school, distance }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

/// Registers schools and lists them by proximity.
///
/// Holds no mutable state of its own; all shared state lives in the store.
#[derive(Debug, Clone)]
pub struct SchoolService {
    store: SchoolStore,
}

impl SchoolService {
    pub fn new(store: SchoolStore) -> Self {
        Self { store }
    }

    /// Create a [`SchoolServiceBuilder`] for the given database URL.
    pub fn builder(database_url: impl Into<String>) -> SchoolServiceBuilder {
        SchoolServiceBuilder::new(database_url)
    }

    /// Validate a submission and store it as a new school.
    ///
    /// Nothing is written when validation fails. A failed insert is reported
    /// as-is and not retried.
    ///
    /// # Errors
    ///
    /// - [`SchoolError::MissingFields`] if any field is absent or empty
    /// - [`SchoolError::InvalidNumber`] if a coordinate is not numeric
    /// - [`SchoolError::CoordinatesOutOfRange`] if a coordinate is off the globe
    /// - [`SchoolError::Persistence`] if the store rejects the insert
    pub async fn register(&self, submission: &SchoolSubmission) -> Result<SchoolId> {
        let school = validate_submission(submission)?;

        let id = self.store.insert(&school).await.inspect_err(|e| {
            tracing::error!(name = %school.name, error = %e, "Failed to store school");
        })?;

        tracing::info!(
            id = %id,
            name = %school.name,
            latitude = school.location.latitude,
            longitude = school.location.longitude,
            "School registered"
        );

        Ok(id)
    }

    /// List every stored school, nearest to the query location first.
    ///
    /// The store is not touched when the query fails validation. Store errors
    /// abort the listing; no partial result is returned.
    pub async fn list_by_proximity(&self, query: &LocationQuery) -> Result<Vec<RankedSchool>> {
        let origin = validate_location(query)?;

        let schools = self.store.all().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to read schools");
        })?;

        let ranked = rank_by_distance(origin, schools);

        tracing::debug!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            count = ranked.len(),
            "Schools ranked by distance"
        );

        Ok(ranked)
    }

    /// Access the underlying store.
    pub fn store(&self) -> &SchoolStore {
        &self.store
    }

    /// Close the store. Requests made afterwards fail with a persistence error.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Builder for [`SchoolService`].
#[derive(Debug, Clone)]
pub struct SchoolServiceBuilder {
    database_url: String,
    max_connections: u32,
}

impl SchoolServiceBuilder {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SCHOOLS_DATABASE_URL` | SQLite URL of the record store | Required |
    /// | `SCHOOLS_MAX_CONNECTIONS` | Connection pool size | 5 |
    ///
    /// # Errors
    ///
    /// Returns [`SchoolError::Config`] if `SCHOOLS_DATABASE_URL` is not set or
    /// `SCHOOLS_MAX_CONNECTIONS` is not a positive integer.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("SCHOOLS_DATABASE_URL").map_err(|_| {
            SchoolError::Config("SCHOOLS_DATABASE_URL environment variable not set".to_string())
        })?;

        Ok(Self {
            database_url,
            max_connections: max_connections_from_env()?,
        })
    }

    /// Like [`from_env`](Self::from_env), but use `default_url` when
    /// `SCHOOLS_DATABASE_URL` is unset.
    ///
    /// Only the missing URL falls back; a malformed
    /// `SCHOOLS_MAX_CONNECTIONS` is still an error.
    pub fn from_env_or(default_url: &str) -> Result<Self> {
        let database_url = match std::env::var("SCHOOLS_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                tracing::warn!(
                    database_url = default_url,
                    "SCHOOLS_DATABASE_URL not set, using default database"
                );
                default_url.to_string()
            }
        };

        Ok(Self {
            database_url,
            max_connections: max_connections_from_env()?,
        })
    }

    /// Set the database URL.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the maximum number of pooled connections.
    ///
    /// Ignored for in-memory databases, which always use one connection.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Open the store and build the [`SchoolService`].
    ///
    /// # Errors
    ///
    /// Returns [`SchoolError::Persistence`] if the database cannot be opened
    /// or the schema cannot be created.
    pub async fn build(self) -> Result<SchoolService> {
        let store = SchoolStore::connect(&self.database_url, self.max_connections).await?;
        Ok(SchoolService::new(store))
    }
}
