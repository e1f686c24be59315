//! Error types for the schoolfinder library.

use serde_json::Value;
use thiserror::Error;

/// Which registration fields were absent, `true` meaning missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingFields {
    pub name: bool,
    pub address: bool,
    pub latitude: bool,
    pub longitude: bool,
}

impl MissingFields {
    /// Returns true if at least one field is flagged as missing.
    pub fn any(&self) -> bool {
        self.name || self.address || self.latitude || self.longitude
    }
}

/// Errors that can occur when registering or listing schools.
#[derive(Error, Debug)]
pub enum SchoolError {
    /// One or more registration fields were absent or empty.
    #[error("All fields are required")]
    MissingFields(MissingFields),

    /// Listing was requested without both query coordinates.
    #[error("Latitude and longitude are required as query parameters.")]
    MissingQueryParams,

    /// A coordinate was present but could not be read as a finite number.
    #[error("Latitude and longitude must be valid numbers")]
    InvalidNumber { latitude: Value, longitude: Value },

    /// Coordinates parsed but fall outside the valid geographic range.
    #[error("Latitude must be between -90 and 90 and longitude between -180 and 180")]
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },

    /// The record store failed.
    #[error("Storage error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Invalid environment configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SchoolError {
    /// Returns true for errors caused by caller input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SchoolError::MissingFields(_)
                | SchoolError::MissingQueryParams
                | SchoolError::InvalidNumber { .. }
                | SchoolError::CoordinatesOutOfRange { .. }
        )
    }
}

/// Result type alias using [`SchoolError`].
pub type Result<T> = std::result::Result<T, SchoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchoolError::MissingFields(MissingFields {
            name: true,
            ..Default::default()
        });
        assert_eq!(err.to_string(), "All fields are required");

        let err = SchoolError::MissingQueryParams;
        assert_eq!(
            err.to_string(),
            "Latitude and longitude are required as query parameters."
        );

        let err = SchoolError::InvalidNumber {
            latitude: Value::from("abc"),
            longitude: Value::from(1.0),
        };
        assert_eq!(
            err.to_string(),
            "Latitude and longitude must be valid numbers"
        );

        let err = SchoolError::Persistence(sqlx::Error::PoolClosed);
        assert!(err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_missing_fields_any() {
        assert!(!MissingFields::default().any());
        let fields = MissingFields {
            longitude: true,
            ..Default::default()
        };
        assert!(fields.any());
    }

    #[test]
    fn test_is_validation() {
        assert!(SchoolError::MissingQueryParams.is_validation());
        assert!(SchoolError::CoordinatesOutOfRange {
            latitude: 91.0,
            longitude: 0.0
        }
        .is_validation());
        assert!(!SchoolError::Persistence(sqlx::Error::PoolClosed).is_validation());
        assert!(!SchoolError::Config("bad".into()).is_validation());
    }
}
