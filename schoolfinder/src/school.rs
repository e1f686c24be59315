//! School records and the raw inputs they are built from.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::distance::haversine_km;

/// Store-assigned identifier of a school record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchoolId(pub i64);

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Check that latitude is within ±90° and longitude within ±180°.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A persisted school record.
#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl School {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A validated school that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchool {
    pub name: String,
    pub address: String,
    pub location: Coordinates,
}

impl NewSchool {
    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: SchoolId) -> School {
        School {
            id,
            name: self.name,
            address: self.address,
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }
}

/// A school paired with its distance from a query location.
///
/// The distance is derived per listing and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSchool {
    pub school: School,
    /// Distance from the query location in kilometers.
    pub distance: f64,
}

/// Registration input exactly as the caller submitted it.
///
/// Coordinates are kept as raw JSON so that numeric strings are accepted and
/// invalid values can be echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchoolSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
}

/// Listing input as received in the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationQuery {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl LocationQuery {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }
}
