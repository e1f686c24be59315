//! # schoolfinder - School registry with proximity ranking
//!
//! Register schools with a name, address and coordinates, then list them
//! ordered by great-circle distance from any location.
//!
//! ## Features
//!
//! - **Haversine distance**: spherical Earth with a 6371 km radius
//! - **Strict validation**: missing and non-numeric fields are reported per field
//! - **SQLite storage**: durable record store via `sqlx`
//!
//! ## Quick Start
//!
//! ```ignore
//! use schoolfinder::{LocationQuery, SchoolService, SchoolSubmission};
//!
//! let service = SchoolService::builder("sqlite://schools.db").build().await?;
//!
//! let id = service
//!     .register(&SchoolSubmission {
//!         name: Some("Alpha".into()),
//!         address: Some("1 Main St".into()),
//!         latitude: Some(40.0.into()),
//!         longitude: Some((-75.0).into()),
//!     })
//!     .await?;
//!
//! for ranked in service.list_by_proximity(&LocationQuery::new("40", "-75")).await? {
//!     println!("{} {:.2} km", ranked.school.name, ranked.distance);
//! }
//! ```
//!
//! ## Scalability
//!
//! Listing scans every stored school and sorts in memory. There is no spatial
//! index, so response time grows linearly with the number of schools.

pub mod distance;
pub mod error;
pub mod school;
pub mod service;
pub mod store;
pub mod validate;

// Re-export main types at crate root for convenience
pub use error::{MissingFields, Result, SchoolError};
pub use school::{
    Coordinates, LocationQuery, NewSchool, RankedSchool, School, SchoolId, SchoolSubmission,
};
pub use service::{rank_by_distance, SchoolService, SchoolServiceBuilder};
pub use store::SchoolStore;
