//! Input validation for registration and listing requests.
//!
//! Presence is decided by nullability and emptiness, never by truthiness, so a
//! coordinate of `0` is a valid value rather than a missing one.

use serde_json::Value;

use crate::error::{MissingFields, Result, SchoolError};
use crate::school::{Coordinates, LocationQuery, NewSchool, SchoolSubmission};

/// Validate a registration submission and build the record to persist.
///
/// Checks run in order: presence of all four fields, numeric coordinates,
/// then coordinate range.
pub fn validate_submission(submission: &SchoolSubmission) -> Result<NewSchool> {
    let name = non_blank(submission.name.as_deref());
    let address = non_blank(submission.address.as_deref());

    let missing = MissingFields {
        name: name.is_none(),
        address: address.is_none(),
        latitude: is_missing_value(submission.latitude.as_ref()),
        longitude: is_missing_value(submission.longitude.as_ref()),
    };
    if missing.any() {
        return Err(SchoolError::MissingFields(missing));
    }

    let raw_lat = submission.latitude.clone().unwrap_or(Value::Null);
    let raw_lon = submission.longitude.clone().unwrap_or(Value::Null);
    let (Some(latitude), Some(longitude)) = (number_from_value(&raw_lat), number_from_value(&raw_lon))
    else {
        return Err(SchoolError::InvalidNumber {
            latitude: raw_lat,
            longitude: raw_lon,
        });
    };

    let location = checked_range(latitude, longitude)?;

    Ok(NewSchool {
        name: name.unwrap_or_default().to_string(),
        address: address.unwrap_or_default().to_string(),
        location,
    })
}

/// Validate listing query parameters and parse them into coordinates.
pub fn validate_location(query: &LocationQuery) -> Result<Coordinates> {
    let (Some(lat_text), Some(lon_text)) = (
        non_blank(query.latitude.as_deref()),
        non_blank(query.longitude.as_deref()),
    ) else {
        return Err(SchoolError::MissingQueryParams);
    };

    let (Some(latitude), Some(longitude)) = (parse_number(lat_text), parse_number(lon_text)) else {
        // Echo the parameters as received, untrimmed
        return Err(SchoolError::InvalidNumber {
            latitude: Value::from(query.latitude.clone()),
            longitude: Value::from(query.longitude.clone()),
        });
    };

    checked_range(latitude, longitude)
}

fn checked_range(latitude: f64, longitude: f64) -> Result<Coordinates> {
    let location = Coordinates::new(latitude, longitude);
    if location.in_range() {
        Ok(location)
    } else {
        Err(SchoolError::CoordinatesOutOfRange {
            latitude,
            longitude,
        })
    }
}

/// Trimmed text, or `None` if absent or blank.
fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}

fn is_missing_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Read a finite number from a JSON number or numeric string.
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
