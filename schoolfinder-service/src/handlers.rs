//! HTTP request handlers for the school service.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use schoolfinder::{LocationQuery, MissingFields, RankedSchool, SchoolError, SchoolSubmission};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Message returned when a school is stored.
pub const SCHOOL_ADDED: &str = "School added successfully";
/// Message returned when the store rejects a registration.
pub const ADD_FAILED: &str = "Error adding school";
/// Message returned when the store cannot be scanned.
pub const LIST_FAILED: &str = "Error retrieving schools";

/// Body of `POST /addSchool`.
///
/// Every field is optional at the parsing stage so that missing fields can be
/// reported individually.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddSchoolRequest {
    /// School name.
    pub name: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude in decimal degrees (-90 to 90), as a number or numeric string.
    #[schema(value_type = f64)]
    pub latitude: Option<Value>,
    /// Longitude in decimal degrees (-180 to 180), as a number or numeric string.
    #[schema(value_type = f64)]
    pub longitude: Option<Value>,
}

impl From<AddSchoolRequest> for SchoolSubmission {
    fn from(request: AddSchoolRequest) -> Self {
        SchoolSubmission {
            name: request.name,
            address: request.address,
            latitude: request.latitude,
            longitude: request.longitude,
        }
    }
}

/// Query parameters for `GET /listSchools`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSchoolsQuery {
    /// Latitude of the reference location in decimal degrees.
    pub latitude: Option<String>,
    /// Longitude of the reference location in decimal degrees.
    pub longitude: Option<String>,
}

impl From<ListSchoolsQuery> for LocationQuery {
    fn from(query: ListSchoolsQuery) -> Self {
        LocationQuery {
            latitude: query.latitude,
            longitude: query.longitude,
        }
    }
}

/// Successful registration response.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddSchoolResponse {
    pub message: String,
    /// Identifier assigned to the new school.
    pub id: i64,
}

/// A school with its distance from the query location.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance in kilometers.
    pub distance: f64,
}

impl From<RankedSchool> for SchoolResponse {
    fn from(ranked: RankedSchool) -> Self {
        SchoolResponse {
            id: ranked.school.id.0,
            name: ranked.school.name,
            address: ranked.school.address,
            latitude: ranked.school.latitude,
            longitude: ranked.school.longitude,
            distance: ranked.distance,
        }
    }
}

/// Which registration fields were missing.
#[derive(Debug, Serialize, ToSchema)]
pub struct MissingFieldsBody {
    pub name: bool,
    pub address: bool,
    pub latitude: bool,
    pub longitude: bool,
}

impl From<MissingFields> for MissingFieldsBody {
    fn from(fields: MissingFields) -> Self {
        MissingFieldsBody {
            name: fields.name,
            address: fields.address,
            latitude: fields.latitude,
            longitude: fields.longitude,
        }
    }
}

/// Response for a registration with missing fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct MissingFieldsResponse {
    pub message: String,
    #[serde(rename = "missingFields")]
    pub missing_fields: MissingFieldsBody,
}

/// Response for non-numeric or out-of-range coordinates, echoing the input.
#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidCoordinatesResponse {
    pub message: String,
    #[schema(value_type = Object)]
    pub latitude: Value,
    #[schema(value_type = Object)]
    pub longitude: Value,
}

/// Plain message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Failure response carrying the underlying cause.
#[derive(Debug, Serialize, ToSchema)]
pub struct FailureResponse {
    pub message: String,
    /// Underlying error.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Register a new school.
///
/// # Returns
///
/// - `201 Created` with the new identifier
/// - `400 Bad Request` if fields are missing, non-numeric or out of range
/// - `500 Internal Server Error` if the school could not be stored
#[utoipa::path(
    post,
    path = "/addSchool",
    request_body = AddSchoolRequest,
    responses(
        (status = 201, description = "School stored", body = AddSchoolResponse),
        (status = 400, description = "Missing or invalid fields", body = MissingFieldsResponse),
        (status = 500, description = "Store failure", body = FailureResponse)
    ),
    tag = "schools"
)]
#[axum::debug_handler]
pub async fn add_school(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_add_school_body(&headers, &body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed school body");
            return (
                StatusCode::BAD_REQUEST,
                Json(FailureResponse {
                    message: "Invalid request body".to_string(),
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(request = ?request, "Add school request");

    match state.service.register(&request.into()).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(AddSchoolResponse {
                message: SCHOOL_ADDED.to_string(),
                id: id.0,
            }),
        )
            .into_response(),
        Err(e) => error_response(e, ADD_FAILED),
    }
}

/// Parse a registration body.
///
/// An empty body, or one not sent as JSON, is read as an empty object so the
/// request is answered with the missing-fields error. Only a JSON body that
/// fails to parse is an error.
fn parse_add_school_body(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<AddSchoolRequest, serde_json::Error> {
    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AddSchoolRequest::default());
    }
    serde_json::from_slice(body)
}

/// `application/json` or any `+json` media type.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// List all schools sorted by distance from the given location.
///
/// # Query Parameters
///
/// - `latitude`: Latitude in decimal degrees (-90 to 90)
/// - `longitude`: Longitude in decimal degrees (-180 to 180)
///
/// # Returns
///
/// - `200 OK` with schools ordered nearest first
/// - `400 Bad Request` if parameters are missing or invalid
/// - `500 Internal Server Error` if the store cannot be read
#[utoipa::path(
    get,
    path = "/listSchools",
    params(ListSchoolsQuery),
    responses(
        (status = 200, description = "Schools, nearest first", body = Vec<SchoolResponse>),
        (status = 400, description = "Missing or invalid query parameters", body = MessageResponse),
        (status = 500, description = "Store failure", body = FailureResponse)
    ),
    tag = "schools"
)]
#[axum::debug_handler]
pub async fn list_schools(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListSchoolsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected malformed query string");
            return error_response(SchoolError::MissingQueryParams, LIST_FAILED);
        }
    };

    match state.service.list_by_proximity(&query.into()).await {
        Ok(ranked) => {
            tracing::info!(count = ranked.len(), "Schools listed");
            let schools: Vec<SchoolResponse> = ranked.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(schools)).into_response()
        }
        Err(e) => error_response(e, LIST_FAILED),
    }
}

/// Map a [`SchoolError`] to its HTTP response.
///
/// `failure_message` is used for store failures, which differ per endpoint.
fn error_response(e: SchoolError, failure_message: &str) -> Response {
    if e.is_validation() {
        tracing::warn!(error = %e, "Request failed validation");
    } else {
        tracing::error!(error = %e, "{}", failure_message);
    }

    let message = e.to_string();
    match e {
        SchoolError::MissingFields(fields) => (
            StatusCode::BAD_REQUEST,
            Json(MissingFieldsResponse {
                message,
                missing_fields: fields.into(),
            }),
        )
            .into_response(),
        SchoolError::MissingQueryParams => {
            (StatusCode::BAD_REQUEST, Json(MessageResponse { message })).into_response()
        }
        SchoolError::InvalidNumber {
            latitude,
            longitude,
        } => (
            StatusCode::BAD_REQUEST,
            Json(InvalidCoordinatesResponse {
                message,
                latitude,
                longitude,
            }),
        )
            .into_response(),
        SchoolError::CoordinatesOutOfRange {
            latitude,
            longitude,
        } => (
            StatusCode::BAD_REQUEST,
            Json(InvalidCoordinatesResponse {
                message,
                latitude: Value::from(latitude),
                longitude: Value::from(longitude),
            }),
        )
            .into_response(),
        SchoolError::Persistence(cause) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureResponse {
                message: failure_message.to_string(),
                error: cause.to_string(),
            }),
        )
            .into_response(),
        SchoolError::Config(cause) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FailureResponse {
                message: failure_message.to_string(),
                error: cause,
            }),
        )
            .into_response(),
    }
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
