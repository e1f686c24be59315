//! Schoolfinder Service Library
//!
//! HTTP handlers, router and OpenAPI document for the school service.
//! This library is used by both the schoolfinder-service binary and
//! integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use schoolfinder::SchoolService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Registration and listing service, owning the store handle.
    pub service: SchoolService,
}

/// OpenAPI documentation for the school service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schoolfinder Service",
        version = "0.1.0",
        description = "Register schools and list them by distance from a location.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::add_school,
        handlers::list_schools,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::AddSchoolRequest,
            handlers::AddSchoolResponse,
            handlers::SchoolResponse,
            handlers::MissingFieldsBody,
            handlers::MissingFieldsResponse,
            handlers::InvalidCoordinatesResponse,
            handlers::MessageResponse,
            handlers::FailureResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "schools", description = "School registration and proximity listing"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the application router with tracing, CORS and Swagger UI.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/addSchool", post(handlers::add_school))
        .route("/listSchools", get(handlers::list_schools))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    AddSchoolRequest, AddSchoolResponse, FailureResponse, HealthResponse,
    InvalidCoordinatesResponse, MessageResponse, MissingFieldsResponse, SchoolResponse,
};
