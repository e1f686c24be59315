//! Integration tests for the HTTP API.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use schoolfinder::{SchoolService, SchoolServiceBuilder};
use schoolfinder_service::{router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Create a service backed by a private in-memory database.
async fn memory_service() -> SchoolService {
    SchoolServiceBuilder::new("sqlite::memory:")
        .build()
        .await
        .unwrap()
}

/// Create a test server around the given service.
fn create_test_server(service: SchoolService) -> TestServer {
    let state = Arc::new(AppState { service });
    TestServer::new(router(state)).unwrap()
}

async fn add_school(server: &TestServer, name: &str, latitude: f64, longitude: f64) -> i64 {
    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": name,
            "address": format!("{name} Street"),
            "latitude": latitude,
            "longitude": longitude
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_add_school_success() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Alpha",
            "address": "1 Main St",
            "latitude": 40.0,
            "longitude": -75.0
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    assert_eq!(json["message"], "School added successfully");
    assert!(json["id"].is_i64());
}

#[tokio::test]
async fn test_add_then_list_same_location() {
    let server = create_test_server(memory_service().await);
    let id = add_school(&server, "Alpha", 40.0, -75.0).await;

    let response = server.get("/listSchools?latitude=40.0&longitude=-75.0").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let schools = json.as_array().unwrap();
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0]["id"], id);
    assert_eq!(schools[0]["name"], "Alpha");
    assert_eq!(schools[0]["address"], "Alpha Street");
    assert_eq!(schools[0]["latitude"], 40.0);
    assert_eq!(schools[0]["longitude"], -75.0);
    assert!(schools[0]["distance"].as_f64().unwrap().abs() < 1e-6);
}

#[tokio::test]
async fn test_list_orders_by_distance() {
    let server = create_test_server(memory_service().await);
    add_school(&server, "East", 0.0, 1.0).await;
    add_school(&server, "Origin", 0.0, 0.0).await;

    let response = server.get("/listSchools?latitude=0&longitude=0").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let schools = json.as_array().unwrap();
    assert_eq!(schools.len(), 2);
    assert_eq!(schools[0]["name"], "Origin");
    assert_eq!(schools[1]["name"], "East");
    assert_eq!(schools[0]["distance"].as_f64().unwrap(), 0.0);
    assert!((schools[1]["distance"].as_f64().unwrap() - 111.19).abs() < 0.5);
}

#[tokio::test]
async fn test_list_sorted_and_repeatable() {
    let server = create_test_server(memory_service().await);
    for (name, lat, lon) in [
        ("Tokyo", 35.6762, 139.6503),
        ("London", 51.5074, -0.1278),
        ("Sydney", -33.8688, 151.2093),
        ("Paris", 48.8566, 2.3522),
        ("Lima", -12.0464, -77.0428),
    ] {
        add_school(&server, name, lat, lon).await;
    }

    let first: Value = server
        .get("/listSchools?latitude=50.0&longitude=0.0")
        .await
        .json();
    let second: Value = server
        .get("/listSchools?latitude=50.0&longitude=0.0")
        .await
        .json();
    assert_eq!(first, second);

    let distances: Vec<f64> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["distance"].as_f64().unwrap())
        .collect();
    assert_eq!(distances.len(), 5);
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(first[0]["name"], "London");
    assert_eq!(first[1]["name"], "Paris");
}

#[tokio::test]
async fn test_list_empty_store() {
    let server = create_test_server(memory_service().await);

    let response = server.get("/listSchools?latitude=1&longitude=1").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_add_school_missing_fields() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({ "name": "Alpha", "latitude": 40.0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "All fields are required");
    assert_eq!(
        json["missingFields"],
        json!({
            "name": false,
            "address": true,
            "latitude": false,
            "longitude": true
        })
    );
}

#[tokio::test]
async fn test_add_school_each_field_missing() {
    let server = create_test_server(memory_service().await);
    let full = json!({
        "name": "Alpha",
        "address": "1 Main St",
        "latitude": 40.0,
        "longitude": -75.0
    });

    for field in ["name", "address", "latitude", "longitude"] {
        let mut body = full.clone();
        body.as_object_mut().unwrap().remove(field);

        let response = server.post("/addSchool").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let json: Value = response.json();
        for other in ["name", "address", "latitude", "longitude"] {
            assert_eq!(json["missingFields"][other], other == field, "{field}/{other}");
        }
    }

    let response = server.get("/listSchools?latitude=0&longitude=0").await;
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_add_school_invalid_number() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Alpha",
            "address": "1 Main St",
            "latitude": "abc",
            "longitude": -75.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Latitude and longitude must be valid numbers");
    assert_eq!(json["latitude"], "abc");
    assert_eq!(json["longitude"], -75.0);
}

#[tokio::test]
async fn test_add_school_zero_coordinates() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Null Island Academy",
            "address": "Gulf of Guinea",
            "latitude": 0,
            "longitude": 0
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_add_school_numeric_strings() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Alpha",
            "address": "1 Main St",
            "latitude": "40.5",
            "longitude": "-75.5"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let json: Value = server
        .get("/listSchools?latitude=40.5&longitude=-75.5")
        .await
        .json();
    assert_eq!(json[0]["latitude"], 40.5);
    assert_eq!(json[0]["longitude"], -75.5);
}

#[tokio::test]
async fn test_add_school_out_of_range() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Alpha",
            "address": "1 Main St",
            "latitude": 95.0,
            "longitude": 10.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["message"].as_str().unwrap().contains("between -90 and 90"));
    assert_eq!(json["latitude"], 95.0);
}

#[tokio::test]
async fn test_add_school_malformed_body() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .bytes("{not json".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Invalid request body");
    assert!(json["error"].as_str().is_some());
}

fn assert_all_fields_missing(json: &Value) {
    assert_eq!(json["message"], "All fields are required");
    assert_eq!(
        json["missingFields"],
        json!({
            "name": true,
            "address": true,
            "latitude": true,
            "longitude": true
        })
    );
}

#[tokio::test]
async fn test_add_school_without_body() {
    let server = create_test_server(memory_service().await);

    let response = server.post("/addSchool").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_all_fields_missing(&response.json());
}

#[tokio::test]
async fn test_add_school_non_json_body_reads_as_empty() {
    let server = create_test_server(memory_service().await);

    let response = server
        .post("/addSchool")
        .text(r#"{"name": "Alpha", "address": "1 Main St", "latitude": 1, "longitude": 2}"#)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_all_fields_missing(&response.json());

    let response = server
        .post("/addSchool")
        .bytes("".into())
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_all_fields_missing(&response.json());

    let json: Value = server
        .get("/listSchools?latitude=0&longitude=0")
        .await
        .json();
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_list_missing_params() {
    let server = create_test_server(memory_service().await);

    for path in [
        "/listSchools",
        "/listSchools?latitude=40.0",
        "/listSchools?longitude=-75.0",
        "/listSchools?latitude=&longitude=1",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: Value = response.json();
        assert_eq!(
            json["message"],
            "Latitude and longitude are required as query parameters.",
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_list_invalid_params() {
    let server = create_test_server(memory_service().await);

    let response = server.get("/listSchools?latitude=abc&longitude=10").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["message"], "Latitude and longitude must be valid numbers");
    assert_eq!(json["latitude"], "abc");
    assert_eq!(json["longitude"], "10");

    // Values are echoed exactly as sent
    let response = server
        .get("/listSchools?latitude=%20abc%20&longitude=10")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["latitude"], " abc ");
}

#[tokio::test]
async fn test_store_failure_returns_500() {
    let service = memory_service().await;
    let handle = service.clone();
    let server = create_test_server(service);
    handle.close().await;

    let response = server
        .post("/addSchool")
        .json(&json!({
            "name": "Alpha",
            "address": "1 Main St",
            "latitude": 40.0,
            "longitude": -75.0
        }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["message"], "Error adding school");
    assert!(!json["error"].as_str().unwrap().is_empty());

    let response = server.get("/listSchools?latitude=1&longitude=1").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["message"], "Error retrieving schools");

    // Validation still runs before the store is touched
    let response = server.get("/listSchools").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("schools.db").display());

    let service = SchoolServiceBuilder::new(&url).build().await.unwrap();
    let handle = service.clone();
    let server = create_test_server(service);
    let id = add_school(&server, "Alpha", 40.0, -75.0).await;
    handle.close().await;

    let server = create_test_server(SchoolServiceBuilder::new(&url).build().await.unwrap());
    let json: Value = server
        .get("/listSchools?latitude=40&longitude=-75")
        .await
        .json();
    assert_eq!(json[0]["id"], id);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server(memory_service().await);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].as_str().is_some());
}

#[tokio::test]
async fn test_openapi_document() {
    let server = create_test_server(memory_service().await);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/addSchool"]["post"].is_object());
    assert!(json["paths"]["/listSchools"]["get"].is_object());
}
