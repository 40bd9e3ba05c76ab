use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use rentwise_core::open_db_in_memory;
use rentwise_server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new(open_db_in_memory().unwrap()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_property(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/properties",
        Some(json!({ "name": name, "address": "1 Main St" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_room(app: &Router, property_id: &str, number: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/rooms",
        Some(json!({
            "propertyId": property_id,
            "roomNumber": number,
            "type": "Private Bath",
            "rent": 500
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn sunset_room_lifecycle_keeps_room_list_in_sync() {
    let app = app();
    let property = create_property(&app, "Sunset").await;
    let property_id = property["id"].as_str().unwrap().to_string();
    assert_eq!(property["rooms"], json!([]));

    let room = create_room(&app, &property_id, "101").await;
    let room_id = room["id"].as_str().unwrap().to_string();
    assert_eq!(room["status"], "Vacant");
    assert_eq!(room["propertyId"], property_id.as_str());

    let property_uri = format!("/api/properties/{property_id}");
    let (status, detail) = send(&app, Method::GET, &property_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["rooms"], json!([room_id]));

    let (status, listed) = send(&app, Method::GET, "/api/properties", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["rooms"][0]["roomNumber"], "101");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room deleted");

    let (_, detail) = send(&app, Method::GET, &property_uri, None).await;
    assert_eq!(detail["rooms"], json!([]));
}

#[tokio::test]
async fn legacy_property_key_is_accepted_on_room_create() {
    let app = app();
    let property = create_property(&app, "Sunset").await;

    let (status, room) = send(
        &app,
        Method::POST,
        "/api/rooms",
        Some(json!({
            "property": property["id"],
            "roomNumber": "G1",
            "type": "Garage",
            "rent": 120.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(room["type"], "Garage");

    let (status, rooms) = send(
        &app,
        Method::GET,
        &format!("/api/rooms/property/{}", property["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn room_detail_and_list_resolve_property() {
    let app = app();
    let property = create_property(&app, "Sunset").await;
    let room = create_room(&app, property["id"].as_str().unwrap(), "101").await;

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/rooms/{}", room["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["property"]["name"], "Sunset");
    assert_eq!(detail["roomNumber"], "101");

    let (_, listed) = send(&app, Method::GET, "/api/rooms", None).await;
    assert_eq!(listed[0]["property"]["name"], "Sunset");
}

#[tokio::test]
async fn validation_failures_return_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/properties",
        Some(json!({ "name": "Sunset" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/leads",
        Some(json!({ "name": "Bob", "contactNumber": "1", "source": "Myspace" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/leads",
        Some(json!({
            "name": "Bob",
            "contactNumber": "1",
            "source": "Facebook",
            "reminderDate": "next tuesday"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid date"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/rooms",
        Some(json!({
            "propertyId": "00000000-0000-4000-8000-000000000000",
            "roomNumber": "1",
            "type": "Garage",
            "rent": 100
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("property"));

    let (status, _) = send(&app, Method::GET, "/api/properties/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/api/leads/status/landed", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_rent_update_is_rejected_not_ignored() {
    let app = app();
    let property = create_property(&app, "Sunset").await;
    let room = create_room(&app, property["id"].as_str().unwrap(), "101").await;
    let uri = format!("/api/rooms/{}", room["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "rent": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "status": "Occupied", "occupancyEndDate": "2026-01-01T00:00:00.000Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Occupied");
    assert_eq!(updated["occupancyEndDate"], "2026-01-01T00:00:00.000Z");
    assert_eq!(updated["rent"], 500.0);
}

#[tokio::test]
async fn unknown_ids_and_routes_return_not_found() {
    let app = app();
    let missing = "00000000-0000-4000-8000-000000000000";

    let (status, body) = send(&app, Method::GET, &format!("/api/properties/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Property not found");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/leads/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lead not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/rooms/{missing}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Room not found");

    let (status, body) = send(&app, Method::GET, "/api/tenants", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn unsupported_method_on_known_path_returns_route_not_found() {
    let app = app();
    let missing = "00000000-0000-4000-8000-000000000000";

    for (method, uri) in [
        (Method::PATCH, "/api/properties".to_string()),
        (Method::POST, "/api/leads/reminders".to_string()),
        (Method::POST, format!("/api/rooms/{missing}")),
        (Method::DELETE, "/api/dashboard".to_string()),
    ] {
        let (status, body) = send(&app, method.clone(), &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["message"], "Route not found", "{method} {uri}");
    }
}

#[tokio::test]
async fn alice_reminder_disappears_once_landed() {
    let app = app();
    let property = create_property(&app, "Sunset").await;

    let (status, lead) = send(
        &app,
        Method::POST,
        "/api/leads",
        Some(json!({
            "name": "Alice",
            "contactNumber": "555-1111",
            "source": "WhatsApp",
            "property": property["id"],
            "reminderDate": "2025-06-01T10:00:00.000Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{lead}");
    assert_eq!(lead["status"], "New");
    assert_eq!(lead["reminderDate"], "2025-06-01T10:00:00.000Z");
    assert!(lead["createdAt"].as_str().unwrap().ends_with('Z'));
    let lead_uri = format!("/api/leads/{}", lead["id"].as_str().unwrap());

    let (_, pending) = send(&app, Method::GET, "/api/leads/reminders", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["property"]["name"], "Sunset");

    let (status, landed) = send(
        &app,
        Method::PUT,
        &lead_uri,
        Some(json!({ "status": "Landed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(landed["status"], "Landed");

    let (_, pending) = send(&app, Method::GET, "/api/leads/reminders", None).await;
    assert_eq!(pending, json!([]));

    let (_, by_status) = send(&app, Method::GET, "/api/leads/status/Landed", None).await;
    assert_eq!(by_status.as_array().unwrap().len(), 1);

    let (_, by_property) = send(
        &app,
        Method::GET,
        &format!("/api/leads/property/{}", property["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(by_property[0]["name"], "Alice");

    let (status, body) = send(&app, Method::DELETE, &lead_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Lead deleted");
}

#[tokio::test]
async fn deleting_property_cascades_over_http() {
    let app = app();
    let property = create_property(&app, "Sunset").await;
    let property_id = property["id"].as_str().unwrap().to_string();
    let room = create_room(&app, &property_id, "101").await;

    let (_, lead) = send(
        &app,
        Method::POST,
        "/api/leads",
        Some(json!({
            "name": "Bob",
            "contactNumber": "555-2222",
            "source": "Facebook",
            "roomId": room["id"]
        })),
    )
    .await;

    let property_uri = format!("/api/properties/{property_id}");
    let (status, body) = send(&app, Method::DELETE, &property_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Property deleted");

    let (_, rooms) = send(&app, Method::GET, "/api/rooms", None).await;
    assert_eq!(rooms, json!([]));

    let (status, detail) = send(
        &app,
        Method::GET,
        &format!("/api/leads/{}", lead["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["roomId"], Value::Null);
    assert_eq!(detail["room"], Value::Null);
}

#[tokio::test]
async fn dashboard_and_health_report_state() {
    let app = app();
    let property = create_property(&app, "Sunset").await;
    create_room(&app, property["id"].as_str().unwrap(), "101").await;

    let (status, summary) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["rooms"]["total"], 1);
    assert_eq!(summary["rooms"]["vacant"], 1);
    assert_eq!(summary["properties"][0]["name"], "Sunset");
    assert_eq!(summary["leadsByStatus"].as_array().unwrap().len(), 5);

    let (status, health) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert!(health["version"].is_string());
}
