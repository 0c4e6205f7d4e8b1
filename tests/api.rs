//! Drives the HTTP router end to end against an in-memory database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::{Pool, Sqlite};
use tower::ServiceExt;

use expense_tracker::backend::create_router;
use expense_tracker::database::db::{connection, migrate, seed};

async fn setup() -> (Router, Pool<Sqlite>) {
    let pool = connection::memory_pool().await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    (create_router(pool.clone()), pool)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create_food_and_groceries(app: &Router) -> (i64, i64) {
    let (status, category) = send(
        app,
        "POST",
        "/api/categories",
        Some(json!({ "name": "Food & Dining", "description": "Restaurants, groceries, and food-related expenses" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = category["id"].as_i64().unwrap();

    let (status, sub_category) = send(
        app,
        "POST",
        "/api/subcategories",
        Some(json!({ "name": "Groceries", "description": "Food shopping and groceries", "categoryId": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (category_id, sub_category["id"].as_i64().unwrap())
}

fn expense_body(category_id: i64, sub_category_id: i64) -> Value {
    json!({
        "name": "Weekly Groceries",
        "description": "Grocery shopping for the week",
        "amount": 120.75,
        "date": "2024-01-14T00:00:00",
        "categoryId": category_id,
        "subCategoryId": sub_category_id
    })
}

#[tokio::test]
async fn health_reports_running() {
    let (app, _pool) = setup().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Backend is running".to_string()));
}

#[tokio::test]
async fn expense_round_trip_through_the_api() {
    let (app, _pool) = setup().await;
    let (category_id, sub_category_id) = create_food_and_groceries(&app).await;

    let (status, created) = send(&app, "POST", "/api/expenses", Some(expense_body(category_id, sub_category_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["rowVersion"], 1);

    let (status, listed) = send(&app, "GET", "/api/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["categoryName"], "Food & Dining");
    assert_eq!(listed[0]["subCategoryName"], "Groceries");
    assert_eq!(listed[0]["amount"].as_f64(), Some(120.75));
    assert_eq!(listed[0]["date"], "2024-01-14T00:00:00");

    let (status, subs) = send(&app, "GET", &format!("/api/subcategories/by-category/{}", category_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn browser_serialized_dates_are_accepted() {
    let (app, _pool) = setup().await;
    let (category_id, sub_category_id) = create_food_and_groceries(&app).await;

    let mut body = expense_body(category_id, sub_category_id);
    body["date"] = json!("2024-01-14T00:00:00.000Z");
    let (status, created) = send(&app, "POST", "/api/expenses", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["date"], "2024-01-14T00:00:00");

    let uri = format!("/api/expenses/{}", created["id"].as_i64().unwrap());
    body["date"] = json!("2024-02-01T09:30:00.000Z");
    let (status, _) = send(&app, "PUT", &uri, Some(body)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, fetched) = send(&app, "GET", &uri, None).await;
    assert_eq!(fetched["date"], "2024-02-01T09:30:00");
}

#[tokio::test]
async fn non_numeric_ids_get_the_json_error_body() {
    let (app, _pool) = setup().await;

    for uri in [
        "/api/categories/abc",
        "/api/subcategories/1.5",
        "/api/subcategories/by-category/food",
        "/api/expenses/latest",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, body) = send(&app, "DELETE", "/api/expenses/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn reference_errors_are_bad_requests() {
    let (app, _pool) = setup().await;
    let (category_id, sub_category_id) = create_food_and_groceries(&app).await;

    let (status, body) = send(&app, "POST", "/api/expenses", Some(expense_body(category_id + 50, sub_category_id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Invalid CategoryId. Category does not exist.");

    let (_, other) = send(
        &app,
        "POST",
        "/api/categories",
        Some(json!({ "name": "Transportation", "description": "Car and gas" })),
    )
    .await;
    let other_id = other["id"].as_i64().unwrap();

    let (status, body) = send(&app, "POST", "/api/expenses", Some(expense_body(other_id, sub_category_id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid SubCategoryId or SubCategory does not belong to the specified Category."
    );
}

#[tokio::test]
async fn structural_and_payload_errors_are_bad_requests() {
    let (app, _pool) = setup().await;

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!({ "name": "", "description": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("The Name field is required."));

    let (status, body) = send(&app, "POST", "/api/categories", Some(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn delete_category_is_restricted_then_cascades() {
    let (app, _pool) = setup().await;
    let (category_id, sub_category_id) = create_food_and_groceries(&app).await;
    let (_, expense) = send(&app, "POST", "/api/expenses", Some(expense_body(category_id, sub_category_id))).await;
    let expense_id = expense["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = send(&app, "DELETE", &format!("/api/expenses/{}", expense_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/subcategories/{}", sub_category_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_row_version_is_a_conflict() {
    let (app, _pool) = setup().await;
    let (category_id, _) = create_food_and_groceries(&app).await;
    let uri = format!("/api/categories/{}", category_id);

    let first = json!({ "name": "Food", "description": "first", "rowVersion": 1 });
    let second = json!({ "name": "Dining", "description": "second", "rowVersion": 1 });

    let (status, _) = send(&app, "PUT", &uri, Some(first)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "PUT", &uri, Some(second)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("refresh and try again"));

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Food");
    assert_eq!(body["rowVersion"], 2);

    let (status, _) = send(&app, "PUT", "/api/categories/999", Some(json!({ "name": "a", "description": "b" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn diagnostics_on_seeded_store() {
    let (app, pool) = setup().await;
    seed::seed_database(&pool).await.unwrap();

    let (status, body) = send(&app, "GET", "/api/expenses/diagnostics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCategories"], 3);
    assert_eq!(body["totalSubCategories"], 4);
    assert_eq!(body["totalExpenses"], 3);
    assert_eq!(body["hasOrphanedData"], false);
    assert_eq!(body["orphanedExpenses"], json!([]));
}
