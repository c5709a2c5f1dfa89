//! Integration tests for the expression, category and stats endpoints.

mod common;

use axum::http::StatusCode;
use common::{create_test_app, create_test_app_with_client, request_json, FakeTextGen};
use serde_json::json;

#[tokio::test]
async fn test_create_and_list_expressions() {
    let (app, _dir) = create_test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({"text": "break a leg"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["text"], "break a leg");
    assert_eq!(body["data"]["total_count"], 0);

    let (status, body) = request_json(&app, "GET", "/api/expressions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_expression_rejects_empty_text() {
    let (app, _dir) = create_test_app();

    let (status, body) =
        request_json(&app, "POST", "/api/expressions", Some(json!({"text": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_create_expression_with_unknown_category() {
    let (app, _dir) = create_test_app();

    let (status, body) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({
            "text": "bon voyage",
            "category_id": "00000000-0000-0000-0000-000000000001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_and_delete_expression() {
    let (app, _dir) = create_test_app();

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({"text": "call it a day"})),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(&app, "GET", &format!("/api/expressions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "call it a day");

    let (status, body) =
        request_json(&app, "DELETE", &format!("/api/expressions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = request_json(&app, "GET", &format!("/api/expressions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attempt_increments_counters() {
    let (app, _dir) = create_test_app();

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({"text": "break a leg"})),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = request_json(
        &app,
        "POST",
        &format!("/api/expressions/{}/attempt", id),
        Some(json!({"correct": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_count"], 1);
    assert_eq!(body["data"]["correct_count"], 1);
    assert!(!body["data"]["last_used"].is_null());

    let (_, body) = request_json(
        &app,
        "POST",
        &format!("/api/expressions/{}/attempt", id),
        Some(json!({"correct": false})),
    )
    .await;
    assert_eq!(body["data"]["total_count"], 2);
    assert_eq!(body["data"]["correct_count"], 1);
}

#[tokio::test]
async fn test_search_ranks_by_similarity() {
    let (app, _dir) = create_test_app();

    for text in ["I would like to order", "thank you very much", "break a leg"] {
        request_json(&app, "POST", "/api/expressions", Some(json!({"text": text}))).await;
    }

    let (status, body) =
        request_json(&app, "GET", "/api/expressions/search?q=order&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["text"], "I would like to order");
    assert_eq!(results[0]["score"], 0.2);
}

#[tokio::test]
async fn test_search_rejects_empty_query() {
    let (app, _dir) = create_test_app();

    let (status, body) = request_json(&app, "GET", "/api/expressions/search?q=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_delete_category_reassigns_expressions() {
    let (app, _dir) = create_test_app();

    let (_, category) = request_json(
        &app,
        "POST",
        "/api/categories",
        Some(json!({"name": "Travel", "icon": "plane", "color": "#0ea5e9"})),
    )
    .await;
    let category_id = category["data"]["id"].as_str().unwrap().to_string();

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({"text": "bon voyage", "category_id": category_id})),
    )
    .await;
    let expression_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) =
        request_json(&app, "DELETE", &format!("/api/categories/{}", category_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // The expression survives, uncategorized.
    let (status, body) =
        request_json(&app, "GET", &format!("/api/expressions/{}", expression_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["category_id"].is_null());

    let (_, body) = request_json(&app, "GET", "/api/categories", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_unknown_category_is_not_found() {
    let (app, _dir) = create_test_app();

    let (status, _) = request_json(
        &app,
        "DELETE",
        "/api/categories/00000000-0000-0000-0000-000000000001",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_reports_counts_and_badges() {
    // The grader always answers with the sentinel, so every evaluation
    // lands as correct.
    let (app, _dir) = create_test_app_with_client(FakeTextGen {
        grade: Some("Correct!".to_string()),
        ..Default::default()
    });

    let (_, created) = request_json(
        &app,
        "POST",
        "/api/expressions",
        Some(json!({"text": "break a leg"})),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    request_json(
        &app,
        "POST",
        "/api/chat/evaluate",
        Some(json!({"user_response": "break a leg", "expression_id": id})),
    )
    .await;

    let (status, body) = request_json(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["expression_count"], 1);
    assert_eq!(body["data"]["total_attempts"], 1);
    assert_eq!(body["data"]["correct_attempts"], 1);
    assert_eq!(body["data"]["accuracy"], 1.0);

    let achievements = body["data"]["achievements"].as_array().unwrap();
    let first_steps = achievements
        .iter()
        .find(|a| a["code"] == "first_steps")
        .unwrap();
    assert_eq!(first_steps["earned"], true);
    let collector = achievements
        .iter()
        .find(|a| a["code"] == "collector")
        .unwrap();
    assert_eq!(collector["earned"], false);
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = create_test_app();

    let (status, body) = request_json(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
