mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use common::spawn_app;
use florist_server::db::entities::callback_request;

fn callback(phone: &str) -> serde_json::Value {
    json!({
        "name": "Анна",
        "phone": phone,
        "message": "Хочу заказать букет маме на 8 марта",
        "callTime": "после 18:00",
    })
}

#[tokio::test]
async fn visitor_can_request_a_callback() {
    let app = spawn_app().await;

    let (status, created) = app
        .post("/api/callback-requests", callback("+7 999 123-45-67"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["callTime"], "после 18:00");

    // listing stays admin-only
    let (status, _) = app.get("/api/callback-requests").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, list) = app.admin_get("/api/callback-requests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_pending_phone_is_rejected_without_insert() {
    let app = spawn_app().await;

    let (_, first) = app
        .post("/api/callback-requests", callback("+7 999 123-45-67"))
        .await;

    let (status, body) = app
        .post("/api/callback-requests", callback("+7 999 123-45-67"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["existingRequestId"], first["id"]);
    assert_eq!(body["details"]["status"], "pending");

    let rows = callback_request::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn contacted_requests_still_block_but_completed_do_not() {
    let app = spawn_app().await;
    let phone = "+7 911 000-11-22";

    let (_, first) = app.post("/api/callback-requests", callback(phone)).await;
    let uri = format!("/api/callback-requests/{}", first["id"]);

    let (status, updated) = app.admin_patch(&uri, json!({ "status": "contacted" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "contacted");
    let (status, body) = app.post("/api/callback-requests", callback(phone)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["status"], "contacted");

    app.admin_patch(&uri, json!({ "status": "completed" })).await;
    let (status, _) = app.post("/api/callback-requests", callback(phone)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, pending) = app.admin_get("/api/callback-requests?status=pending").await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    let (_, completed) = app.admin_get("/api/callback-requests?status=completed").await;
    assert_eq!(completed[0]["id"], first["id"]);
}

#[tokio::test]
async fn callback_phone_is_validated() {
    let app = spawn_app().await;
    let (status, body) = app.post("/api/callback-requests", callback("123")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["phone"].is_array());
}

#[tokio::test]
async fn missing_callback_request_is_not_found() {
    let app = spawn_app().await;
    let (status, _) = app
        .admin_patch("/api/callback-requests/42", json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.admin_delete("/api/callback-requests/42").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_crud_and_search() {
    let app = spawn_app().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/customers",
            None,
            Some(json!({ "name": "Ольга", "phone": "+79990000001" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, olga) = app
        .admin_post("/api/customers", json!({ "name": "Ольга", "phone": "+79990000001" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(olga["loyaltyLevel"], "bronze");
    assert_eq!(olga["totalOrders"], 0);

    app.admin_post(
        "/api/customers",
        json!({ "name": "Мария", "phone": "+79990000002", "loyaltyLevel": "gold", "totalOrders": 12 }),
    )
    .await;

    let (_, all) = app.admin_get("/api/customers").await;
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Мария", "Ольга"]);

    let (_, gold) = app.admin_get("/api/customers?loyaltyLevel=gold").await;
    assert_eq!(gold.as_array().unwrap().len(), 1);
    assert_eq!(gold[0]["name"], "Мария");

    let (_, by_phone) = app.admin_get("/api/customers?search=0001").await;
    assert_eq!(by_phone.as_array().unwrap().len(), 1);
    assert_eq!(by_phone[0]["name"], "Ольга");

    let uri = format!("/api/customers/{}", olga["id"]);
    let (status, updated) = app
        .admin_put(&uri, json!({ "loyaltyLevel": "silver", "notes": "Любит пионы" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["loyaltyLevel"], "silver");
    assert_eq!(updated["phone"], "+79990000001");

    assert_eq!(app.admin_delete(&uri).await, StatusCode::NO_CONTENT);
    let (status, _) = app.admin_get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_phone_must_be_unique() {
    let app = spawn_app().await;

    let (_, first) = app
        .admin_post("/api/customers", json!({ "name": "Ольга", "phone": "+79990000001" }))
        .await;
    let (_, second) = app
        .admin_post("/api/customers", json!({ "name": "Мария", "phone": "+79990000002" }))
        .await;

    let (status, body) = app
        .admin_post("/api/customers", json!({ "name": "Дубль", "phone": "+79990000001" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, _) = app
        .admin_patch(
            &format!("/api/customers/{}", second["id"]),
            json!({ "phone": "+79990000001" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // keeping one's own phone is not a conflict
    let (status, _) = app
        .admin_patch(
            &format!("/api/customers/{}", first["id"]),
            json!({ "phone": "+79990000001", "totalOrders": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
