mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{ADMIN_USERNAME, spawn_app};
use florist_server::db::services;
use florist_server::services::color_scheme::COLOR_SCHEME_SETTING_KEY;

#[tokio::test]
async fn palettes_are_listed_publicly() {
    let app = spawn_app().await;

    let (status, schemes) = app.get("/api/settings/color-schemes").await;
    assert_eq!(status, StatusCode::OK);
    let schemes = schemes.as_array().unwrap();
    assert_eq!(schemes.len(), 5);
    assert!(schemes.iter().all(|s| s["colors"]["primary"].is_string()));

    let (status, active) = app.get("/api/settings/color-scheme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["name"], "classic");
}

#[tokio::test]
async fn selecting_a_palette_persists_and_echoes_it() {
    let app = spawn_app().await;

    let (status, body) = app
        .admin_put("/api/settings/color-scheme", json!({ "name": "lavender" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "lavender");
    assert_eq!(body["colors"]["primary"], "#7e57c2");

    let (_, active) = app.get("/api/settings/color-scheme").await;
    assert_eq!(active["name"], "lavender");

    let stored = services::get_site_setting(&app.db, COLOR_SCHEME_SETTING_KEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, "lavender");
    assert_eq!(stored.updated_by.as_deref(), Some(ADMIN_USERNAME));
}

#[tokio::test]
async fn unknown_palette_is_rejected_and_setting_kept() {
    let app = spawn_app().await;
    app.admin_put("/api/settings/color-scheme", json!({ "name": "mint" }))
        .await;

    let (status, body) = app
        .admin_put("/api/settings/color-scheme", json!({ "name": "neon" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let stored = services::get_site_setting(&app.db, COLOR_SCHEME_SETTING_KEY)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.value, "mint");
}

#[tokio::test]
async fn changing_palette_requires_admin() {
    let app = spawn_app().await;
    let (status, _) = app
        .request(
            axum::http::Method::PUT,
            "/api/settings/color-scheme",
            None,
            Some(json!({ "name": "mint" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn site_settings_upsert_keeps_description() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/site-settings").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, saved) = app
        .admin_put(
            "/api/site-settings/deliveryFee",
            json!({ "value": "300", "description": "Стоимость доставки, руб." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["updatedBy"], ADMIN_USERNAME);

    let (_, saved) = app
        .admin_put("/api/site-settings/deliveryFee", json!({ "value": "350" }))
        .await;
    assert_eq!(saved["value"], "350");
    assert_eq!(saved["description"], "Стоимость доставки, руб.");

    let (_, all) = app.admin_get("/api/site-settings").await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    assert_eq!(
        app.admin_delete("/api/site-settings/deliveryFee").await,
        StatusCode::NO_CONTENT
    );
    let (status, _) = app.admin_get("/api/site-settings/deliveryFee").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
