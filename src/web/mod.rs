use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::chatbot::provider::ChatProvider;
use crate::server::config::ServerConfig;
use crate::services::auth_service;
use crate::web::{
    error::AppError, extract::ValidatedJson, middleware::auth, models::LoginRequest, routes::*,
};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub chat_provider: Arc<dyn ChatProvider>,
    pub config: Arc<ServerConfig>,
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login_user(&app_state.db_pool, payload, &app_state.config.jwt_secret).await?;
    info!(user_id = login_response.user_id, "Admin logged in.");

    let auth_cookie = Cookie::build(("token", login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    let cookie_value = HeaderValue::from_str(&auth_cookie.to_string())
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie header: {e}")))?;

    let mut response = axum::Json(login_response).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie_value);
    Ok(response)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

fn create_cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT_LANGUAGE])
            .allow_credentials(true),
        Some(Err(e)) => {
            warn!(error = %e, "FRONTEND_URL is not a valid origin, allowing any origin.");
            cors.allow_origin(Any).allow_headers(Any)
        }
        None => cors.allow_origin(Any).allow_headers(Any),
    }
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let auth_layer = || axum_middleware::from_fn_with_state(app_state.clone(), auth::auth);

    let router = Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/auth/login", post(login_handler))
        .route(
            "/api/auth/me",
            get(auth_service::me).route_layer(auth_layer()),
        )
        .nest(
            "/api/sections",
            section_routes::create_public_router()
                .merge(section_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/blog-posts",
            blog_routes::create_public_router()
                .merge(blog_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/portfolio",
            portfolio_routes::create_public_router()
                .merge(portfolio_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/customers",
            customer_routes::create_customers_router().route_layer(auth_layer()),
        )
        .nest(
            "/api/loyalty-programs",
            loyalty_routes::create_public_router()
                .merge(loyalty_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/callback-requests",
            callback_routes::create_public_router()
                .merge(callback_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/contact-info",
            contact_routes::create_public_router()
                .merge(contact_routes::create_admin_router().route_layer(auth_layer())),
        )
        .nest(
            "/api/site-settings",
            settings_routes::create_site_settings_router().route_layer(auth_layer()),
        )
        .nest(
            "/api/settings",
            settings_routes::create_public_color_scheme_router().merge(
                settings_routes::create_admin_color_scheme_router().route_layer(auth_layer()),
            ),
        )
        .nest("/api/chatbot", chatbot_routes::create_chatbot_router());

    let router = match app_state.config.static_dir.as_deref() {
        Some(dir) => {
            info!(static_dir = dir, "Serving frontend bundle.");
            let index = std::path::Path::new(dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)))
        }
        None => router,
    };

    router
        .with_state(app_state.clone())
        .layer(axum_middleware::from_fn(middleware::i18n::i18n_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(app_state.config.frontend_url.as_deref()))
}
