use axum::Extension;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::db::entities::admin_user;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{AuthenticatedUser, Claims, LoginRequest, LoginResponse, UserResponse};

/// Lifetime of issued tokens.
pub const TOKEN_TTL_HOURS: i64 = 24;

pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let user = user_service::get_admin_by_username(pool, &req.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %req.username, "Login attempt for unknown admin.");
            AppError::InvalidCredentials
        })?;

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        warn!(username = %req.username, "Login attempt with a wrong password.");
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(
    user: &admin_user::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(format!("Failed to sign token: {e}")))?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        username: user.username.clone(),
    })
}

/// Creates the configured admin account when the database has none yet.
pub async fn bootstrap_admin(
    pool: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    if user_service::count_admins(pool).await? > 0 {
        return Ok(false);
    }

    let password_hash = hash(password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(format!("Failed to hash password: {e}")))?;
    let admin = user_service::create_admin(pool, username, &password_hash).await?;
    info!(admin_id = admin.id, username = %admin.username, "Created initial admin account.");
    Ok(true)
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<axum::Json<UserResponse>, AppError> {
    Ok(axum::Json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}
