//! # Authentication Handlers
//!
//! This module implements HTTP handlers for account registration and login.
//! Registration stores an Argon2 hash of the password, never the plaintext.
//! Login verifies credentials and issues a signed access token whose subject
//! is the user's email; the role rides along for client convenience.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use crate::utils::validator::EMAIL_REGEX;

/// Request payload for creating an account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(regex(path = "*EMAIL_REGEX"))]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Request payload for logging in. Field names follow the OAuth2 password
/// form convention: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing the access token after successful authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: UserRole,
}

/// Registers a new user account.
///
/// POST /auth/register
///
/// # Returns
///
/// - `200 OK` with the created user (password hash omitted)
/// - `400 Bad Request` - Malformed email, short password
/// - `409 Conflict` - Email already registered
/// - `500 Internal Server Error` - Database or hashing failure
#[instrument(
    skip_all,
    fields(
        email = %payload.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<User>> {
    debug!("Processing registration request");

    if payload.validate().is_err() {
        warn!("Invalid registration payload");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let existing = sqlx::query_scalar::<_, uuid::Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db_pool)
        .await?;
    if existing.is_some() {
        warn!("Email already registered");
        return Err(AppError::Conflict("Email already registered"));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        AppError::Internal
    })?;

    let insert = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, role, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(payload.role)
    .fetch_one(&state.db_pool)
    .await;

    let user = match insert {
        Ok(user) => user,
        // Lost the race against a concurrent registration for the same email
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("Email already registered (unique violation)");
            return Err(AppError::Conflict("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(Json(user))
}

/// Verifies credentials and issues an access token.
///
/// POST /auth/login (form-encoded: username=email, password)
///
/// Unknown email and wrong password produce the same response so the
/// endpoint does not leak which emails exist.
///
/// # Returns
///
/// - `200 OK` with [`TokenResponse`]
/// - `401 Unauthorized` - Unknown email or password mismatch
/// - `500 Internal Server Error` - Database or token failure
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    debug!("Processing login request");

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&state.db_pool)
    .await?;

    let Some(user) = user else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized("Incorrect email or password"));
    };

    let matches = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "Password verification failed");
        AppError::Internal
    })?;
    if !matches {
        warn!(user_id = %user.id, "Password mismatch");
        return Err(AppError::Unauthorized("Incorrect email or password"));
    }

    let access_token = state
        .jwt_service
        .issue_access_token(&user.email, user.role)
        .map_err(|e| {
            error!(error = %e, "Failed to issue access token");
            AppError::Internal
        })?;

    info!(user_id = %user.id, "Login successful");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        role: user.role,
    }))
}
