//! # Authentication Middleware
//!
//! This module contains the authentication middleware that validates JWT
//! tokens, resolves the acting user from the database, and provides user
//! context to protected routes, plus the admin role gate layered on top of
//! it for the admin router.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, trace, warn};

use crate::error::AppError;
use crate::models::{AppState, User, UserRole};

/// Authentication middleware for protecting routes
///
/// This middleware validates JWT access tokens from the Authorization header
/// and loads the matching user row for use by downstream handlers.
///
/// # Authentication Flow
///
/// 1. Extracts `Authorization` header with `Bearer <token>` format
/// 2. Validates the JWT token signature and expiration
/// 3. Resolves the token subject (email) to a current user in the database
/// 4. Adds [`CurrentUser`] to request extensions for handler access
///
/// # Returns
///
/// - **Success**: Continues to next handler with user context
/// - **Failure**: Returns `401 Unauthorized` for missing/invalid tokens and
///   for tokens whose subject no longer exists
#[instrument(
    skip_all,
    fields(
        method = %req.method(),
        uri = %req.uri(),
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    trace!("Processing authentication middleware");

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let Some(auth_header) = auth_header else {
        warn!("Missing Authorization header");
        return Err(AppError::Unauthorized("Missing Authorization header"));
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        warn!("Invalid Authorization header format");
        return Err(AppError::Unauthorized("Invalid Authorization header"));
    };
    trace!("Extracted bearer token from Authorization header");

    let claims = state.jwt_service.validate_access_token(token).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        AppError::Unauthorized("Invalid or expired token")
    })?;

    // The subject may reference an account that has since been deleted;
    // a syntactically valid token is not enough on its own.
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
    )
    .bind(&claims.sub)
    .fetch_optional(&state.db_pool)
    .await?;

    let Some(user) = user else {
        warn!(subject = %claims.sub, "Token subject no longer exists");
        return Err(AppError::Unauthorized("User no longer exists"));
    };

    debug!(user_id = %user.id, role = %user.role, "Authentication successful");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Role gate for admin-only routes.
///
/// Must be layered inside [`auth_middleware`] so that [`CurrentUser`] is
/// already present in the request extensions.
#[instrument(skip_all)]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        warn!("Admin gate reached without authenticated user");
        return Err(AppError::Unauthorized("Missing Authorization header"));
    };

    if user.role != UserRole::Admin {
        warn!(user_id = %user.id, role = %user.role, "Admin access denied");
        return Err(AppError::Forbidden("Admin access required"));
    }

    Ok(next.run(req).await)
}

/// Authenticated user row available to handlers
///
/// This struct is inserted into request extensions by the authentication
/// middleware and can be extracted by route handlers that need user context.
///
/// # Usage in Handlers
///
/// ```rust
/// use axum::{extract::Extension, response::IntoResponse};
/// use fixly::middleware::CurrentUser;
/// async fn protected_handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
///     format!("Hello user: {}", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);
