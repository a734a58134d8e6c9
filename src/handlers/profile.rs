//! # Profile Handler

use axum::{Json, extract::Extension};
use tracing::{debug, instrument};

use crate::middleware::CurrentUser;
use crate::models::User;

/// Gets the authenticated user's account information.
///
/// GET /users/me
///
/// The auth middleware has already resolved the token subject to a fresh
/// user row, so this handler just serializes it (hash omitted).
///
/// # Returns
///
/// - `200 OK` with the current user
/// - `401 Unauthorized` - Missing or invalid authentication token
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    debug!("Returning current user profile");
    Json(user)
}
