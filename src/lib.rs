//! # Fixly - Local Services Marketplace Backend
//!
//! Matches customers with local service providers (plumbers, electricians,
//! and the like): registration, provider discovery, the booking lifecycle,
//! reviews, and admin verification with booking analytics.
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for various endpoints
//! - [`middleware`] - Authentication middleware and the admin role gate
//! - [`models`] - Database row types, enums, and shared application state
//! - [`services`] - Business logic services (JWT, password hashing)
//! - [`utils`] - Utility constants and validators

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::env;
use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::handlers::{
    create_booking, get_analytics, get_me, get_provider, health_check, list_provider_reviews,
    list_providers, list_unverified_providers, login, my_bookings, post_review, register,
    register_provider, update_booking_status, verify_provider,
};
use crate::middleware::{auth_middleware, require_admin};
use crate::models::AppState;
use crate::services::jwt::JwtService;

/// Creates the Axum router with application routes and state.
///
/// # Arguments
///
/// * `db_pool` - PostgreSQL database connection pool
///
/// # Environment Variables
///
/// - `JWT_SECRET` - Required for JWT token signing and validation
///
/// # Returns
///
/// A configured Axum router with all application routes and middleware
pub fn app(db_pool: PgPool) -> Router {
    let jwt_secret = env::var("JWT_SECRET")
        .expect("Env variable `JWT_SECRET` should be set")
        .into_bytes();

    let jwt_service = JwtService::new(
        EncodingKey::from_secret(&jwt_secret),
        DecodingKey::from_secret(&jwt_secret),
    );

    let state = Arc::new(AppState::new(db_pool, jwt_service));

    let public_routes = Router::new()
        .route("/health-check", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/providers", get(list_providers))
        .route("/providers/{id}", get(get_provider))
        .route("/reviews/provider/{id}", get(list_provider_reviews));

    let protected_routes = Router::new()
        .route("/users/me", get(get_me))
        .route("/providers/register", post(register_provider))
        .route("/bookings", post(create_booking))
        .route("/bookings/my-bookings", get(my_bookings))
        .route("/bookings/{id}/status", patch(update_booking_status))
        .route("/reviews", post(post_review))
        .route_layer(from_fn_with_state(Arc::clone(&state), auth_middleware));

    // require_admin runs inside auth_middleware: layers added later wrap
    // the ones added earlier.
    let admin_routes = Router::new()
        .route("/admin/unverified-providers", get(list_unverified_providers))
        .route("/admin/verify-provider/{id}", post(verify_provider))
        .route("/admin/analytics", get(get_analytics))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(Arc::clone(&state), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
