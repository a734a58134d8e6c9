//! # Provider Directory Handlers
//!
//! Provider profile registration (for users carrying the provider role) and
//! the public discovery endpoints. Category filtering is a case-insensitive
//! substring match against the raw services string; there is no category
//! taxonomy, so whatever the provider typed is what gets matched.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{
    AppState, PROVIDER_WITH_USER_COLUMNS, ProviderResponse, ProviderRow, ServiceProvider, UserRole,
    UserSummary,
};
use crate::utils::validator::PINCODE_REGEX;

/// Request payload for registering a provider profile
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterProviderRequest {
    #[validate(length(min = 1, max = 500))]
    pub services: String,
    #[validate(range(min = 0, max = 80))]
    pub experience: i32,
    #[validate(length(min = 1, max = 500))]
    pub contact_info: String,
    #[validate(regex(path = "*PINCODE_REGEX"))]
    pub location_pincode: String,
    pub profile_picture: Option<String>,
}

/// Sort key for provider listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Rating,
    Experience,
}

/// Query parameters for the provider listing
#[derive(Debug, Deserialize)]
pub struct ListProvidersQuery {
    pub category: Option<String>,
    pub pincode: Option<String>,
    #[serde(default = "default_verified_only")]
    pub verified_only: bool,
    #[serde(default)]
    pub sort_by: SortBy,
}

fn default_verified_only() -> bool {
    true
}

/// Registers a provider profile for the authenticated user.
///
/// POST /providers/register
///
/// The profile starts unverified with a 0.0 rating; it only shows up in
/// default listings once an admin approves it.
///
/// # Returns
///
/// - `200 OK` with the created profile (owning user embedded)
/// - `400 Bad Request` - Invalid payload
/// - `403 Forbidden` - Caller does not have the provider role
/// - `409 Conflict` - A profile already exists for this user
#[instrument(skip_all, fields(user_id = %user.0.id, request_id = %uuid::Uuid::new_v4()))]
pub async fn register_provider(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RegisterProviderRequest>,
) -> AppResult<Json<ProviderResponse>> {
    let CurrentUser(user) = user;
    debug!("Processing provider registration");

    if user.role != UserRole::Provider {
        warn!(role = %user.role, "Non-provider attempted profile registration");
        return Err(AppError::Forbidden(
            "Only users with the provider role can register a service profile",
        ));
    }

    if payload.validate().is_err() {
        warn!("Invalid provider registration payload");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let existing =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM service_providers WHERE user_id = $1")
            .bind(user.id)
            .fetch_optional(&state.db_pool)
            .await?;
    if existing.is_some() {
        warn!("Provider profile already exists");
        return Err(AppError::Conflict("Provider profile already exists"));
    }

    let row = sqlx::query_as::<_, ServiceProvider>(
        r#"
        INSERT INTO service_providers
            (user_id, services, experience, contact_info, location_pincode, profile_picture)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, services, experience, verified, contact_info,
                  profile_picture, location_pincode, rating_avg
        "#,
    )
    .bind(user.id)
    .bind(&payload.services)
    .bind(payload.experience)
    .bind(&payload.contact_info)
    .bind(&payload.location_pincode)
    .bind(&payload.profile_picture)
    .fetch_one(&state.db_pool)
    .await;

    let profile = match row {
        Ok(profile) => profile,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("Provider profile already exists (unique violation)");
            return Err(AppError::Conflict("Provider profile already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(provider_id = %profile.id, "Provider profile registered");
    Ok(Json(ProviderResponse {
        id: profile.id,
        user_id: profile.user_id,
        services: profile.services,
        experience: profile.experience,
        verified: profile.verified,
        contact_info: profile.contact_info,
        profile_picture: profile.profile_picture,
        location_pincode: profile.location_pincode,
        rating_avg: profile.rating_avg,
        user: UserSummary::from(&user),
    }))
}

/// Lists provider profiles with optional filters.
///
/// GET /providers ?category=&pincode=&verified_only=&sort_by=
///
/// Unverified providers are excluded unless `verified_only=false` is passed
/// explicitly. Sorting is descending by average rating (default) or years of
/// experience; ties keep whatever order the database returns.
///
/// # Returns
///
/// - `200 OK` with a list of providers, owning users embedded
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProvidersQuery>,
) -> AppResult<Json<Vec<ProviderResponse>>> {
    debug!(?query, "Listing providers");

    let order_by = match query.sort_by {
        SortBy::Rating => "p.rating_avg DESC",
        SortBy::Experience => "p.experience DESC",
    };
    let sql = format!(
        r#"
        SELECT {PROVIDER_WITH_USER_COLUMNS}
        FROM service_providers p
        JOIN users u ON p.user_id = u.id
        WHERE ($1::bool = FALSE OR p.verified = TRUE)
          AND ($2::text IS NULL OR p.location_pincode = $2)
          AND ($3::text IS NULL OR p.services ILIKE '%' || $3 || '%')
        ORDER BY {order_by}
        "#
    );

    let rows = sqlx::query_as::<_, ProviderRow>(&sql)
        .bind(query.verified_only)
        .bind(&query.pincode)
        .bind(&query.category)
        .fetch_all(&state.db_pool)
        .await?;

    Ok(Json(rows.into_iter().map(ProviderResponse::from).collect()))
}

/// Gets a single provider profile by id.
///
/// GET /providers/{id}
///
/// # Returns
///
/// - `200 OK` with the provider
/// - `404 Not Found` - No such provider
#[instrument(skip_all, fields(provider_id = %provider_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> AppResult<Json<ProviderResponse>> {
    let sql = format!(
        r#"
        SELECT {PROVIDER_WITH_USER_COLUMNS}
        FROM service_providers p
        JOIN users u ON p.user_id = u.id
        WHERE p.id = $1
        "#
    );

    let row = sqlx::query_as::<_, ProviderRow>(&sql)
        .bind(provider_id)
        .fetch_optional(&state.db_pool)
        .await?
        .ok_or(AppError::NotFound("Provider not found"))?;

    Ok(Json(ProviderResponse::from(row)))
}
