//! # Admin Handlers
//!
//! Provider verification and the booking analytics report. Every route here
//! sits behind both the auth middleware and the admin role gate. Rejecting a
//! provider changes nothing on the profile itself; the audit log row is the
//! only evidence the decision happened.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{AppState, PROVIDER_WITH_USER_COLUMNS, ProviderResponse, ProviderRow};
use crate::utils::constant::ANALYTICS_TOP_LIMIT;

/// Query parameter for the verification decision
#[derive(Debug, Deserialize)]
pub struct VerifyProviderQuery {
    pub approve: bool,
}

/// Response for the verification endpoint
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One row of the analytics report, keyed by the raw services string
#[derive(Debug, Serialize)]
pub struct ServiceBookingCount {
    pub services: String,
    pub count: i64,
}

/// One row of the analytics report, keyed by postal code
#[derive(Debug, Serialize)]
pub struct LocationBookingCount {
    pub pincode: String,
    pub count: i64,
}

/// Booking analytics grouped by service string and by location
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub top_services: Vec<ServiceBookingCount>,
    pub popular_locations: Vec<LocationBookingCount>,
}

/// Lists provider profiles still awaiting verification.
///
/// GET /admin/unverified-providers
///
/// # Returns
///
/// - `200 OK` with the unverified providers, owning users embedded
/// - `403 Forbidden` - Caller is not an admin
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn list_unverified_providers(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<ProviderResponse>>> {
    debug!("Listing unverified providers");

    let sql = format!(
        r#"
        SELECT {PROVIDER_WITH_USER_COLUMNS}
        FROM service_providers p
        JOIN users u ON p.user_id = u.id
        WHERE p.verified = FALSE
        "#
    );

    let rows = sqlx::query_as::<_, ProviderRow>(&sql)
        .fetch_all(&state.db_pool)
        .await?;

    Ok(Json(rows.into_iter().map(ProviderResponse::from).collect()))
}

/// Approves or rejects a provider profile.
///
/// POST /admin/verify-provider/{id}?approve=true|false
///
/// Approval flips the verified flag; rejection leaves it false. Either way
/// an audit log entry is appended in the same transaction, so a decision is
/// never recorded without its effect (or vice versa).
///
/// # Returns
///
/// - `200 OK` with a message describing the action taken
/// - `403 Forbidden` - Caller is not an admin
/// - `404 Not Found` - Provider does not exist
#[instrument(
    skip_all,
    fields(
        admin_id = %admin.0.id,
        provider_id = %provider_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn verify_provider(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<VerifyProviderQuery>,
) -> AppResult<Json<MessageResponse>> {
    let CurrentUser(admin) = admin;
    debug!(approve = query.approve, "Processing provider verification");

    let provider_user_id =
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM service_providers WHERE id = $1")
            .bind(provider_id)
            .fetch_optional(&state.db_pool)
            .await?
            .ok_or(AppError::NotFound("Provider not found"))?;

    let mut tx = state.db_pool.begin().await?;

    let action = if query.approve {
        sqlx::query("UPDATE service_providers SET verified = TRUE WHERE id = $1")
            .bind(provider_id)
            .execute(&mut *tx)
            .await?;
        format!("Approved provider {provider_id}")
    } else {
        // No rejected flag exists; the log entry below is the only record.
        format!("Rejected provider {provider_id}")
    };

    sqlx::query("INSERT INTO admin_logs (action, target_user_id, admin_id) VALUES ($1, $2, $3)")
        .bind(&action)
        .bind(provider_user_id)
        .bind(admin.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(%action, "Provider verification recorded");
    Ok(Json(MessageResponse { message: action }))
}

/// Aggregates booking counts by service string and by postal code.
///
/// GET /admin/analytics
///
/// Groups by the raw services string, not individual category tokens, so
/// "Plumbing, Electrical" counts as one bucket.
///
/// # Returns
///
/// - `200 OK` with [`AnalyticsResponse`] (top 5 of each group)
/// - `403 Forbidden` - Caller is not an admin
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<AnalyticsResponse>> {
    debug!("Computing booking analytics");

    let top_services = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT p.services, COUNT(b.id)
        FROM service_providers p
        JOIN bookings b ON b.provider_id = p.id
        GROUP BY p.services
        ORDER BY COUNT(b.id) DESC
        LIMIT $1
        "#,
    )
    .bind(ANALYTICS_TOP_LIMIT)
    .fetch_all(&state.db_pool)
    .await?;

    let popular_locations = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT p.location_pincode, COUNT(b.id)
        FROM service_providers p
        JOIN bookings b ON b.provider_id = p.id
        GROUP BY p.location_pincode
        ORDER BY COUNT(b.id) DESC
        LIMIT $1
        "#,
    )
    .bind(ANALYTICS_TOP_LIMIT)
    .fetch_all(&state.db_pool)
    .await?;

    if top_services.is_empty() {
        warn!("Analytics requested with no bookings recorded");
    }

    Ok(Json(AnalyticsResponse {
        top_services: top_services
            .into_iter()
            .map(|(services, count)| ServiceBookingCount { services, count })
            .collect(),
        popular_locations: popular_locations
            .into_iter()
            .map(|(pincode, count)| LocationBookingCount { pincode, count })
            .collect(),
    }))
}
