//! # Booking Lifecycle Handlers
//!
//! Creating bookings, listing the caller's bookings, and moving bookings
//! through the small state machine. Nothing prevents two customers from
//! booking the same provider at the same time; slot conflicts are the
//! provider's problem to sort out off-platform.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{AppState, Booking, BookingStatus, ServiceProvider, UserRole};

/// Request payload for creating a booking
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
}

/// Query parameter for status transitions
#[derive(Debug, Deserialize)]
pub struct UpdateStatusQuery {
    pub status: BookingStatus,
}

/// Creates a booking against a provider, in state `pending`.
///
/// POST /bookings
///
/// # Returns
///
/// - `200 OK` with the created booking
/// - `404 Not Found` - Provider does not exist
#[instrument(skip_all, fields(user_id = %user.0.id, request_id = %uuid::Uuid::new_v4()))]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<Booking>> {
    let CurrentUser(user) = user;
    debug!(provider_id = %payload.provider_id, "Processing booking creation");

    let provider_exists =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM service_providers WHERE id = $1")
            .bind(payload.provider_id)
            .fetch_optional(&state.db_pool)
            .await?;
    if provider_exists.is_none() {
        warn!("Booking attempted against missing provider");
        return Err(AppError::NotFound("Provider not found"));
    }

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (user_id, provider_id, date_time)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, provider_id, status, date_time, created_at
        "#,
    )
    .bind(user.id)
    .bind(payload.provider_id)
    .bind(payload.date_time)
    .fetch_one(&state.db_pool)
    .await?;

    info!(booking_id = %booking.id, "Booking created");
    Ok(Json(booking))
}

/// Lists the caller's bookings.
///
/// GET /bookings/my-bookings
///
/// Providers see the bookings made against their profile (an empty list if
/// they have not registered one yet); everyone else sees the bookings they
/// placed as a customer.
///
/// # Returns
///
/// - `200 OK` with the booking list
#[instrument(skip_all, fields(user_id = %user.0.id, request_id = %uuid::Uuid::new_v4()))]
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Booking>>> {
    let CurrentUser(user) = user;
    debug!("Listing caller's bookings");

    let bookings = if user.role == UserRole::Provider {
        let profile_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM service_providers WHERE user_id = $1")
                .bind(user.id)
                .fetch_optional(&state.db_pool)
                .await?;

        let Some(profile_id) = profile_id else {
            return Ok(Json(Vec::new()));
        };

        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, provider_id, status, date_time, created_at
            FROM bookings WHERE provider_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_all(&state.db_pool)
        .await?
    } else {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, user_id, provider_id, status, date_time, created_at
            FROM bookings WHERE user_id = $1
            "#,
        )
        .bind(user.id)
        .fetch_all(&state.db_pool)
        .await?
    };

    Ok(Json(bookings))
}

/// Transitions a booking's status.
///
/// PATCH /bookings/{id}/status?status=completed|cancelled
///
/// The booking's provider may mark it completed or cancelled; the booking's
/// customer may only cancel. Completed and cancelled are terminal, so a
/// second transition of any kind is rejected.
///
/// # Returns
///
/// - `200 OK` with the updated booking
/// - `400 Bad Request` - Target is `pending`, or the booking is already final
/// - `403 Forbidden` - Caller is neither this booking's provider nor customer,
///   or a customer tried to mark it completed
/// - `404 Not Found` - Booking does not exist
#[instrument(
    skip_all,
    fields(
        user_id = %user.0.id,
        booking_id = %booking_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<UpdateStatusQuery>,
) -> AppResult<Json<Booking>> {
    let CurrentUser(user) = user;
    let new_status = query.status;
    debug!(%new_status, "Processing booking status update");

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, user_id, provider_id, status, date_time, created_at
        FROM bookings WHERE id = $1
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or(AppError::NotFound("Booking not found"))?;

    let provider = sqlx::query_as::<_, ServiceProvider>(
        r#"
        SELECT id, user_id, services, experience, verified, contact_info,
               profile_picture, location_pincode, rating_avg
        FROM service_providers WHERE id = $1
        "#,
    )
    .bind(booking.provider_id)
    .fetch_one(&state.db_pool)
    .await?;

    let is_provider_side = provider.user_id == user.id;
    let is_customer_side = booking.user_id == user.id;
    if !is_provider_side && !is_customer_side {
        warn!("Status update by uninvolved user");
        return Err(AppError::Forbidden("Not authorized for this booking"));
    }
    // The customer may only cancel; completion is the provider's call.
    if !is_provider_side && new_status == BookingStatus::Completed {
        warn!("Customer attempted to mark booking completed");
        return Err(AppError::Forbidden(
            "Only the provider can mark a booking completed",
        ));
    }

    if new_status == BookingStatus::Pending {
        return Err(AppError::BadRequest(
            "A booking cannot be moved back to pending",
        ));
    }
    if booking.status.is_terminal() {
        warn!(current = %booking.status, "Transition out of terminal status rejected");
        return Err(AppError::BadRequest(
            "Booking is already completed or cancelled",
        ));
    }

    let updated = sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings SET status = $1 WHERE id = $2
        RETURNING id, user_id, provider_id, status, date_time, created_at
        "#,
    )
    .bind(new_status)
    .bind(booking_id)
    .fetch_one(&state.db_pool)
    .await?;

    info!(%new_status, "Booking status updated");
    Ok(Json(updated))
}
