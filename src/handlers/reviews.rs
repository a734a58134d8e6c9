//! # Review Handlers
//!
//! One review per completed booking, posted by the customer who made it.
//! Inserting the review and refreshing the provider's average rating happen
//! in a single transaction; the UPDATE takes the provider row lock, which
//! serializes concurrent reviews for the same provider.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{AppState, Booking, BookingStatus, Review};

/// Request payload for posting a review
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Posts a review for a completed booking and refreshes the provider's
/// average rating.
///
/// POST /reviews
///
/// # Returns
///
/// - `200 OK` with the created review
/// - `400 Bad Request` - Rating out of 1..=5, or booking not completed
/// - `403 Forbidden` - Caller is not the booking's customer
/// - `404 Not Found` - Booking does not exist
/// - `409 Conflict` - Booking already has a review
#[instrument(skip_all, fields(user_id = %user.0.id, request_id = %uuid::Uuid::new_v4()))]
pub async fn post_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<Review>> {
    let CurrentUser(user) = user;
    debug!(booking_id = %payload.booking_id, "Processing review submission");

    if payload.validate().is_err() {
        warn!("Invalid review payload");
        return Err(AppError::BadRequest("Rating must be between 1 and 5"));
    }

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, user_id, provider_id, status, date_time, created_at
        FROM bookings WHERE id = $1
        "#,
    )
    .bind(payload.booking_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or(AppError::NotFound("Booking not found"))?;

    if booking.user_id != user.id {
        warn!("Review attempted by someone other than the booking customer");
        return Err(AppError::Forbidden(
            "Only the customer who booked can leave a review",
        ));
    }

    if booking.status != BookingStatus::Completed {
        warn!(status = %booking.status, "Review attempted on non-completed booking");
        return Err(AppError::BadRequest(
            "Reviews can only be left for completed bookings",
        ));
    }

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM reviews WHERE booking_id = $1")
        .bind(booking.id)
        .fetch_optional(&state.db_pool)
        .await?;
    if existing.is_some() {
        warn!("Duplicate review rejected");
        return Err(AppError::Conflict("Review already exists for this booking"));
    }

    let mut tx = state.db_pool.begin().await?;

    let insert = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (booking_id, rating, comment)
        VALUES ($1, $2, $3)
        RETURNING id, booking_id, rating, comment, created_at
        "#,
    )
    .bind(booking.id)
    .bind(payload.rating)
    .bind(&payload.comment)
    .fetch_one(&mut *tx)
    .await;

    let review = match insert {
        Ok(review) => review,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("Duplicate review rejected (unique violation)");
            return Err(AppError::Conflict("Review already exists for this booking"));
        }
        Err(e) => return Err(e.into()),
    };

    // Recompute the mean in the store rather than in application code; the
    // row lock on the provider closes the lost-update window between two
    // concurrent reviews.
    sqlx::query(
        r#"
        UPDATE service_providers
        SET rating_avg = (
            SELECT AVG(r.rating)::double precision
            FROM reviews r
            JOIN bookings b ON r.booking_id = b.id
            WHERE b.provider_id = $1
        )
        WHERE id = $1
        "#,
    )
    .bind(booking.provider_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(review_id = %review.id, provider_id = %booking.provider_id, "Review posted");
    Ok(Json(review))
}

/// Lists all reviews left for a provider's bookings, unordered.
///
/// GET /reviews/provider/{id}
///
/// # Returns
///
/// - `200 OK` with the review list (empty for unknown providers)
#[instrument(skip_all, fields(provider_id = %provider_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn list_provider_reviews(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    debug!("Listing provider reviews");

    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT r.id, r.booking_id, r.rating, r.comment, r.created_at
        FROM reviews r
        JOIN bookings b ON r.booking_id = b.id
        WHERE b.provider_id = $1
        "#,
    )
    .bind(provider_id)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(reviews))
}
