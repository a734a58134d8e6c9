//! # Service Provider Types
//!
//! Row and response types for provider profiles. Listing endpoints embed the
//! owning user, so queries join `users` with aliased columns and the flat row
//! is folded into [`ProviderResponse`] before serialization.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::{UserRole, UserSummary};

/// A row from the `service_providers` table, without the owning user.
///
/// Used internally wherever only the profile itself matters (booking
/// ownership checks, rating updates).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub services: String,
    pub experience: i32,
    pub verified: bool,
    pub contact_info: String,
    pub profile_picture: Option<String>,
    pub location_pincode: String,
    pub rating_avg: f64,
}

/// Provider joined with its owning user, as fetched from the database.
#[derive(Debug, FromRow)]
pub struct ProviderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub services: String,
    pub experience: i32,
    pub verified: bool,
    pub contact_info: String,
    pub profile_picture: Option<String>,
    pub location_pincode: String,
    pub rating_avg: f64,
    pub user_name: String,
    pub user_email: String,
    pub user_role: UserRole,
}

/// API shape of a provider profile with the owning user embedded.
#[derive(Debug, Serialize)]
pub struct ProviderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub services: String,
    pub experience: i32,
    pub verified: bool,
    pub contact_info: String,
    pub profile_picture: Option<String>,
    pub location_pincode: String,
    pub rating_avg: f64,
    pub user: UserSummary,
}

impl From<ProviderRow> for ProviderResponse {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            services: row.services,
            experience: row.experience,
            verified: row.verified,
            contact_info: row.contact_info,
            profile_picture: row.profile_picture,
            location_pincode: row.location_pincode,
            rating_avg: row.rating_avg,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                role: row.user_role,
            },
        }
    }
}

/// Columns shared by every provider+user join in the crate.
pub const PROVIDER_WITH_USER_COLUMNS: &str = "p.id, p.user_id, p.services, p.experience, \
     p.verified, p.contact_info, p.profile_picture, p.location_pincode, p.rating_avg, \
     u.name AS user_name, u.email AS user_email, u.role AS user_role";
