//! # Admin Audit Log Types

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// An append-only audit record of an admin action. Rows are only ever
/// inserted, never updated; rejections of a provider leave no other trace.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminLog {
    pub id: Uuid,
    pub action: String,
    pub target_user_id: Option<Uuid>,
    pub admin_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
