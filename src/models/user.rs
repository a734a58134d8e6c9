//! # User Types
//!
//! This module defines the account row type and the UserRole enum that
//! corresponds to the PostgreSQL `user_role` enum type in the database.
//! Using a Rust enum instead of text conversion provides compile-time
//! type safety for the role checks scattered across the handlers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Represents the possible roles for a user in the system.
///
/// This enum corresponds directly to the PostgreSQL `user_role` enum type
/// defined in the database migrations. Permission checks branch on it
/// explicitly per operation:
///
/// - `Customer` - books providers, may cancel own bookings, reviews completed ones
/// - `Provider` - owns at most one service profile, completes or cancels its bookings
/// - `Admin` - verifies providers and reads analytics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Provider,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role_str = match self {
            UserRole::Customer => "customer",
            UserRole::Provider => "provider",
            UserRole::Admin => "admin",
        };
        write!(f, "{role_str}")
    }
}

/// A full row from the `users` table.
///
/// The password hash is carried for credential checks but never serialized
/// into a response body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Public slice of a user, embedded in provider listings.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
