//! # Application Constants
//!
//! This module defines configuration constants used throughout the Fixly
//! application.

use std::time::Duration;

/// Expiration time for JWT access tokens
///
/// There is no refresh flow; clients re-authenticate when this lapses.
pub const ACCESS_TOKEN_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// Number of entries returned per group in the admin analytics report
pub const ANALYTICS_TOP_LIMIT: i64 = 5;
