pub mod auth;

pub use auth::{CurrentUser, auth_middleware, require_admin};
