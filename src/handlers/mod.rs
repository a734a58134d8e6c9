//! # HTTP Request Handlers
//!
//! This module contains all HTTP request handlers for the Fixly application.
//! Each handler is responsible for processing specific HTTP requests and
//! returning appropriate responses.
//!
//! ## Available Handlers
//!
//! - **Authentication** (`auth`) - Registration, login and token issuance
//! - **Profile** (`profile`) - Current-user lookup
//! - **Providers** (`providers`) - Provider profile registration and discovery
//! - **Bookings** (`bookings`) - Booking creation and status transitions
//! - **Reviews** (`reviews`) - Reviews of completed bookings, rating upkeep
//! - **Admin** (`admin`) - Provider verification and analytics
//! - **Health Check** (`health_check`) - Application health monitoring

mod admin;
mod auth;
mod bookings;
mod health_check;
mod profile;
mod providers;
mod reviews;

pub use admin::*;
pub use auth::*;
pub use bookings::*;
pub use health_check::*;
pub use profile::*;
pub use providers::*;
pub use reviews::*;
