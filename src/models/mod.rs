mod admin_log;
mod booking;
mod provider;
mod review;
mod state;
mod user;

pub use admin_log::AdminLog;
pub use booking::{Booking, BookingStatus};
pub use provider::{PROVIDER_WITH_USER_COLUMNS, ProviderResponse, ProviderRow, ServiceProvider};
pub use review::Review;
pub use state::AppState;
pub use user::{User, UserRole, UserSummary};
