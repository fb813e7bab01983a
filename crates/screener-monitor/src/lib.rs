//! Logging setup and the interactive results dashboard.

mod dashboard;
mod logging;

pub use dashboard::{Dashboard, DashboardState};
pub use logging::setup_logging;
