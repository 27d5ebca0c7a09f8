//! Headless dashboard controllers.
//!
//! Each controller owns the fetched collections for the lifetime of a view
//! and drives the gate -> fetch -> mutate -> refresh flow. Rendering is
//! left to the embedding UI; the backend stays authoritative for all data.

pub mod admin;
pub mod student;

pub use admin::AdminDashboard;
pub use student::StudentDashboard;

use crate::services::auth::Screen;

/// Result of opening a role-gated view
pub enum Access<T> {
    /// The gate passed and the initial load completed
    Granted(T),
    /// Navigate elsewhere; nothing was fetched
    Redirect(Screen),
}

impl<T> Access<T> {
    /// The granted view, if access was granted
    pub fn granted(self) -> Option<T> {
        match self {
            Access::Granted(view) => Some(view),
            Access::Redirect(_) => None,
        }
    }
}
