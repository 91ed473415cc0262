//! Request handlers for admin views.

mod list;
mod mutate;

pub use list::*;
pub use mutate::*;

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
