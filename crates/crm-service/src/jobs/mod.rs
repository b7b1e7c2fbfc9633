//! # Background Jobs
//!
//! Periodic maintenance passes over the CRM data. Each job is a plain
//! async function that takes the service it collaborates with and a
//! writable log sink; a scheduler (cron, systemd timer, or the `jobs`
//! binary) decides when to run them.
//!
//! ## Jobs and Cadence
//! ```text
//! ┌──────────────┬──────────────┬───────────────────────────────────────────┐
//! │ Job          │ Cadence      │ What it does                              │
//! ├──────────────┼──────────────┼───────────────────────────────────────────┤
//! │ heartbeat    │ every 5 min  │ Logs whether the backend answers          │
//! │ restock      │ every 12 h   │ Tops up low-stock products, logs each     │
//! │ report       │ weekly       │ Logs customer/order counts and revenue    │
//! │ retention    │ weekly       │ Deletes customers inactive for a year     │
//! │ reminders    │ daily        │ Logs orders from the last 7 days          │
//! └──────────────┴──────────────┴───────────────────────────────────────────┘
//! ```
//!
//! Jobs never hold private store access: everything they do goes through
//! the same mutation and query commands a transport would call.

pub mod heartbeat;
pub mod reminders;
pub mod report;
pub mod restock;
pub mod retention;

pub use heartbeat::log_heartbeat;
pub use reminders::send_order_reminders;
pub use report::generate_crm_report;
pub use restock::update_low_stock;
pub use retention::clean_inactive_customers;

use crate::error::ApiError;

/// Log sinks are plain writers; a failed write is an internal error.
pub(crate) fn sink_error(err: std::io::Error) -> ApiError {
    ApiError::internal(format!("Job log write failed: {}", err))
}
