//! # Heartbeat Job
//!
//! Appends one liveness line per run so an operator can tell at a glance
//! whether the backend has been answering.

use std::io::Write;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::jobs::sink_error;
use crate::query::QueryService;

/// Logs one heartbeat line: `DD/MM/YYYY-HH:MM:SS CRM is alive` when the
/// backend answers, `... CRM is down` when it does not.
pub async fn log_heartbeat(queries: &QueryService, sink: &mut impl Write) -> ApiResult<bool> {
    let alive = queries.is_alive().await;
    let timestamp = Utc::now().format("%d/%m/%Y-%H:%M:%S");

    let status = if alive { "CRM is alive" } else { "CRM is down" };
    writeln!(sink, "{} {}", timestamp, status).map_err(sink_error)?;

    if alive {
        info!("Heartbeat: alive");
    } else {
        warn!("Heartbeat: down");
    }

    Ok(alive)
}

// =============================================================================
// Unit Tests
// =============================================================================
