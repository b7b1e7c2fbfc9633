//! # Report Job
//!
//! Logs one summary line with the backend's aggregate counters.

use std::io::Write;

use chrono::Utc;
use tracing::info;

use crate::error::ApiResult;
use crate::jobs::sink_error;
use crate::query::{CrmReport, QueryService};
use crm_core::Money;

/// Logs one report line:
/// `[YYYY-MM-DD HH:MM:SS] Report: <n> customers, <n> orders, $<d.cc> revenue`.
///
/// Revenue sums the orders' snapshot totals, so it is stable against
/// later product price changes.
pub async fn generate_crm_report(
    queries: &QueryService,
    sink: &mut impl Write,
) -> ApiResult<CrmReport> {
    let report = queries.report().await?;
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");

    writeln!(
        sink,
        "[{}] Report: {} customers, {} orders, {} revenue",
        timestamp,
        report.total_customers,
        report.total_orders,
        Money::from_cents(report.total_revenue_cents)
    )
    .map_err(sink_error)?;

    info!(
        customers = report.total_customers,
        orders = report.total_orders,
        revenue_cents = report.total_revenue_cents,
        "Report job complete"
    );

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================
