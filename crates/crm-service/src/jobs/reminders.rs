//! # Order Reminder Job
//!
//! Logs one reminder line for every order placed in the last week.

use std::io::Write;

use chrono::{Duration, Utc};
use tracing::info;

use crate::error::ApiResult;
use crate::jobs::sink_error;
use crate::query::QueryService;

/// Days back the reminder window reaches.
pub const REMINDER_WINDOW_DAYS: i64 = 7;

/// Logs one line per recent order:
/// `[YYYY-MM-DD HH:MM:SS] - Order ID: <id>, Customer Email: <email>`.
///
/// Returns the number of reminders written.
pub async fn send_order_reminders(
    queries: &QueryService,
    sink: &mut impl Write,
) -> ApiResult<usize> {
    let now = Utc::now();
    let cutoff = now - Duration::days(REMINDER_WINDOW_DAYS);

    let recent = queries.recent_orders(cutoff).await?;
    let timestamp = now.format("%Y-%m-%d %H:%M:%S");

    for (order_id, email) in &recent {
        writeln!(
            sink,
            "[{}] - Order ID: {}, Customer Email: {}",
            timestamp, order_id, email
        )
        .map_err(sink_error)?;
    }

    info!(count = recent.len(), "Order reminders processed");
    Ok(recent.len())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{
        CreateCustomerInput, CreateOrderInput, CreateProductInput, MutationService,
    };
    use crm_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_reminders_cover_only_the_last_week() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mutations = MutationService::new(db.clone());
        let queries = QueryService::new(db);

        let customer = mutations
            .create_customer(CreateCustomerInput {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap()
            .customer;
        let widget = mutations
            .create_product(CreateProductInput {
                name: "Widget".to_string(),
                price_cents: 100,
                stock: Some(5),
            })
            .await
            .unwrap();

        let now = Utc::now();
        let fresh = mutations
            .create_order(CreateOrderInput {
                customer_id: customer.id.clone(),
                product_ids: vec![widget.id.clone()],
                order_date: Some(now - Duration::days(2)),
            })
            .await
            .unwrap();
        mutations
            .create_order(CreateOrderInput {
                customer_id: customer.id,
                product_ids: vec![widget.id],
                order_date: Some(now - Duration::days(30)),
            })
            .await
            .unwrap();

        let mut sink = Vec::new();
        let count = send_order_reminders(&queries, &mut sink).await.unwrap();
        assert_eq!(count, 1);

        let log = String::from_utf8(sink).unwrap();
        assert!(log.contains(&format!(
            "Order ID: {}, Customer Email: alice@example.com",
            fresh.order.id
        )));
    }

    #[tokio::test]
    async fn test_reminders_quiet_when_no_recent_orders() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let queries = QueryService::new(db);

        let mut sink = Vec::new();
        let count = send_order_reminders(&queries, &mut sink).await.unwrap();
        assert_eq!(count, 0);
        assert!(sink.is_empty());
    }
}
