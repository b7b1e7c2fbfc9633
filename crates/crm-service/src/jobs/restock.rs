//! # Restock Job
//!
//! Runs the low-stock restock command and logs every product it touched.

use std::io::Write;

use chrono::Utc;
use tracing::info;

use crate::error::ApiResult;
use crate::jobs::sink_error;
use crate::mutation::MutationService;

/// Tops up low-stock products and logs one line per updated product:
/// `[YYYY-MM-DD HH:MM:SS] Product: <name>, New Stock: <stock>`.
///
/// Returns the number of products restocked. A run with nothing below
/// threshold logs nothing and returns 0.
pub async fn update_low_stock(
    mutations: &MutationService,
    sink: &mut impl Write,
) -> ApiResult<usize> {
    let result = mutations.update_low_stock_products().await?;
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");

    for product in &result.products {
        writeln!(
            sink,
            "[{}] Product: {}, New Stock: {}",
            timestamp, product.name, product.stock
        )
        .map_err(sink_error)?;
    }

    info!(count = result.products.len(), "Restock job complete");
    Ok(result.products.len())
}

// =============================================================================
// Unit Tests
// =============================================================================
