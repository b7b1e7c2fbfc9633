//! # crm-core: Pure Business Logic for the CRM Backend
//!
//! This crate is the **heart** of the CRM backend. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CRM Backend Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  API Transport (external)                       │   │
//! │  │    createCustomer ──► createOrder ──► customers/orders queries  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                       crm-service                               │   │
//! │  │    MutationService, QueryService, background jobs               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ crm-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  filter   │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │  schemas  │  │   rules   │  │   │
//! │  │   │ Product   │  │  (cents)  │  │ ordering  │  │  checks   │  │   │
//! │  │   │  Order    │  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   └───────────┘                                                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    crm-db (Entity Store)                        │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Order)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Field-level business rule validation
//! - [`filter`] - Declarative filter/ordering descriptors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use crm_core::Money` instead of
// `use crm_core::money::Money`

pub use error::ValidationError;
pub use filter::{Filter, FilterValue};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// A product is "low stock" when its stock is strictly below this threshold.
///
/// ## Why a constant?
/// The threshold drives both the derived `low_stock` filter and the bulk
/// restock command; keeping it in one place keeps the two consistent.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Units added to each low-stock product by the bulk restock command.
pub const RESTOCK_QUANTITY: i64 = 10;
