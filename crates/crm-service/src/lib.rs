//! # crm-service: Commands and Jobs for the CRM Backend
//!
//! A thin orchestration layer over `crm-core` (rules) and `crm-db`
//! (storage). This is the crate an API transport would embed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         crm-service (THIS CRATE)                        │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │  MutationService   │  │   QueryService     │  │      jobs        │  │
//! │  │  ────────────────  │  │  ────────────────  │  │  ──────────────  │  │
//! │  │  create_customer   │  │  hello             │  │  heartbeat       │  │
//! │  │  bulk_create_...   │  │  customers         │  │  restock         │  │
//! │  │  create_product    │  │  products          │  │  report          │  │
//! │  │  create_order      │  │  orders            │  │  retention       │  │
//! │  │  update_low_stock  │  │                    │  │  reminders       │  │
//! │  └─────────┬──────────┘  └─────────┬──────────┘  └────────┬─────────┘  │
//! │            │                       │                      │            │
//! │            └───────────────────────┴──────────────────────┘            │
//! │                                    │                                   │
//! │                                    ▼                                   │
//! │             crm-core (validation, filters)  +  crm-db (store)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Contract
//! Every command returns `Result<T, ApiError>` where [`ApiError`] carries
//! a stable [`ErrorKind`] and a human-readable message.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod jobs;
pub mod mutation;
pub mod query;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, ApiResult, ErrorKind};
pub use mutation::{
    BulkCreatedCustomers, CreateCustomerInput, CreateOrderInput, CreateProductInput,
    CreatedCustomer, MutationService, RestockedProducts,
};
pub use query::QueryService;
