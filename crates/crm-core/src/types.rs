//! # Domain Types
//!
//! Core domain types used throughout the CRM backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  name           │   │  customer_id    │       │
//! │  │  email (unique) │   │  price_cents    │   │  total_cents    │       │
//! │  │  phone?         │   │  stock          │   │  order_date     │       │
//! │  │  created_at     │   │  created_at     │   │  created_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │         ▲                      ▲                      │                 │
//! │         │ 1                    │ N                    │                 │
//! │         └──────────────────────┴──────────────────────┘                 │
//! │           Order references one Customer, N Products                     │
//! │           (order_products association table)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An order's `total_cents` is the sum of its products' prices at creation
//! time. Later price changes never touch existing orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (non-empty).
    pub name: String,

    /// Email address - globally unique, case-sensitive as stored.
    pub email: String,

    /// Optional phone number; `+<10-15 digits>` or `ddd-ddd-dddd`.
    pub phone: Option<String>,

    /// When the customer was created (store-assigned, immutable).
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product that orders can reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Price in cents (smallest currency unit, strictly positive).
    pub price_cents: i64,

    /// Current stock level (never negative).
    pub stock: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether this product is below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order row: one customer, a snapshot total, an order date.
///
/// Product references live in the `order_products` association and are
/// resolved into [`OrderDetail`] by the query layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The customer who placed the order (exactly one, immutable).
    pub customer_id: String,

    /// Snapshot total in cents: sum of product prices at creation time.
    pub total_cents: i64,

    /// When the order was placed (defaults to creation time).
    pub order_date: DateTime<Utc>,

    /// When the order row was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the snapshot total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Detail
// =============================================================================

/// An order with its relations fully resolved.
///
/// This is the read shape returned by queries and by order creation:
/// nested customer and products, never unresolved references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Customer,
    pub products: Vec<Product>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Keyboard".to_string(),
            price_cents: 7999,
            stock,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_price() {
        assert_eq!(product(5).price(), Money::from_cents(7999));
    }

    #[test]
    fn test_low_stock_is_strict() {
        assert!(product(9).is_low_stock());
        assert!(!product(10).is_low_stock());
        assert!(!product(11).is_low_stock());
    }

    #[test]
    fn test_order_total_amount() {
        let order = Order {
            id: "o1".to_string(),
            customer_id: "c1".to_string(),
            total_cents: 1500,
            order_date: Utc::now(),
            created_at: Utc::now(),
        };
        assert_eq!(order.total_amount().to_string(), "$15.00");
    }
}
