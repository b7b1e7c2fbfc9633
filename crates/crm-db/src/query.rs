//! # Query Building
//!
//! Translates bound filter predicates and sort keys into SQL fragments
//! with positional bind parameters.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Filter → SQL Translation                             │
//! │                                                                         │
//! │  Vec<BoundPredicate>  (validated upstream in crm-core)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  where_clause() → ("WHERE name LIKE ... AND stock < ?",                 │
//! │                    [Text("key"), Int(10)])                              │
//! │       │                                                                 │
//! │  Vec<SortKey>                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order_clause() → "ORDER BY price_cents DESC, name ASC, id ASC"         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository splices fragments into its SELECT and binds values          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All user-supplied data travels through bind parameters; column names
//! come from the static schemas and never from client input.

use crm_core::filter::{BoundPredicate, FilterValue, PredicateKind, SortKey, Target};
use crm_core::LOW_STOCK_THRESHOLD;

// =============================================================================
// Bind Values
// =============================================================================

/// A value destined for a positional `?` placeholder.
///
/// Dates are bound as typed values so they serialize exactly like the
/// stored column text, keeping range comparisons lexicographically sound.
#[derive(Debug, Clone)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Date(chrono::DateTime<chrono::Utc>),
}

/// Binds accumulated values onto a `query_as` in order.
pub fn bind_values<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    for value in values {
        query = match value {
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Int(n) => query.bind(*n),
            BindValue::Date(d) => query.bind(*d),
        };
    }
    query
}

// =============================================================================
// LIKE Escaping
// =============================================================================

/// Escapes LIKE wildcards in a user-supplied needle.
///
/// The generated clauses use `ESCAPE '\'`, so `%`, `_` and `\` in the
/// needle match themselves instead of acting as wildcards.
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if ch == '%' || ch == '_' || ch == '\\' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// =============================================================================
// WHERE Clause
// =============================================================================

/// Renders one predicate against a concrete column into SQL.
///
/// Returns `None` for predicates that impose no constraint
/// (`low_stock: false`).
fn column_condition(
    column: &str,
    kind: PredicateKind,
    value: &FilterValue,
    binds: &mut Vec<BindValue>,
) -> Option<String> {
    match (kind, value) {
        (PredicateKind::TextContains, FilterValue::Text(needle)) => {
            binds.push(BindValue::Text(escape_like(needle)));
            Some(format!("{column} LIKE '%' || ? || '%' ESCAPE '\\'"))
        }
        (PredicateKind::TextStartsWith, FilterValue::Text(needle)) => {
            binds.push(BindValue::Text(escape_like(needle)));
            Some(format!("{column} LIKE ? || '%' ESCAPE '\\'"))
        }
        (PredicateKind::RangeGte, FilterValue::Int(n)) => {
            binds.push(BindValue::Int(*n));
            Some(format!("{column} >= ?"))
        }
        (PredicateKind::RangeLte, FilterValue::Int(n)) => {
            binds.push(BindValue::Int(*n));
            Some(format!("{column} <= ?"))
        }
        (PredicateKind::RangeGte, FilterValue::Money(m)) => {
            binds.push(BindValue::Int(m.cents()));
            Some(format!("{column} >= ?"))
        }
        (PredicateKind::RangeLte, FilterValue::Money(m)) => {
            binds.push(BindValue::Int(m.cents()));
            Some(format!("{column} <= ?"))
        }
        (PredicateKind::RangeGte, FilterValue::Date(d)) => {
            binds.push(BindValue::Date(*d));
            Some(format!("{column} >= ?"))
        }
        (PredicateKind::RangeLte, FilterValue::Date(d)) => {
            binds.push(BindValue::Date(*d));
            Some(format!("{column} <= ?"))
        }
        (PredicateKind::Exact, FilterValue::Id(id)) => {
            binds.push(BindValue::Text(id.clone()));
            Some(format!("{column} = ?"))
        }
        (PredicateKind::LowStock, FilterValue::Bool(true)) => {
            binds.push(BindValue::Int(LOW_STOCK_THRESHOLD));
            Some(format!("{column} < ?"))
        }
        (PredicateKind::LowStock, FilterValue::Bool(false)) => None,
        // Value types are checked at bind time; any other pairing is
        // unreachable for predicates produced by a FilterSchema.
        _ => None,
    }
}

/// Builds a `WHERE ...` fragment (or an empty string) from bound
/// predicates, accumulating their bind values in order.
///
/// Cross-entity targets on orders become correlated subqueries:
/// - `Target::Customer(c)` → `customer_id IN (SELECT id FROM customers WHERE <c ...>)`
/// - `Target::Product(c)`  → `id IN (SELECT order_id FROM order_products ... WHERE <p.c ...>)`
pub fn where_clause(predicates: &[BoundPredicate]) -> (String, Vec<BindValue>) {
    let mut conditions = Vec::with_capacity(predicates.len());
    let mut binds = Vec::with_capacity(predicates.len());

    for pred in predicates {
        let condition = match pred.target {
            Target::Column(column) => column_condition(column, pred.kind, &pred.value, &mut binds),
            Target::Customer(column) => {
                column_condition(column, pred.kind, &pred.value, &mut binds).map(|inner| {
                    format!("customer_id IN (SELECT id FROM customers WHERE {inner})")
                })
            }
            Target::Product(column) => {
                column_condition(&format!("p.{column}"), pred.kind, &pred.value, &mut binds).map(
                    |inner| {
                        format!(
                            "id IN (SELECT op.order_id FROM order_products op \
                             JOIN products p ON p.id = op.product_id WHERE {inner})"
                        )
                    },
                )
            }
        };

        if let Some(condition) = condition {
            conditions.push(condition);
        }
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), binds)
    }
}

// =============================================================================
// ORDER BY Clause
// =============================================================================

/// Builds an `ORDER BY ...` fragment from sort keys.
///
/// A trailing `id ASC` key is always appended so result order is total:
/// rows that tie on every requested key still come back in a stable,
/// repeatable order.
pub fn order_clause(sort_keys: &[SortKey]) -> String {
    let mut parts = Vec::with_capacity(sort_keys.len() + 1);

    for key in sort_keys {
        let direction = if key.descending { "DESC" } else { "ASC" };
        parts.push(format!("{} {}", key.column, direction));
    }

    // Tie-break unless the caller already sorted by id.
    if !sort_keys.iter().any(|k| k.column == "id") {
        parts.push("id ASC".to_string());
    }

    format!("ORDER BY {}", parts.join(", "))
}

// =============================================================================
// Unit Tests
// =============================================================================
