//! # Filter Module
//!
//! Declarative filter and ordering descriptors for each entity.
//!
//! ## How Filtering Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Filter Engine                                      │
//! │                                                                         │
//! │  Client sends: [{field: "name", value: "Key"},                          │
//! │                 {field: "low_stock", value: true}]                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FilterSchema (one static table per entity)  ← THIS MODULE              │
//! │  ├── "name"      → TextContains  on column `name`                       │
//! │  ├── "price_gte" → RangeGte      on column `price_cents`                │
//! │  ├── "low_stock" → LowStock      derived from column `stock`            │
//! │  └── unknown field? → InvalidValue (never silently ignored)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<BoundPredicate>  (all predicates are ANDed together)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  crm-db translates to one SQL query with bound parameters               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design
//! The original dynamic "apply whichever fields are present" behavior is
//! modeled as an explicit mapping from field name to (predicate kind,
//! target column or derived function), validated against a closed set.
//! Binding rejects unknown fields and mistyped values up front, so the
//! store layer only ever sees well-formed predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

// =============================================================================
// Filter Values
// =============================================================================

/// A typed filter value supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Free text (containment / prefix predicates).
    Text(String),
    /// Integer (stock bounds).
    Int(i64),
    /// Monetary amount in cents (price / total bounds).
    Money(Money),
    /// Timestamp (date range bounds).
    Date(DateTime<Utc>),
    /// Boolean (derived predicates such as low stock).
    Bool(bool),
    /// Entity identifier (exact match).
    Id(String),
}

impl FilterValue {
    /// The value type, for checking against a field's declared type.
    fn value_type(&self) -> ValueType {
        match self {
            FilterValue::Text(_) => ValueType::Text,
            FilterValue::Int(_) => ValueType::Int,
            FilterValue::Money(_) => ValueType::Money,
            FilterValue::Date(_) => ValueType::Date,
            FilterValue::Bool(_) => ValueType::Bool,
            FilterValue::Id(_) => ValueType::Id,
        }
    }
}

/// One filter supplied by the client: a field name and a value.
///
/// Omitted fields impose no constraint; supplied ones are ANDed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: FilterValue) -> Self {
        Filter {
            field: field.into(),
            value,
        }
    }
}

// =============================================================================
// Field Descriptors
// =============================================================================

/// The predicate a filterable field applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    /// Case-insensitive substring match.
    TextContains,
    /// Prefix match.
    TextStartsWith,
    /// Lower bound: value >= bound.
    RangeGte,
    /// Upper bound: value <= bound.
    RangeLte,
    /// Identifier equality.
    Exact,
    /// Derived boolean: stock strictly below the low-stock threshold.
    /// `false` imposes no constraint.
    LowStock,
}

/// Where a predicate's target column lives.
///
/// Cross-entity targets let order filters reach through the order's
/// customer reference and the order/product association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Column on the entity's own table.
    Column(&'static str),
    /// Column on the order's customer.
    Customer(&'static str),
    /// Column on the order's associated products.
    Product(&'static str),
}

/// The value type a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Int,
    Money,
    Date,
    Bool,
    Id,
}

/// One entry in an entity's filter descriptor table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Public filter field name.
    pub field: &'static str,
    /// Predicate this field applies.
    pub kind: PredicateKind,
    /// Column the predicate targets.
    pub target: Target,
    /// Value type the field accepts.
    pub value_type: ValueType,
}

const fn field(
    field: &'static str,
    kind: PredicateKind,
    target: Target,
    value_type: ValueType,
) -> FieldSpec {
    FieldSpec {
        field,
        kind,
        target,
        value_type,
    }
}

// =============================================================================
// Bound Predicates & Sort Keys
// =============================================================================

/// A filter bound against a schema: validated field, typed value.
#[derive(Debug, Clone)]
pub struct BoundPredicate {
    pub kind: PredicateKind,
    pub target: Target,
    pub value: FilterValue,
}

/// One component of a compound sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Column to sort by (resolved from the public field name).
    pub column: &'static str,
    /// Descending when the field name was prefixed with `-`.
    pub descending: bool,
}

// =============================================================================
// Filter Schema
// =============================================================================

/// The closed set of filterable and sortable fields for one entity.
#[derive(Debug)]
pub struct FilterSchema {
    /// Entity name, used in error messages.
    pub entity: &'static str,
    /// Filterable fields.
    pub fields: &'static [FieldSpec],
    /// Sortable fields: (public name, column).
    pub sortable: &'static [(&'static str, &'static str)],
}

impl FilterSchema {
    /// Looks up a filterable field, rejecting unknown names.
    fn field_spec(&self, name: &str) -> ValidationResult<&FieldSpec> {
        self.fields.iter().find(|f| f.field == name).ok_or_else(|| {
            ValidationError::invalid_value(
                "filter",
                format!("unknown {} filter field '{}'", self.entity, name),
            )
        })
    }

    /// Binds client filters against this schema.
    ///
    /// ## Errors
    /// `InvalidValue` for an unknown field name or a value whose type does
    /// not match the field's declared type.
    pub fn bind(&self, filters: &[Filter]) -> ValidationResult<Vec<BoundPredicate>> {
        let mut bound = Vec::with_capacity(filters.len());

        for filter in filters {
            let spec = self.field_spec(&filter.field)?;

            if filter.value.value_type() != spec.value_type {
                return Err(ValidationError::invalid_value(
                    "filter",
                    format!(
                        "filter field '{}' expects a {:?} value",
                        spec.field, spec.value_type
                    ),
                ));
            }

            bound.push(BoundPredicate {
                kind: spec.kind,
                target: spec.target,
                value: filter.value.clone(),
            });
        }

        Ok(bound)
    }

    /// Parses an ordering directive into a compound sort key.
    ///
    /// Each name may be prefixed with `-` for descending order; keys apply
    /// left to right. Unknown names are rejected with `InvalidValue`.
    pub fn parse_order_by(&self, names: &[String]) -> ValidationResult<Vec<SortKey>> {
        let mut keys = Vec::with_capacity(names.len());

        for name in names {
            let (descending, bare) = match name.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, name.as_str()),
            };

            let column = self
                .sortable
                .iter()
                .find(|(field, _)| *field == bare)
                .map(|(_, column)| *column)
                .ok_or_else(|| {
                    ValidationError::invalid_value(
                        "order_by",
                        format!("unknown {} sort field '{}'", self.entity, bare),
                    )
                })?;

            keys.push(SortKey { column, descending });
        }

        Ok(keys)
    }
}

// =============================================================================
// Entity Schemas
// =============================================================================

use PredicateKind::*;
use Target::*;

/// Customer filters: name/email containment, creation date range, phone prefix.
pub static CUSTOMER_FILTERS: FilterSchema = FilterSchema {
    entity: "customer",
    fields: &[
        field("name", TextContains, Column("name"), ValueType::Text),
        field("email", TextContains, Column("email"), ValueType::Text),
        field("created_at_gte", RangeGte, Column("created_at"), ValueType::Date),
        field("created_at_lte", RangeLte, Column("created_at"), ValueType::Date),
        field("phone_starts_with", TextStartsWith, Column("phone"), ValueType::Text),
    ],
    sortable: &[
        ("name", "name"),
        ("email", "email"),
        ("created_at", "created_at"),
        ("id", "id"),
    ],
};

/// Product filters: name containment, price/stock ranges, derived low stock.
pub static PRODUCT_FILTERS: FilterSchema = FilterSchema {
    entity: "product",
    fields: &[
        field("name", TextContains, Column("name"), ValueType::Text),
        field("price_gte", RangeGte, Column("price_cents"), ValueType::Money),
        field("price_lte", RangeLte, Column("price_cents"), ValueType::Money),
        field("stock_gte", RangeGte, Column("stock"), ValueType::Int),
        field("stock_lte", RangeLte, Column("stock"), ValueType::Int),
        field("low_stock", LowStock, Column("stock"), ValueType::Bool),
    ],
    sortable: &[
        ("name", "name"),
        ("price", "price_cents"),
        ("stock", "stock"),
        ("id", "id"),
    ],
};

/// Order filters: total/date ranges plus cross-entity name and id lookups.
pub static ORDER_FILTERS: FilterSchema = FilterSchema {
    entity: "order",
    fields: &[
        field("total_amount_gte", RangeGte, Column("total_cents"), ValueType::Money),
        field("total_amount_lte", RangeLte, Column("total_cents"), ValueType::Money),
        field("order_date_after", RangeGte, Column("order_date"), ValueType::Date),
        field("order_date_before", RangeLte, Column("order_date"), ValueType::Date),
        field("customer_name", TextContains, Customer("name"), ValueType::Text),
        field("product_name", TextContains, Product("name"), ValueType::Text),
        field("product_id", Exact, Product("id"), ValueType::Id),
    ],
    sortable: &[
        ("total_amount", "total_cents"),
        ("order_date", "order_date"),
        ("id", "id"),
    ],
};

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_known_fields() {
        let filters = vec![
            Filter::new("name", FilterValue::Text("Key".to_string())),
            Filter::new("low_stock", FilterValue::Bool(true)),
        ];
        let bound = PRODUCT_FILTERS.bind(&filters).unwrap();
        assert_eq!(bound.len(), 2);
        assert_eq!(bound[0].kind, PredicateKind::TextContains);
        assert_eq!(bound[1].kind, PredicateKind::LowStock);
    }

    #[test]
    fn test_bind_rejects_unknown_field() {
        let filters = vec![Filter::new("colour", FilterValue::Text("red".to_string()))];
        let err = PRODUCT_FILTERS.bind(&filters).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_bind_rejects_mistyped_value() {
        // "name" expects text, not an integer
        let filters = vec![Filter::new("name", FilterValue::Int(3))];
        assert!(PRODUCT_FILTERS.bind(&filters).is_err());
    }

    #[test]
    fn test_empty_filters_bind_to_no_predicates() {
        assert!(CUSTOMER_FILTERS.bind(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_order_by_descending_prefix() {
        let names = vec!["-price".to_string(), "name".to_string()];
        let keys = PRODUCT_FILTERS.parse_order_by(&names).unwrap();
        assert_eq!(
            keys,
            vec![
                SortKey { column: "price_cents", descending: true },
                SortKey { column: "name", descending: false },
            ]
        );
    }

    #[test]
    fn test_order_by_rejects_unknown_field() {
        let names = vec!["-weight".to_string()];
        let err = PRODUCT_FILTERS.parse_order_by(&names).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_order_schema_cross_entity_targets() {
        let filters = vec![
            Filter::new("customer_name", FilterValue::Text("Alice".to_string())),
            Filter::new("product_id", FilterValue::Id("p1".to_string())),
        ];
        let bound = ORDER_FILTERS.bind(&filters).unwrap();
        assert_eq!(bound[0].target, Target::Customer("name"));
        assert_eq!(bound[1].target, Target::Product("id"));
    }
}
