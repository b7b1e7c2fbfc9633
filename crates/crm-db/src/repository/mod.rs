//! # Repository Layer
//!
//! Repositories own the SQL for one entity each and return domain types
//! from `crm-core`. Services never see raw rows or connection handles.
//!
//! ## Repositories
//! - [`customer::CustomerRepository`] - customers table
//! - [`product::ProductRepository`] - products table, low-stock restock
//! - [`order::OrderRepository`] - orders + order_products association

pub mod customer;
pub mod order;
pub mod product;

/// Renders `?, ?, ...` for a dynamic `IN (...)` list.
///
/// Callers must reject empty id lists before reaching the store; an
/// empty placeholder list would produce invalid SQL.
pub(crate) fn placeholders(count: usize) -> String {
    let mut s = String::with_capacity(count * 3);
    for i in 0..count {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
