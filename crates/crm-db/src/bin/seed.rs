//! # Seed Data Generator
//!
//! Populates the database with sample CRM data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p crm-db --bin seed
//!
//! # Specify database path
//! cargo run -p crm-db --bin seed -- --db ./data/crm.db
//! ```
//!
//! ## Generated Data
//! - 4 customers (mixed phone formats, one without a phone)
//! - 4 products (Laptop, Mouse, Keyboard, Monitor)
//! - 4 orders linking them, with totals snapshotted at seed time

use chrono::Utc;
use std::env;
use uuid::Uuid;

use crm_core::{Customer, Order, Product};
use crm_db::{Database, DbConfig};

/// Sample customers: (name, email, phone).
const CUSTOMERS: &[(&str, &str, Option<&str>)] = &[
    ("Customer 1", "customer1@example.com", Some("+10000000001")),
    ("Customer 2", "customer2@example.com", Some("100-000-0002")),
    ("Customer 3", "customer3@example.com", None),
    ("Customer 4", "customer4@example.com", Some("+10000000004")),
];

/// Sample products: (name, price in cents, stock).
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Laptop", 99999, 10),
    ("Mouse", 4999, 50),
    ("Keyboard", 7999, 30),
    ("Monitor", 19999, 20),
];

/// Orders as (customer index, product indices).
const ORDERS: &[(usize, &[usize])] = &[
    (0, &[0, 2]),
    (1, &[1]),
    (2, &[2, 3]),
    (3, &[0, 1, 3]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./crm_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("CRM Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./crm_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 CRM Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip if data already exists
    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding customers...");
    let now = Utc::now();

    let mut customers = Vec::with_capacity(CUSTOMERS.len());
    for (name, email, phone) in CUSTOMERS {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            created_at: now,
        };
        db.customers().insert(&customer).await?;
        customers.push(customer);
    }
    println!("  Inserted {} customers", customers.len());

    println!("Seeding products...");
    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, price_cents, stock) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_cents: *price_cents,
            stock: *stock,
            created_at: now,
        };
        db.products().insert(&product).await?;
        products.push(product);
    }
    println!("  Inserted {} products", products.len());

    println!("Seeding orders...");
    for (customer_idx, product_indices) in ORDERS {
        let total_cents: i64 = product_indices
            .iter()
            .map(|&idx| products[idx].price_cents)
            .sum();
        let product_ids: Vec<String> = product_indices
            .iter()
            .map(|&idx| products[idx].id.clone())
            .collect();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customers[*customer_idx].id.clone(),
            total_cents,
            order_date: now,
            created_at: now,
        };
        db.orders().insert_with_products(&order, &product_ids).await?;
    }
    println!("  Inserted {} orders", ORDERS.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
