//! # Job Runner
//!
//! Runs one (or all) of the background jobs once and exits. Scheduling is
//! left to cron or a systemd timer; each invocation appends to the job's
//! log file.
//!
//! ## Usage
//! ```bash
//! # Run every job once against the default database
//! cargo run -p crm-service --bin jobs
//!
//! # Run a single job
//! cargo run -p crm-service --bin jobs -- --job heartbeat
//!
//! # Custom database and log directory
//! cargo run -p crm-service --bin jobs -- --db ./data/crm.db --log-dir ./logs
//! ```
//!
//! ## Log Files (under the log directory)
//! - `crm_heartbeat_log.txt`
//! - `low_stock_updates_log.txt`
//! - `crm_report_log.txt`
//! - `customer_cleanup_log.txt`
//! - `order_reminders_log.txt`

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crm_db::{Database, DbConfig};
use crm_service::jobs;
use crm_service::{MutationService, QueryService};

fn open_log(dir: &Path, file: &str) -> Result<impl Write, std::io::Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(file))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./crm_dev.db");
    let mut log_dir = PathBuf::from("/tmp");
    let mut job = String::from("all");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--log-dir" | "-l" => {
                if i + 1 < args.len() {
                    log_dir = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--job" | "-j" => {
                if i + 1 < args.len() {
                    job = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("CRM Job Runner");
                println!();
                println!("Usage: jobs [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: ./crm_dev.db)");
                println!("  -l, --log-dir <DIR>   Log directory (default: /tmp)");
                println!("  -j, --job <NAME>      heartbeat | restock | report | retention |");
                println!("                        reminders | all (default: all)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, job = %job, "Starting job runner");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let mutations = MutationService::new(db.clone());
    let queries = QueryService::new(db.clone());

    let run_all = job == "all";

    if run_all || job == "heartbeat" {
        let mut log = open_log(&log_dir, "crm_heartbeat_log.txt")?;
        let alive = jobs::log_heartbeat(&queries, &mut log).await?;
        println!("heartbeat: {}", if alive { "alive" } else { "down" });
    }

    if run_all || job == "restock" {
        let mut log = open_log(&log_dir, "low_stock_updates_log.txt")?;
        let count = jobs::update_low_stock(&mutations, &mut log).await?;
        println!("restock: {} products updated", count);
    }

    if run_all || job == "report" {
        let mut log = open_log(&log_dir, "crm_report_log.txt")?;
        let report = jobs::generate_crm_report(&queries, &mut log).await?;
        println!(
            "report: {} customers, {} orders",
            report.total_customers, report.total_orders
        );
    }

    if run_all || job == "retention" {
        let mut log = open_log(&log_dir, "customer_cleanup_log.txt")?;
        let deleted = jobs::clean_inactive_customers(&mutations, &mut log).await?;
        println!("retention: {} customers deleted", deleted);
    }

    if run_all || job == "reminders" {
        let mut log = open_log(&log_dir, "order_reminders_log.txt")?;
        let count = jobs::send_order_reminders(&queries, &mut log).await?;
        println!("reminders: {} sent", count);
        println!("Order reminders processed!");
    }

    db.close().await;
    info!("Job runner finished");

    Ok(())
}
