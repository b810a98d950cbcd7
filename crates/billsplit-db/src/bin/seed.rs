//! # Seed Data Generator
//!
//! Puts sample bills in the history database for development.
//!
//! ## Usage
//! ```bash
//! # Seed the demo bill plus 5 variations (default)
//! cargo run -p billsplit-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p billsplit-db --bin seed -- --count 20 --db ./data/billsplit.db
//! ```
//!
//! Each variation is the demo bill with a different restaurant name, tax
//! and discount, so the history list has distinct totals to show.

use billsplit_core::import::demo_bill;
use billsplit_db::{Database, DbConfig};
use std::env;

/// Restaurant names for the generated history
const RESTAURANTS: &[&str] = &[
    "Punjabi Aahar",
    "Saravana Bhavan",
    "Karim's",
    "Bademiya",
    "Paradise Biryani",
    "Haldiram's",
    "Leopold Cafe",
    "Murugan Idli Shop",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 5;
    let mut db_path = String::from("./billsplit_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Billsplit Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of extra bills to generate (default: 5)");
                println!("  -d, --db <PATH>    Database file path (default: ./billsplit_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Billsplit Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Bills:    {}", count + 1);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.bills().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} saved bills", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let demo = demo_bill();
    db.bills().save(&demo).await?;

    for n in 0..count {
        let bill = demo
            .with_bill_name(Some(RESTAURANTS[n % RESTAURANTS.len()].to_string()))
            .with_tax((n as f64) * 12.5)?
            .with_discount(((n % 3) as f64) * 25.0)?;

        if let Err(e) = db.bills().save(&bill).await {
            eprintln!("Failed to save bill {}: {}", n, e);
        }
    }

    println!();
    println!("Recent history:");
    for entry in db.bills().list_recent(10).await? {
        println!(
            "  {:<24} {:>10.2}",
            entry.bill_name.as_deref().unwrap_or("(unnamed)"),
            entry.grand_total
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
