//! Database overview for `seedctl status`.
//!
//! Prints a row count per table so an operator can see at a glance whether
//! migrations and seeding did what they expected.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::schema;

pub async fn run_status(pool: &SqlitePool, config: &Config) -> Result<()> {
    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Curriculum Seed — Database Status");
    println!("=================================");
    println!();
    println!("  Database: {}", config.db.path.display());
    println!("  Size:     {}", format_bytes(db_size));
    println!();
    println!("  {:<24} {:>8}", "TABLE", "ROWS");
    println!("  {}", "-".repeat(34));

    for (name, _) in schema::TABLES {
        let query = format!("SELECT COUNT(*) FROM {}", name);
        match sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await {
            Ok(count) => println!("  {:<24} {:>8}", name, count),
            Err(_) => println!("  {:<24} {:>8}", name, "missing"),
        }
    }
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
