//! Utility to inspect the database schema and print the tables this service reads and writes.

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

const TABLES: &[&str] = &[
    "domains",
    "intelligence_bundles",
    "scraped_contents",
    "inquiries",
    "projects",
    "project_updates",
];

/// Main entry point for the schema inspection utility.
///
/// Prints the columns of each known table, or flags it as missing.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    for table in TABLES {
        let columns: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT column_name, data_type, is_nullable
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&pool)
        .await?;

        if columns.is_empty() {
            println!("- {} (missing)", table);
            println!();
            continue;
        }

        println!("- {}", table);
        for (col, type_, nullable) in columns {
            let marker = if nullable == "YES" { "?" } else { "" };
            println!("  - {}{}: {}", col, marker, type_);
        }
        println!();
    }

    Ok(())
}
