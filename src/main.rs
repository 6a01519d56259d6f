use std::io;

use anyhow::{Context, Result};
use sqlite_crud::demo::{self, DemoPlan};
use sqlite_crud::{Database, SqliteConfig};
use tracing::Level;

fn main() -> Result<()> {
    // stdout is reserved for the program's own output
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(io::stderr)
        .init();

    let config = SqliteConfig::default();
    let db = Database::open(&config).context("failed to open database")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    demo::run(&db, &DemoPlan::with_random_email(), &mut out)
}
