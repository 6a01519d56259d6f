//! The fixed create / insert / update / delete sequence, with console output.

use std::io::Write;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{info, warn};

use crate::schema::USERS_TABLE;
use crate::sqlite::Database;
use crate::users::{print_users, Outcome};

/// Inputs for one run of the sequence
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPlan {
    pub name: String,
    pub email: String,
    pub update_id: i64,
    pub new_name: String,
    pub new_email: String,
    pub delete_id: i64,
}

impl DemoPlan {
    /// The default plan with a random suffix in the inserted email so
    /// repeated runs rarely collide on the unique constraint.
    pub fn with_random_email() -> Self {
        let suffix = rand::thread_rng().gen_range(1..999);
        Self {
            email: format!("lekeydema{}@gmail.com", suffix),
            ..Self::default()
        }
    }
}

impl Default for DemoPlan {
    fn default() -> Self {
        Self {
            name: "Lekey".to_string(),
            email: "lekeydema@gmail.com".to_string(),
            update_id: 3,
            new_name: "Luke".to_string(),
            new_email: "Luke@gmail.com".to_string(),
            delete_id: 3,
        }
    }
}

/// Run the sequence against `db`, writing status and record lines to `out`.
///
/// A failed insert is reported and the run continues; every other failure is
/// returned.
pub fn run<W: Write>(db: &Database, plan: &DemoPlan, out: &mut W) -> Result<()> {
    writeln!(out, "hello world! Database is being created now...")?;
    db.initialize_schema().context("failed to create schema")?;
    writeln!(out, "TABLE \"{}\" created successfully!", USERS_TABLE)?;

    let users = db.users();

    writeln!(out, "Inserting New User")?;
    match users.insert(&plan.name, &plan.email) {
        Ok(user) => {
            info!(id = user.id, "inserted user");
            writeln!(out, "User added successfully")?;
        }
        Err(e) => {
            warn!("insert failed: {}", e);
            writeln!(out, "Exception raised: {}", e)?;
        }
    }
    print_all(db, out)?;

    let outcome = users
        .update(plan.update_id, &plan.new_name, &plan.new_email)
        .context("failed to update user")?;
    report(out, outcome, "User updated successfully!")?;
    print_all(db, out)?;

    let outcome = users
        .delete(plan.delete_id)
        .context("failed to delete user")?;
    report(out, outcome, "User deleted successfully!")?;
    print_all(db, out)?;

    Ok(())
}

fn report<W: Write>(out: &mut W, outcome: Outcome, applied: &str) -> Result<()> {
    match outcome {
        Outcome::Applied(_) => writeln!(out, "{}", applied)?,
        Outcome::NotFound => writeln!(out, "User not found.")?,
    }
    Ok(())
}

fn print_all<W: Write>(db: &Database, out: &mut W) -> Result<()> {
    let mut scan = db.users().scan().context("failed to scan users")?;
    let printed = print_users(out, scan.cursor()?)?;
    info!(printed, "printed users");
    Ok(())
}
