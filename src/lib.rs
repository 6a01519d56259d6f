//! CRUD operations over a local single-file SQLite database.
//!
//! # Intention
//!
//! - Open one connection, create the `Users` table, then insert, scan,
//!   update and delete user records through it.
//! - Wrap rusqlite in `Database`, `UserStore` and `Error`.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code and the console printer belong here.
//! - No pooling, migrations or multi-connection coordination.

pub mod demo;
pub mod error;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use error::{Error, Result};
pub use sqlite::{Database, SqliteConfig};
pub use users::{print_users, Outcome, User, UserCursor, UserScan, UserStore};
