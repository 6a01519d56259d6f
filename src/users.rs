//! User records and the row operations on the `Users` table.

use std::fmt;
use std::io::Write;

use rusqlite::{named_params, Connection, OptionalExtension, Row, Rows, Statement};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

const INSERT_SQL: &str = "INSERT INTO Users (Name, Email) VALUES (:name, :email)";
const UPDATE_SQL: &str = "UPDATE Users SET Name = :name, Email = :email WHERE Id = :id";
const DELETE_SQL: &str = "DELETE FROM Users WHERE Id = :id";
const SCAN_SQL: &str = "SELECT Id, Name, Email FROM Users";
const GET_SQL: &str = "SELECT Id, Name, Email FROM Users WHERE Id = ?1";
const COUNT_SQL: &str = "SELECT COUNT(*) FROM Users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    /// Map a `(Id, Name, Email)` row.
    ///
    /// NULL columns become `0` or the empty string instead of an error. This
    /// hides missing data from callers; a row that prints as `ID: 0` or with
    /// an empty name was NULL in storage.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get::<_, Option<i64>>(0)?.unwrap_or(0),
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}; Name: {}; Email: {}", self.id, self.name, self.email)
    }
}

/// Result of an update or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(usize),
    NotFound,
}

impl Outcome {
    fn from_rows_affected(rows: usize) -> Self {
        if rows > 0 {
            Outcome::Applied(rows)
        } else {
            Outcome::NotFound
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Row operations on the users table, borrowing the shared connection
pub struct UserStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> UserStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Insert a user; the storage layer assigns the id and enforces email
    /// uniqueness.
    pub fn insert(&self, name: &str, email: &str) -> Result<User> {
        debug!(name, email, "inserting user");
        self.conn
            .execute(INSERT_SQL, named_params! { ":name": name, ":email": email })?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Overwrite name and email of the user with `id`
    pub fn update(&self, id: i64, name: &str, email: &str) -> Result<Outcome> {
        debug!(id, name, email, "updating user");
        let rows = self.conn.execute(
            UPDATE_SQL,
            named_params! { ":name": name, ":email": email, ":id": id },
        )?;
        Ok(Outcome::from_rows_affected(rows))
    }

    pub fn delete(&self, id: i64) -> Result<Outcome> {
        debug!(id, "deleting user");
        let rows = self.conn.execute(DELETE_SQL, named_params! { ":id": id })?;
        Ok(Outcome::from_rows_affected(rows))
    }

    pub fn get(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(GET_SQL, [id], User::from_row)
            .optional()?;
        Ok(user)
    }

    pub fn count(&self) -> Result<u64> {
        let count: u64 = self.conn.query_row(COUNT_SQL, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Prepare an unfiltered scan of the table
    pub fn scan(&self) -> Result<UserScan<'conn>> {
        let stmt = self.conn.prepare(SCAN_SQL)?;
        Ok(UserScan { stmt })
    }
}

/// A prepared table scan. Each call to [`UserScan::cursor`] runs the query
/// again.
pub struct UserScan<'conn> {
    stmt: Statement<'conn>,
}

impl UserScan<'_> {
    pub fn cursor(&mut self) -> Result<UserCursor<'_>> {
        let rows = self.stmt.query([])?;
        Ok(UserCursor { rows })
    }
}

/// Lazily maps result rows to users, one row per `next`.
///
/// Bounded by the table size when the query ran; once exhausted it stays
/// exhausted.
pub struct UserCursor<'stmt> {
    rows: Rows<'stmt>,
}

impl Iterator for UserCursor<'_> {
    type Item = Result<User>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next() {
            Ok(Some(row)) => Some(User::from_row(row).map_err(Into::into)),
            Ok(None) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Write one `ID: ..; Name: ..; Email: ..` line per user. Returns the number
/// of lines written.
pub fn print_users<W, I>(out: &mut W, users: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<User>>,
{
    let mut printed = 0;
    for user in users {
        writeln!(out, "{}", user?)?;
        printed += 1;
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::sqlite::Database;

    fn test_db() -> Database {
        let db = Database::open_in_memory(Schema::users()).unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn scan_all(store: &UserStore<'_>) -> Vec<User> {
        let mut scan = store.scan().unwrap();
        let users = scan.cursor().unwrap().collect::<Result<Vec<_>>>().unwrap();
        users
    }

    #[test]
    fn insert_then_scan_returns_record() {
        let db = test_db();
        let users = db.users();
        let inserted = users.insert("Ada", "ada@example.com").unwrap();
        assert!(inserted.id > 0);

        let all = scan_all(&users);
        assert_eq!(all, vec![inserted]);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = test_db();
        let users = db.users();
        users.insert("Ada", "ada@example.com").unwrap();

        let err = users.insert("Other", "ada@example.com").unwrap_err();
        assert!(err.is_constraint());

        let matching: Vec<_> = scan_all(&users)
            .into_iter()
            .filter(|u| u.email == "ada@example.com")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Ada");
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let db = test_db();
        let users = db.users();
        users.insert("Ada", "ada@example.com").unwrap();
        let before = scan_all(&users);

        assert_eq!(
            users.update(9999, "Nobody", "nobody@example.com").unwrap(),
            Outcome::NotFound
        );
        assert_eq!(scan_all(&users), before);
    }

    #[test]
    fn update_changes_only_target_row() {
        let db = test_db();
        let users = db.users();
        let ada = users.insert("Ada", "ada@example.com").unwrap();
        let bob = users.insert("Bob", "bob@example.com").unwrap();

        let outcome = users.update(ada.id, "Luke", "luke@example.com").unwrap();
        assert_eq!(outcome, Outcome::Applied(1));

        let updated = users.get(ada.id).unwrap().unwrap();
        assert_eq!(updated.name, "Luke");
        assert_eq!(updated.email, "luke@example.com");
        assert_eq!(users.get(bob.id).unwrap(), Some(bob));
    }

    #[test]
    fn delete_removes_once() {
        let db = test_db();
        let users = db.users();
        let ada = users.insert("Ada", "ada@example.com").unwrap();
        let bob = users.insert("Bob", "bob@example.com").unwrap();

        assert!(users.delete(ada.id).unwrap().is_applied());
        assert_eq!(scan_all(&users), vec![bob]);
        assert_eq!(users.delete(ada.id).unwrap(), Outcome::NotFound);
        assert_eq!(users.count().unwrap(), 1);
    }

    #[test]
    fn null_columns_default_to_zero_and_empty() {
        let db = Database::open_in_memory(Schema::new()).unwrap();
        db.connection()
            .execute_batch(
                "CREATE TABLE Users (Id INTEGER, Name TEXT, Email TEXT);
                 INSERT INTO Users VALUES (NULL, NULL, NULL);",
            )
            .unwrap();
        let all = scan_all(&db.users());
        assert_eq!(
            all,
            vec![User {
                id: 0,
                name: String::new(),
                email: String::new(),
            }]
        );
    }

    #[test]
    fn cursor_is_lazy_and_not_restartable() {
        let db = test_db();
        let users = db.users();
        users.insert("Ada", "ada@example.com").unwrap();
        users.insert("Bob", "bob@example.com").unwrap();

        let mut scan = users.scan().unwrap();
        {
            let mut cursor = scan.cursor().unwrap();
            assert_eq!(cursor.next().unwrap().unwrap().name, "Ada");
            assert_eq!(cursor.next().unwrap().unwrap().name, "Bob");
            assert!(cursor.next().is_none());
            assert!(cursor.next().is_none());
        }
        // a fresh query sees the table again
        assert_eq!(scan.cursor().unwrap().count(), 2);
    }

    #[test]
    fn printer_formats_one_line_per_user() {
        let users = vec![
            Ok(User {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            }),
            Ok(User {
                id: 2,
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            }),
        ];
        let mut out = Vec::new();
        assert_eq!(print_users(&mut out, users).unwrap(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID: 1; Name: Ada; Email: ada@example.com\n\
             ID: 2; Name: Bob; Email: bob@example.com\n"
        );
    }
}
