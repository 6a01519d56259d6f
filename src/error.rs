use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors raised by the SQLite layer
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open database at '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A storage constraint (NOT NULL, UNIQUE, ...) rejected the statement
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::Constraint(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Error::Constraint(message.clone().unwrap_or_else(|| failure.to_string()))
            }
            other => Error::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
