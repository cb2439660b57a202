use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for model generation
#[derive(Error, Debug)]
pub enum Error {
    /// Target file is already on disk and `--force` was not given
    #[error("{kind} already exists: {}", path.display())]
    PreexistingTarget { kind: &'static str, path: PathBuf },

    #[error("Stub file '{}' could not be read: {source}", path.display())]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("Database query error: {0}")]
    DatabaseQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn is_preexisting_target(&self) -> bool {
        matches!(self, Self::PreexistingTarget { .. })
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseQuery(err.to_string())
    }
}
