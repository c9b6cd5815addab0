use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("{message}")]
    UsageError { message: String },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    ConnectivityError { message: String },

    #[error("{message}")]
    QueryError { message: String },

    #[error("Output directory is not writable: {}", path.display())]
    OutputDirectoryError { path: PathBuf },

    #[error("Cannot create output file {}: {source}", path.display())]
    OutputFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IdentityError {
    /// Stable name of the error kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityError::UsageError { .. } => "UsageError",
            IdentityError::ValidationError { .. } => "ValidationError",
            IdentityError::ConnectivityError { .. } => "ConnectivityError",
            IdentityError::QueryError { .. } => "QueryError",
            IdentityError::OutputDirectoryError { .. } => "OutputDirectoryError",
            IdentityError::OutputFileError { .. } => "OutputFileError",
            IdentityError::ConfigError { .. } => "ConfigError",
            IdentityError::InvalidConfigValueError { .. } => "InvalidConfigValueError",
            IdentityError::IoError(_) => "IoError",
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            IdentityError::UsageError { .. } => "Run with exactly one domain argument, e.g. `crt-identities example.com`",
            IdentityError::ValidationError { .. } => {
                "Use a plain domain name made of letters, digits, dots and hyphens"
            }
            IdentityError::ConnectivityError { .. } => {
                "Check network access to the certwatch database (TCP 5432) and retry later"
            }
            IdentityError::QueryError { .. } => {
                "The database may be overloaded; retry later or narrow the domain"
            }
            IdentityError::OutputDirectoryError { .. } => {
                "Make sure the output directory exists and is writable"
            }
            IdentityError::OutputFileError { .. } => {
                "Check free disk space and permissions on the output file"
            }
            IdentityError::ConfigError { .. } | IdentityError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags"
            }
            IdentityError::IoError(_) => "Check that stdout is not closed",
        }
    }

    /// Every error is fatal and maps to `EXIT_FAILURE`.
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn validation(message: impl Into<String>) -> Self {
        IdentityError::ValidationError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
