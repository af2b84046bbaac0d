use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid website URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// Every roster transport failed; `message` is the last transport's error text.
    #[error("{message}")]
    RosterUnavailable { message: String },

    #[error("No creators found in the sheet")]
    RosterEmpty,

    #[error("{message}")]
    ClassificationFailed { message: String },

    #[error("Unknown category: {label}")]
    UnknownCategory { label: String },

    /// Failure of a single roster transport.
    #[error("{message}")]
    Source { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification of a failure, as reported to callers of the match flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidUrl,
    RosterUnavailable,
    RosterEmpty,
    ClassificationFailed,
    UnknownCategory,
    Config,
    Internal,
}

impl MatchError {
    pub fn source_failure(message: impl Into<String>) -> Self {
        MatchError::Source {
            message: message.into(),
        }
    }

    pub fn classification(message: impl Into<String>) -> Self {
        MatchError::ClassificationFailed {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            MatchError::RosterUnavailable { .. } | MatchError::Source { .. } => {
                ErrorKind::RosterUnavailable
            }
            MatchError::RosterEmpty => ErrorKind::RosterEmpty,
            MatchError::ClassificationFailed { .. } => ErrorKind::ClassificationFailed,
            MatchError::UnknownCategory { .. } => ErrorKind::UnknownCategory,
            MatchError::ConfigError { .. } | MatchError::InvalidConfigValueError { .. } => {
                ErrorKind::Config
            }
            MatchError::ApiError(_) | MatchError::CsvError(_) | MatchError::IoError(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidUrl => "Enter a full website address, e.g. https://example.com",
            ErrorKind::RosterUnavailable => {
                "Check that the creator sheet is shared publicly and reachable"
            }
            ErrorKind::RosterEmpty => "Add at least one creator row with a Category to the sheet",
            ErrorKind::ClassificationFailed => {
                "Check that the classification service is running, or pick a category manually"
            }
            ErrorKind::UnknownCategory => "Use one of the listed categories",
            ErrorKind::Config => "Fix the configuration file and try again",
            ErrorKind::Internal => "Try again; if it keeps failing, run with --verbose",
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
