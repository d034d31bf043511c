//! Error types for modstats operations.
//!
//! This module defines the main error type [`ModStatsError`] which represents
//! everything that can go wrong while fetching an upstream page and turning it
//! into records: transport failures, missing markup, unparsable cells and
//! identifiers that do not resolve to anything.
//!
//! # Example
//!
//! ```rust
//! use modstats_core::{ModStatsError, Result};
//!
//! fn require_name(name: &str) -> Result<&str> {
//!     if name.is_empty() {
//!         return Err(ModStatsError::InvalidModName(name.to_string()));
//!     }
//!     Ok(name)
//! }
//! ```

use thiserror::Error;

/// Main error type for fetching and extraction operations.
///
/// Every variant is terminal for the operation in progress. Nothing is retried
/// and no partially mapped records are handed back.
#[derive(Error, Debug)]
pub enum ModStatsError {
    /// HTTP request errors from reqwest.
    ///
    /// Connection, DNS and body decoding failures all end up here.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The upstream answered with a status other than the one required.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The tree walker found no element with the requested tag.
    #[error("missing <{tag}> in the document")]
    MissingElement { tag: String },

    /// The page has fewer table bodies than its layout expects.
    #[error("expected table #{index} but the document only has {found}")]
    MissingTable { index: usize, found: usize },

    /// A data row is shorter than the column a field is read from.
    #[error("missing cell {index} for field `{field}` (row has {found} cells)")]
    MissingCell { field: &'static str, index: usize, found: usize },

    /// A free-text label the author page is expected to carry was not found.
    #[error("missing label `{label}` in the document")]
    MissingLabel { label: &'static str },

    /// A cell that should hold a number did not.
    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A JSON body did not match the expected shape.
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The Steam API knows no profile for the identifier.
    #[error("no steam profile found for {0}")]
    SteamIdNotFound(String),

    /// The identifier is not a SteamID64 of an individual account.
    #[error("the steamid '{0}' is invalid")]
    InvalidSteamId(String),

    /// The mod name is empty or unknown upstream.
    #[error("invalid modname: '{0}'")]
    InvalidModName(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error categories, used by boundary layers to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request failed or came back with an unexpected status.
    Transport,
    /// Expected markup is absent.
    Structural,
    /// A value could not be converted.
    Conversion,
    /// The input does not identify anything upstream.
    Semantic,
    /// Local configuration problem.
    Config,
}

impl ModStatsError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Timeout { .. } | Self::Status { .. } | Self::InvalidUrl(_) => ErrorKind::Transport,
            Self::MissingElement { .. }
            | Self::MissingTable { .. }
            | Self::MissingCell { .. }
            | Self::MissingLabel { .. } => ErrorKind::Structural,
            Self::InvalidNumber { .. } | Self::Json(_) => ErrorKind::Conversion,
            Self::SteamIdNotFound(_) | Self::InvalidSteamId(_) | Self::InvalidModName(_) => ErrorKind::Semantic,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for ModStatsError.
pub type Result<T> = std::result::Result<T, ModStatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModStatsError::MissingElement { tag: "tbody".to_string() };
        assert_eq!(err.to_string(), "missing <tbody> in the document");
    }

    #[test]
    fn test_invalid_number_names_field() {
        let err = ModStatsError::InvalidNumber { field: "downloads_total", value: "n/a".to_string() };
        assert!(err.to_string().contains("downloads_total"));
        assert!(err.to_string().contains("n/a"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ModStatsError::Timeout { timeout: 30 }.kind(), ErrorKind::Transport);
        assert_eq!(
            ModStatsError::MissingTable { index: 3, found: 1 }.kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            ModStatsError::InvalidNumber { field: "rank", value: String::new() }.kind(),
            ErrorKind::Conversion
        );
        assert_eq!(ModStatsError::SteamIdNotFound("1".into()).kind(), ErrorKind::Semantic);
        assert_eq!(ModStatsError::Config("x".into()).kind(), ErrorKind::Config);
    }
}
