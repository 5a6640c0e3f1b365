//! Error types for the ladose_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ladose_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field failed to parse, was non-positive, or sex was unrecognised
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced drug name is absent from the catalog
    #[error("Drug not found in catalog: {0}")]
    NotFound(String),

    /// Adding the entry would push cumulative use above the toxic-dose ceiling
    #[error(
        "Overdose rejected: entry adds {attempted_percent:.2}% and would bring the total to {resulting_total_percent:.2}% of the toxic dose"
    )]
    OverdoseRejected {
        attempted_percent: f64,
        resulting_total_percent: f64,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),
}

impl Error {
    /// Whether the user can correct the input and retry.
    ///
    /// Catalog lookups that fail point at a configuration problem rather
    /// than something typed into a form.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::OverdoseRejected { .. }
        )
    }
}
