//! Core error types for harness processing
//!
//! Every configuration failure names the entity designator it belongs to so
//! callers can point the user at the offending connector or cable.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// Errors raised while building or querying a harness model
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error in {designator}: {message}")]
    Config { designator: String, message: String },

    #[error("Invalid configuration for {designator}: {source}")]
    InvalidConfig {
        designator: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid qty multiplier parameter for {designator}: {key}")]
    InvalidMultiplier { designator: String, key: String },

    #[error("Unknown color code in {designator}: {code}")]
    UnknownColorCode { designator: String, code: String },

    #[error("Unknown color mode: {mode}")]
    UnknownColorMode { mode: String },

    #[error("Range {token} spans more than {max} values")]
    RangeTooLong { token: String, max: u64 },

    #[error("Unknown connector or cable: {designator}")]
    UnknownEntity { designator: String },

    #[error("Designator already in use: {designator}")]
    DuplicateDesignator { designator: String },
}

impl HarnessError {
    /// Create a new configuration error
    pub fn config(designator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            designator: designator.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid multiplier error
    pub fn invalid_multiplier(designator: impl Into<String>, key: impl Into<String>) -> Self {
        Self::InvalidMultiplier {
            designator: designator.into(),
            key: key.into(),
        }
    }

    /// Create a new unknown color code error
    pub fn unknown_color_code(designator: impl Into<String>, code: impl Into<String>) -> Self {
        Self::UnknownColorCode {
            designator: designator.into(),
            code: code.into(),
        }
    }

    /// Create a new unknown entity error
    pub fn unknown_entity(designator: impl Into<String>) -> Self {
        Self::UnknownEntity {
            designator: designator.into(),
        }
    }

    /// Designator of the entity the error belongs to, if any
    pub fn designator(&self) -> Option<&str> {
        match self {
            Self::Config { designator, .. }
            | Self::InvalidConfig { designator, .. }
            | Self::InvalidMultiplier { designator, .. }
            | Self::UnknownColorCode { designator, .. }
            | Self::UnknownEntity { designator }
            | Self::DuplicateDesignator { designator } => Some(designator),
            Self::UnknownColorMode { .. } | Self::RangeTooLong { .. } => None,
        }
    }
}
