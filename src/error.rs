//! Error types for evplace.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Arm selection was asked to choose from an empty candidate pool.
    #[error("no candidate arms available for selection")]
    NoArms,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvError>;

impl EvError {
    /// Stable machine-readable code for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::MissingConfig(_) => "missing_config",
            Self::NoArms => "no_arms",
            Self::NotFound(_) => "not_found",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}
