//! Error types for the Tempo scheduling engine.

use thiserror::Error;

/// Main error type for Tempo operations.
#[derive(Error, Debug)]
pub enum TempoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Advisory error: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Schedule-related errors (normalization, lookup).
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid time range: start {start_ms} must precede end {end_ms}")]
    InvalidTimeRange { start_ms: i64, end_ms: i64 },

    #[error("Event not found: {0}")]
    NotFound(String),
}

/// Advisory-related errors (external text-completion capability).
#[derive(Error, Debug)]
pub enum AdvisoryError {
    /// The provider answered, but not in the structurally required form,
    /// or did not answer at all where an answer was the point of the call.
    #[error("Advisory unavailable: {0}")]
    Unavailable(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,
}

/// Result type alias for Tempo operations.
pub type Result<T> = std::result::Result<T, TempoError>;
