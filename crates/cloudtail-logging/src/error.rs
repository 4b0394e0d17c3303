//! Error taxonomy for sink construction, delivery, and shutdown.

/// Errors surfaced to callers by sink construction and shutdown.
///
/// Per-record delivery failures are not represented here: the delivery loop
/// logs them and moves on (see [`DeliveryError`]).
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Invalid logger configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to establish log stream session: {0}")]
    Connection(String),

    #[error("Failed to prepare log files: {0}")]
    LogFiles(String),

    #[error("Failed to close {} log sink(s): {}", errors.len(), errors.join("; "))]
    Close { errors: Vec<String> },
}

/// A single record failed to reach the intake endpoint.
///
/// Swallowed by the delivery loop after being logged; the record is lost and
/// never retried.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Intake returned {0}")]
    Status(reqwest::StatusCode),
}
