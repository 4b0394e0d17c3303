//! Backend-selection configuration for the logger facade.

use std::env;

use crate::error::SinkError;

/// Default intake endpoint for the remote stream sink.
pub const DEFAULT_STREAM_ENDPOINT: &str = "https://logs.cloudtail.dev";

/// Default maximum size of a single log file before rotation (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for determining which sink the [`Logger`](crate::Logger)
/// facade constructs.
///
/// Exactly one of `use_remote_sink` / `use_file_sink` must be enabled.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Deliver records to the remote log stream service.
    pub use_remote_sink: bool,
    /// Deliver records to local rotating files.
    pub use_file_sink: bool,
    /// Log group name for the remote sink.
    pub group: String,
    /// Log stream name for the remote sink.
    pub stream: String,
    /// Intake endpoint for the remote sink.
    pub endpoint: String,
    /// API key attached to intake requests, if the environment provides one.
    pub api_key: Option<String>,
    /// Directory the file sink writes into.
    pub directory: String,
    /// Filename prefix for the file sink.
    pub file_prefix: String,
    /// Maximum size of a single log file before rotation, in bytes.
    pub max_file_size: u64,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            use_remote_sink: false,
            use_file_sink: true,
            group: String::new(),
            stream: String::new(),
            endpoint: DEFAULT_STREAM_ENDPOINT.to_string(),
            api_key: None,
            directory: "./logs".to_string(),
            file_prefix: "app".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl LoggerConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, SinkError> {
        let use_remote_sink = env::var("CT_USE_REMOTE_SINK")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(false);
        let use_file_sink = env::var("CT_USE_FILE_SINK")
            .map(|val| val.to_lowercase() != "false")
            .unwrap_or(!use_remote_sink);
        let group = env::var("CT_LOG_GROUP").unwrap_or_default();
        let stream = env::var("CT_LOG_STREAM").unwrap_or_default();
        let endpoint =
            env::var("CT_STREAM_URL").unwrap_or_else(|_| DEFAULT_STREAM_ENDPOINT.to_string());
        let api_key = env::var("CT_STREAM_API_KEY").ok();
        let directory = env::var("CT_LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
        let file_prefix = env::var("CT_LOG_FILE_PREFIX").unwrap_or_else(|_| "app".to_string());
        let max_file_size = env::var("CT_MAX_LOG_FILE_SIZE")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);

        let config = Self {
            use_remote_sink,
            use_file_sink,
            group,
            stream,
            endpoint,
            api_key,
            directory,
            file_prefix,
            max_file_size,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// The backend-selection rule is checked first so that no backend is
    /// constructed from an ambiguous configuration.
    pub fn validate(&self) -> Result<(), SinkError> {
        if !self.use_remote_sink && !self.use_file_sink {
            return Err(SinkError::InvalidConfig(
                "either the remote sink or the file sink must be enabled".to_string(),
            ));
        }
        if self.use_remote_sink && self.use_file_sink {
            return Err(SinkError::InvalidConfig(
                "only one of the remote sink and the file sink can be enabled".to_string(),
            ));
        }

        if self.use_remote_sink {
            if self.group.trim().is_empty() {
                return Err(SinkError::InvalidConfig(
                    "log group cannot be empty".to_string(),
                ));
            }
            if self.stream.trim().is_empty() {
                return Err(SinkError::InvalidConfig(
                    "log stream cannot be empty".to_string(),
                ));
            }
            if self.endpoint.trim().is_empty() {
                return Err(SinkError::InvalidConfig(
                    "stream endpoint cannot be empty".to_string(),
                ));
            }
        } else {
            if self.directory.trim().is_empty() {
                return Err(SinkError::InvalidConfig(
                    "log directory cannot be empty".to_string(),
                ));
            }
            if self.file_prefix.trim().is_empty() {
                return Err(SinkError::InvalidConfig(
                    "log file prefix cannot be empty".to_string(),
                ));
            }
            if self.max_file_size == 0 {
                return Err(SinkError::InvalidConfig(
                    "max log file size must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}
