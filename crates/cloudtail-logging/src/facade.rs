//! Single logging entry point the rest of the application depends on.
//!
//! The facade resolves which concrete backend to use from a [`LoggerConfig`]
//! once, at construction, and delegates every call to it afterwards. It adds
//! no behavior of its own.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::LoggerConfig;
use crate::error::SinkError;
use crate::file::FileSink;
use crate::record::LogLevel;
use crate::remote::{RemoteSink, StreamSinkConfig, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::sink::LogSink;

/// Configuration-driven logger handing every call to a single backend sink.
pub struct Logger {
    inner: Arc<dyn LogSink>,
}

impl Logger {
    /// Validates the configuration and constructs the selected backend.
    ///
    /// Rejects configurations that enable both sinks or neither, before any
    /// backend is constructed.
    pub async fn new(config: LoggerConfig) -> Result<Self, SinkError> {
        config.validate()?;

        let inner: Arc<dyn LogSink> = if config.use_remote_sink {
            Arc::new(RemoteSink::with_config(StreamSinkConfig {
                group: config.group.clone(),
                stream: config.stream.clone(),
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            })?)
        } else {
            Arc::new(
                FileSink::new(&config.directory, &config.file_prefix, config.max_file_size)
                    .await?,
            )
        };

        Ok(Self { inner })
    }

    /// Wraps an existing sink, typically a [`CompositeSink`](crate::CompositeSink)
    /// assembled by the caller.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn LogSink>) -> Self {
        Self { inner: sink }
    }
}

#[async_trait]
impl LogSink for Logger {
    async fn log(&self, level: LogLevel, message: String) {
        self.inner.log(level, message).await;
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.inner.close().await
    }
}
