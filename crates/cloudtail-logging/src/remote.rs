//! Remote log stream sink with asynchronous delivery.
//!
//! Each sink owns a bounded queue and exactly one background delivery task.
//! Emits only enqueue; the task drains the queue one record at a time and
//! issues one intake call per record, so the caller never waits on network
//! latency (it waits only when the queue is full).
//!
//! # Architecture
//!
//! ```text
//!   Emit (caller task)
//!       │
//!       v
//!   ┌─────────────┐
//!   │   Channel   │  (mpsc, capacity 100)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │  Delivery   │  (single consumer, FIFO)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │   Intake    │  (one POST per record)
//!   └─────────────┘
//! ```
//!
//! # Delivery failures
//!
//! A record that fails to send is logged and dropped; the loop moves on to the
//! next record. Nothing is retried and nothing is reported back to the caller.
//!
//! # Shutdown
//!
//! [`RemoteSink::close`] closes the queue and waits for the delivery task to
//! drain it; the task signals completion over a oneshot channel exactly once,
//! after the last queued record has been attempted.

use std::env;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::config::DEFAULT_STREAM_ENDPOINT;
use crate::error::{DeliveryError, SinkError};
use crate::record::{LogLevel, LogRecord};
use crate::sink::{LogSink, SINK_QUEUE_CAPACITY};

/// Default per-request timeout for intake calls.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Configuration for a [`RemoteSink`].
#[derive(Debug, Clone)]
pub struct StreamSinkConfig {
    /// Log group the sink appends to.
    pub group: String,
    /// Log stream within the group.
    pub stream: String,
    /// Intake endpoint base URL.
    pub endpoint: String,
    /// API key attached to intake requests, if the environment provides one.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl StreamSinkConfig {
    /// Configuration for the given (group, stream) pair, with the endpoint and
    /// credentials taken from the ambient environment.
    #[must_use]
    pub fn from_env(group: &str, stream: &str) -> Self {
        Self {
            group: group.to_string(),
            stream: stream.to_string(),
            endpoint: env::var("CT_STREAM_URL")
                .unwrap_or_else(|_| DEFAULT_STREAM_ENDPOINT.to_string()),
            api_key: env::var("CT_STREAM_API_KEY").ok(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    fn validate(&self) -> Result<(), SinkError> {
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
        Ok(())
    }
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    events: Vec<StreamEvent<'a>>,
}

#[derive(Serialize)]
struct StreamEvent<'a> {
    timestamp: i64,
    message: &'a str,
}

/// HTTP client for the log stream intake API.
///
/// Owned and used exclusively by a single sink's delivery task, so no internal
/// locking is needed.
#[derive(Debug, Clone)]
pub struct StreamClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl StreamClient {
    pub fn new(config: &StreamSinkConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Appends a single event to the record's (group, stream). The event
    /// timestamp is stamped here, at send time.
    pub async fn append(&self, record: &LogRecord) -> Result<(), DeliveryError> {
        let url = format!(
            "{}/api/v1/streams/{}/{}/events",
            self.endpoint, record.group, record.stream
        );
        let payload = AppendRequest {
            events: vec![StreamEvent {
                timestamp: epoch_millis(),
                message: &record.message,
            }],
        };

        let mut request = self.client.post(&url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.header("CT-API-KEY", api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status));
        }
        Ok(())
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Sink delivering records to a remote log stream, identified by a fixed
/// (group, stream) pair set at construction.
pub struct RemoteSink {
    group: String,
    stream: String,
    tx: Mutex<Option<mpsc::Sender<LogRecord>>>,
    done: Mutex<Option<oneshot::Receiver<()>>>,
}

impl RemoteSink {
    /// Creates a sink bound to the given (group, stream), configured from the
    /// ambient environment, and starts its delivery task.
    pub fn new(group: &str, stream: &str) -> Result<Self, SinkError> {
        Self::with_config(StreamSinkConfig::from_env(group, stream))
    }

    /// Creates a sink from an explicit configuration and starts its delivery
    /// task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_config(config: StreamSinkConfig) -> Result<Self, SinkError> {
        config.validate()?;
        let client = StreamClient::new(&config)?;

        let (tx, rx) = mpsc::channel::<LogRecord>(SINK_QUEUE_CAPACITY);
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(deliver(rx, client, done_tx));

        Ok(Self {
            group: config.group,
            stream: config.stream,
            tx: Mutex::new(Some(tx)),
            done: Mutex::new(Some(done_rx)),
        })
    }

    #[allow(clippy::expect_used)]
    fn sender(&self) -> mpsc::Sender<LogRecord> {
        let guard = self.tx.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(tx) => tx.clone(),
            None => panic!("emit on a closed log sink"),
        }
    }
}

/// Single-consumer delivery loop. Terminates only when the queue is closed and
/// fully drained, then fires the completion signal.
async fn deliver(mut rx: mpsc::Receiver<LogRecord>, client: StreamClient, done: oneshot::Sender<()>) {
    while let Some(record) = rx.recv().await {
        if let Err(e) = client.append(&record).await {
            error!(
                "STREAM | Failed to append event to {}/{}: {e}",
                record.group, record.stream
            );
        }
    }

    debug!("STREAM | Delivery queue drained, stopping");
    let _ = done.send(());
}

#[async_trait]
impl LogSink for RemoteSink {
    /// Enqueues one record tagged with this sink's (group, stream). Blocks
    /// only while the queue is full.
    async fn log(&self, _level: LogLevel, message: String) {
        let record = LogRecord::new(self.group.as_str(), self.stream.as_str(), message);
        let tx = self.sender();
        if tx.send(record).await.is_err() {
            error!("STREAM | Log record dropped: delivery task stopped");
        }
    }

    #[allow(clippy::expect_used)]
    async fn close(&self) -> Result<(), SinkError> {
        // Dropping the last producer closes the queue; the delivery task
        // drains whatever is left and then signals completion.
        drop(self.tx.lock().expect("lock poisoned").take());

        let done = self.done.lock().expect("lock poisoned").take();
        if let Some(done) = done {
            let _ = done.await;
        }
        Ok(())
    }
}
