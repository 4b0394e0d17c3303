//! The logging capability every sink implements.
//!
//! [`LogSink`] is the single trait the rest of the crate composes over: both
//! leaf sinks implement it, and so do [`CompositeSink`](crate::CompositeSink)
//! and the [`Logger`](crate::Logger) facade, which makes composites of
//! composites work without special cases.

use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::LogLevel;

/// Capacity of the bounded queue in front of each leaf sink's delivery task.
///
/// When the queue is full, emits block until a slot frees. Records are never
/// dropped.
pub const SINK_QUEUE_CAPACITY: usize = 100;

/// A backend that accepts log records and delivers them somewhere.
///
/// Messages are preformatted by the caller (`format!` at the call site).
/// Emitting suspends the caller only while the sink's queue is full; delivery
/// itself happens on a background task.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Delivers one message at the given severity.
    async fn log(&self, level: LogLevel, message: String);

    async fn debug(&self, message: String) {
        self.log(LogLevel::Debug, message).await;
    }

    async fn info(&self, message: String) {
        self.log(LogLevel::Info, message).await;
    }

    async fn warn(&self, message: String) {
        self.log(LogLevel::Warn, message).await;
    }

    async fn error(&self, message: String) {
        self.log(LogLevel::Error, message).await;
    }

    /// Stops accepting records and blocks until every record already queued
    /// has been attempted for delivery.
    ///
    /// Emitting on a closed sink is a programming error.
    async fn close(&self) -> Result<(), SinkError>;
}
