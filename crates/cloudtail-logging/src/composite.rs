//! Fan-out sink broadcasting each record to an ordered set of member sinks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::record::LogLevel;
use crate::sink::LogSink;

/// A sink that forwards every operation to each of its members, in order.
///
/// Members are shared handles; callers may keep their own references. The
/// member sequence is fixed at construction and read-only afterwards, so
/// concurrent emits are safe as long as each member's emit is.
pub struct CompositeSink {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl CompositeSink {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn LogSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl LogSink for CompositeSink {
    /// Invokes the member emits one after another, in construction order.
    /// Member failures are not isolated here; the sinks in this crate swallow
    /// delivery errors themselves.
    async fn log(&self, level: LogLevel, message: String) {
        for sink in &self.sinks {
            sink.log(level, message.clone()).await;
        }
    }

    /// Closes every member in order, even when an earlier member fails, and
    /// aggregates the failures.
    async fn close(&self) -> Result<(), SinkError> {
        let mut errors = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.close().await {
                errors.push(e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SinkError::Close { errors })
        }
    }
}
