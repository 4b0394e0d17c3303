//! Log severities and the per-call record value.

/// Severity of a log call.
///
/// All four severities share identical delivery semantics; severity is not
/// encoded in the delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single log record bound for a sink's delivery queue.
///
/// Created once per logging call and consumed exactly once by the sink's
/// delivery loop. The destination fields repeat the owning sink's identity so
/// records stay self-describing when sinks are composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Destination group the record belongs to.
    pub group: String,
    /// Destination stream within the group.
    pub stream: String,
    /// Preformatted message text.
    pub message: String,
}

impl LogRecord {
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        stream: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            stream: stream.into(),
            message: message.into(),
        }
    }
}
