//! # Cloudtail Logging
//!
//! Pluggable log sinks for cloud-hosted applications. Application code holds a
//! single [`Logger`] facade and issues `debug`/`info`/`warn`/`error` calls
//! against it for the process lifetime; the facade forwards to one or more
//! sinks, each of which delivers records asynchronously.
//!
//! ## Architecture
//!
//! ```text
//!   Application
//!       │
//!       v
//!   ┌─────────────┐
//!   │   Logger    │  (facade, backend selected from config)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │  LogSink    │  (remote stream, rotating files, or a composite)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │   Queue     │  (mpsc, bounded: backpressure, never drops)
//!   └──────┬──────┘
//!          │
//!          v
//!   ┌─────────────┐
//!   │  Delivery   │  (one background task per sink, FIFO)
//!   └─────────────┘
//! ```
//!
//! ## Shutdown
//!
//! Closing a sink stops further emits and blocks until every queued record has
//! been attempted for delivery. Delivery failures are logged and swallowed; a
//! failed record is never retried.

#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(unused_extern_crates)]
#![deny(unreachable_pub)]

/// Fan-out sink broadcasting each record to an ordered set of member sinks
pub mod composite;

/// Backend-selection configuration for the logger facade
pub mod config;

/// Error taxonomy for sink construction, delivery, and shutdown
pub mod error;

/// Single logging entry point the rest of the application depends on
pub mod facade;

/// Rotating local file sink
pub mod file;

/// Log severities and the per-call record value
pub mod record;

/// Remote log stream sink with asynchronous delivery
pub mod remote;

/// The logging capability every sink implements
pub mod sink;

pub use composite::CompositeSink;
pub use config::LoggerConfig;
pub use error::SinkError;
pub use facade::Logger;
pub use file::FileSink;
pub use record::{LogLevel, LogRecord};
pub use remote::{RemoteSink, StreamSinkConfig};
pub use sink::LogSink;
