//! Rotating local file sink.
//!
//! Same queue-and-delivery-task shape as the remote sink, writing
//! newline-terminated messages to `<prefix>.<n>.log` files in a directory.
//! A file is rotated before a write would push it past the configured maximum
//! size. Numbering continues after the highest index already present, so a
//! restarted process never clobbers earlier logs.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::error::SinkError;
use crate::record::{LogLevel, LogRecord};
use crate::sink::{LogSink, SINK_QUEUE_CAPACITY};

/// Sink appending records to rotating files under a fixed directory.
pub struct FileSink {
    directory: String,
    prefix: String,
    tx: Mutex<Option<mpsc::Sender<LogRecord>>>,
    done: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FileSink {
    /// Creates the directory if needed, opens the next log file, and starts
    /// the delivery task.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn new(
        directory: &str,
        prefix: &str,
        max_file_size: u64,
    ) -> Result<Self, SinkError> {
        if max_file_size == 0 {
            return Err(SinkError::InvalidConfig(
                "max log file size must be greater than 0".to_string(),
            ));
        }
        if prefix.trim().is_empty() {
            return Err(SinkError::InvalidConfig(
                "log file prefix cannot be empty".to_string(),
            ));
        }

        let writer = LogFileWriter::create(directory, prefix, max_file_size).await?;

        let (tx, rx) = mpsc::channel::<LogRecord>(SINK_QUEUE_CAPACITY);
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(write_logs(rx, writer, done_tx));

        Ok(Self {
            directory: directory.to_string(),
            prefix: prefix.to_string(),
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

/// Single-consumer write loop. Terminates only when the queue is closed and
/// fully drained, then fires the completion signal.
async fn write_logs(
    mut rx: mpsc::Receiver<LogRecord>,
    mut writer: LogFileWriter,
    done: oneshot::Sender<()>,
) {
    while let Some(record) = rx.recv().await {
        if let Err(e) = writer.append(&record.message).await {
            error!("FILE | Failed to write log record: {e}");
        }
    }

    if let Err(e) = writer.file.sync_all().await {
        error!("FILE | Failed to sync log file on shutdown: {e}");
    }
    debug!("FILE | Delivery queue drained, stopping");
    let _ = done.send(());
}

#[async_trait]
impl LogSink for FileSink {
    /// Enqueues one record. Blocks only while the queue is full.
    async fn log(&self, _level: LogLevel, message: String) {
        let record = LogRecord::new(self.directory.as_str(), self.prefix.as_str(), message);
        let tx = self.sender();
        if tx.send(record).await.is_err() {
            error!("FILE | Log record dropped: delivery task stopped");
        }
    }

    #[allow(clippy::expect_used)]
    async fn close(&self) -> Result<(), SinkError> {
        drop(self.tx.lock().expect("lock poisoned").take());

        let done = self.done.lock().expect("lock poisoned").take();
        if let Some(done) = done {
            let _ = done.await;
        }
        Ok(())
    }
}

/// Appends lines to the current `<prefix>.<n>.log` file, rotating before a
/// write would exceed `max_file_size`.
struct LogFileWriter {
    directory: PathBuf,
    prefix: String,
    max_file_size: u64,
    index: u64,
    file: File,
    written: u64,
}

impl LogFileWriter {
    async fn create(directory: &str, prefix: &str, max_file_size: u64) -> Result<Self, SinkError> {
        let directory = PathBuf::from(directory);
        fs::create_dir_all(&directory).await.map_err(|e| {
            SinkError::LogFiles(format!(
                "failed to create directory {}: {e}",
                directory.display()
            ))
        })?;

        let index = next_index(&directory, prefix)
            .await
            .map_err(|e| SinkError::LogFiles(format!("failed to scan existing logs: {e}")))?;
        let path = log_file_path(&directory, prefix, index);
        let file = open_log_file(&path).await?;

        Ok(Self {
            directory,
            prefix: prefix.to_string(),
            max_file_size,
            index,
            file,
            written: 0,
        })
    }

    async fn append(&mut self, message: &str) -> std::io::Result<()> {
        let line_len = message.len() as u64 + 1;
        if self.written > 0 && self.written + line_len > self.max_file_size {
            self.rotate().await?;
        }

        self.file.write_all(message.as_bytes()).await?;
        self.file.write_all(b"\n").await?;
        self.file.flush().await?;
        self.written += line_len;
        Ok(())
    }

    async fn rotate(&mut self) -> std::io::Result<()> {
        self.file.sync_all().await?;
        self.index += 1;
        let path = log_file_path(&self.directory, &self.prefix, self.index);
        self.file = OpenOptions::new().create(true).append(true).open(path).await?;
        self.written = 0;
        Ok(())
    }
}

async fn open_log_file(path: &Path) -> Result<File, SinkError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| SinkError::LogFiles(format!("failed to open {}: {e}", path.display())))
}

fn log_file_path(directory: &Path, prefix: &str, index: u64) -> PathBuf {
    directory.join(format!("{prefix}.{index}.log"))
}

/// Index of the next log file: one past the highest `<prefix>.<n>.log`
/// already present, or 0 for a fresh directory.
async fn next_index(directory: &Path, prefix: &str) -> std::io::Result<u64> {
    let mut highest: Option<u64> = None;
    let mut entries = fs::read_dir(directory).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(index) = parse_index(name, prefix) {
            highest = Some(highest.map_or(index, |h| h.max(index)));
        }
    }
    Ok(highest.map_or(0, |h| h + 1))
}

fn parse_index(name: &str, prefix: &str) -> Option<u64> {
    name.strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_suffix(".log")?
        .parse()
        .ok()
}
