//! Log sink - infrastructure layer
//!
//! Runs report progress as timestamped lines. The core only needs "send a line
//! and never block on it"; where the lines end up is decided by the process.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, info, warn};

/// Receives progress lines. Implementations must not block.
pub trait LogSink: Send + Sync {
    fn send(&self, line: String);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn send(&self, _line: String) {}
}

/// Bounded channel sink. A full or closed channel drops the line.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    /// Create the process-wide log channel.
    ///
    /// The receiver must be drained by a separate consumer task.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl LogSink for ChannelSink {
    fn send(&self, line: String) {
        match self.tx.try_send(line) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::debug!("log channel full, line dropped");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// Per-run logger
///
/// Every message goes both to `tracing` and, timestamped and labelled with the
/// run, to the shared sink.
#[derive(Clone)]
pub struct RunLog {
    label: String,
    sink: Arc<dyn LogSink>,
}

impl RunLog {
    pub fn new(label: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            label: label.into(),
            sink,
        }
    }

    /// Logger that only writes to `tracing`
    pub fn detached(label: impl Into<String>) -> Self {
        Self::new(label, Arc::new(NullSink))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn info(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        info!("[{}] {}", self.label, message);
        self.forward(message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        warn!("[{}] {}", self.label, message);
        self.forward(message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        error!("[{}] {}", self.label, message);
        self.forward(message);
    }

    fn forward(&self, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.sink
            .send(format!("{} - [{}] {}", timestamp, self.label, message));
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
