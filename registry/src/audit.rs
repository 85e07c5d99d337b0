//! Append-only entry/exit log.
//!
//! The registry never writes the log itself. It hands each [`AuditEvent`] to
//! an [`AuditHandle`], which forwards it to a worker task owning the sink.
//! Sink failures are logged and dropped so they can never undo a park or a
//! release.

use futures::sink::SinkExt;
use log::{debug, warn};
use std::future::Future;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs::{File, OpenOptions};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::codec::FramedWrite;

use shared::audit::{AuditEncoder, AuditEvent};

/// File the reference driver appends to.
pub const DEFAULT_LOG_FILE: &str = "parking_log.txt";

pub trait AuditSink: Send + 'static {
    fn record(&mut self, event: AuditEvent) -> impl Future<Output = io::Result<()>> + Send;
}

/// Appends one line per event to a file.
pub struct FileSink {
    writer: FramedWrite<File, AuditEncoder>,
}

impl FileSink {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .await?;
        debug!("Opened audit log {}", path.as_ref().display());
        Ok(FileSink {
            writer: FramedWrite::new(file, AuditEncoder {}),
        })
    }
}

impl AuditSink for FileSink {
    async fn record(&mut self, event: AuditEvent) -> io::Result<()> {
        self.writer.send(event).await
    }
}

/// Keeps events in memory; clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemorySink {
    async fn record(&mut self, event: AuditEvent) -> io::Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}

pub struct NullSink;

impl AuditSink for NullSink {
    async fn record(&mut self, _event: AuditEvent) -> io::Result<()> {
        Ok(())
    }
}

pub enum AuditCommand {
    Record(AuditEvent),
    Flush(oneshot::Sender<()>), // Answered once every earlier event has been handed to the sink
}

/// Cheap, cloneable sender side of the audit worker.
#[derive(Clone)]
pub struct AuditHandle {
    tx: UnboundedSender<AuditCommand>,
}

impl AuditHandle {
    pub fn from_sender(tx: UnboundedSender<AuditCommand>) -> Self {
        AuditHandle { tx }
    }

    /// Queue an event without waiting for it to be written.
    pub fn record(&self, event: AuditEvent) {
        if self.tx.send(AuditCommand::Record(event)).is_err() {
            warn!("Audit worker has stopped, dropping event");
        }
    }

    /// Wait until everything queued so far has reached the sink.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(AuditCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

/// Start a worker task that drains events into `sink`.
///
/// Must be called from within a tokio runtime.
pub fn spawn<S: AuditSink>(sink: S) -> AuditHandle {
    let (tx, rx) = mpsc::unbounded_channel::<AuditCommand>();

    tokio::spawn(async move {
        audit_worker(rx, sink).await;
    });

    AuditHandle { tx }
}

async fn audit_worker<S: AuditSink>(rx: UnboundedReceiver<AuditCommand>, mut sink: S) {
    let mut commands = UnboundedReceiverStream::new(rx);

    while let Some(command) = commands.next().await {
        match command {
            AuditCommand::Record(event) => {
                let ticket_id = event.ticket_id;
                if let Err(e) = sink.record(event).await {
                    warn!("Failed to record audit event for ticket {}: {}", ticket_id, e);
                }
            }
            AuditCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Audit worker stopped");
}
