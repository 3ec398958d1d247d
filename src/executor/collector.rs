//! Output stream collection
//!
//! Each output channel of a child is drained by its own task. Chunks are
//! appended to a buffer behind an append lock and, when a sink is attached,
//! forwarded to it in the same order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Read chunk size for output pipes
const CHUNK_SIZE: usize = 8 * 1024;

/// Destination receiving a live copy of a stream
pub enum Sink {
    /// The process-wide standard output. Never closed.
    Stdout,
    /// The process-wide standard error. Never closed.
    Stderr,
    /// A writer owned by the execution, closed at finalization
    Writer(Box<dyn AsyncWrite + Send + Unpin>),
}

impl Sink {
    /// Wrap an async writer
    pub fn writer(writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Sink::Writer(Box::new(writer))
    }

    /// Wrap an already opened file
    pub fn file(file: std::fs::File) -> Self {
        Sink::writer(tokio::fs::File::from_std(file))
    }

    /// Whether this sink is one of the process-wide standard streams
    pub fn is_standard(&self) -> bool {
        matches!(self, Sink::Stdout | Sink::Stderr)
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = tokio::io::stdout();
                out.write_all(chunk).await?;
                out.flush().await
            }
            Sink::Stderr => {
                let mut err = tokio::io::stderr();
                err.write_all(chunk).await?;
                err.flush().await
            }
            Sink::Writer(writer) => writer.write_all(chunk).await,
        }
    }

    /// Flush and, for owned writers, shut the writer down
    pub async fn close(self) -> std::io::Result<()> {
        match self {
            Sink::Stdout | Sink::Stderr => Ok(()),
            Sink::Writer(mut writer) => {
                writer.flush().await?;
                writer.shutdown().await
            }
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Sink::Stdout"),
            Sink::Stderr => f.write_str("Sink::Stderr"),
            Sink::Writer(_) => f.write_str("Sink::Writer(..)"),
        }
    }
}

/// Bytes gathered by a collector once its stream is done
#[derive(Debug, Default)]
pub struct Collected {
    /// Everything read from the stream
    pub bytes: Vec<u8>,
    /// The sink handed back for closing
    pub sink: Option<Sink>,
    /// Whether the stream was read to end-of-file
    pub complete: bool,
}

/// Drains one child output stream in the background
pub struct StreamCollector {
    name: &'static str,
    buffer: Arc<Mutex<Vec<u8>>>,
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Option<Sink>>>,
}

impl StreamCollector {
    /// Spawn a task reading `source` until end-of-file or until stopped
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(name: &'static str, source: R, sink: Option<Sink>) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (stop, stopped) = oneshot::channel();
        let handle = tokio::spawn(drain(name, source, Arc::clone(&buffer), sink, stopped));

        Self {
            name,
            buffer,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Wait for end-of-file, at most `grace`, and take the buffer.
    ///
    /// If the stream is still open when `grace` runs out (a background
    /// grandchild may hold the pipe) the collector is stopped and whatever
    /// arrived so far is returned along with the sink.
    pub async fn finish(mut self, grace: Duration) -> Collected {
        let Some(mut handle) = self.handle.take() else {
            return Collected::default();
        };

        let (sink, complete) = match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(sink)) => (sink, true),
            Ok(Err(e)) => {
                tracing::warn!(stream = self.name, "Output collector failed: {}", e);
                (None, false)
            }
            Err(_) => {
                tracing::warn!(
                    stream = self.name,
                    "Stream still open {}ms after exit, stopping collector",
                    grace.as_millis()
                );
                (self.stop_task(handle, grace).await, false)
            }
        };

        Collected {
            bytes: std::mem::take(&mut *lock(&self.buffer)),
            sink,
            complete,
        }
    }

    /// Stop draining now and discard the collected bytes.
    ///
    /// The sink keeps everything forwarded so far and is handed back for
    /// closing.
    pub async fn detach(mut self, grace: Duration) -> Option<Sink> {
        let handle = self.handle.take()?;
        let sink = self.stop_task(handle, grace).await;
        lock(&self.buffer).clear();
        sink
    }

    /// Signal the drain task and wait for it to give its sink back.
    ///
    /// Only a sink write stuck for longer than `grace` gets the task aborted,
    /// losing the sink.
    async fn stop_task(
        &mut self,
        mut handle: JoinHandle<Option<Sink>>,
        grace: Duration,
    ) -> Option<Sink> {
        if let Some(stop) = self.stop.take() {
            // the task may already be done and the receiver gone
            let _ = stop.send(());
        }

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(sink)) => sink,
            Ok(Err(e)) => {
                tracing::warn!(stream = self.name, "Output collector failed: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!(stream = self.name, "Sink write blocked, abandoning sink");
                handle.abort();
                None
            }
        }
    }
}

impl Drop for StreamCollector {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn drain<R>(
    name: &'static str,
    mut source: R,
    buffer: Arc<Mutex<Vec<u8>>>,
    mut sink: Option<Sink>,
    mut stopped: oneshot::Receiver<()>,
) -> Option<Sink>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let read = tokio::select! {
            biased;
            _ = &mut stopped => {
                tracing::debug!(stream = name, "Collector stopped before end-of-file");
                break;
            }
            read = source.read(&mut chunk) => read,
        };
        let n = match read {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(stream = name, "Error reading output: {}", e);
                break;
            }
        };

        lock(&buffer).extend_from_slice(&chunk[..n]);

        let failed = match sink.as_mut() {
            Some(target) => target.write_chunk(&chunk[..n]).await.err(),
            None => None,
        };
        if let Some(e) = failed {
            tracing::warn!(stream = name, "Sink write failed, no longer forwarding: {}", e);
            sink = None;
        }
    }

    tracing::debug!(stream = name, bytes = lock(&buffer).len(), "Stream closed");
    sink
}

/// Decode captured bytes into result text.
///
/// Invalid UTF-8 yields an empty string. One trailing newline is removed,
/// then surrounding whitespace is trimmed.
pub fn decode_output(bytes: &[u8]) -> String {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return String::new();
    };
    text.strip_suffix('\n').unwrap_or(text).trim().to_string()
}
