//! Encoder progress tracking.
//!
//! ffmpeg reports its position on stderr as `time=HH:MM:SS.ff`. The
//! [`ProgressMonitor`] reads that stream while the encoder runs, keeps every
//! byte for error reporting, and publishes the furthest timestamp seen into
//! an atomic counter. [`ProgressHandle`]s read the counter from elsewhere.
//!
//! The monitor is the only writer. Readers may observe a slightly stale
//! value, which only affects display freshness.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read size for the diagnostic stream.
const CHUNK_SIZE: usize = 4096;

/// Bytes of already-scanned output re-scanned with each new chunk, so a
/// timestamp split across two reads is still found.
const SCAN_OVERLAP: usize = 32;

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"time=([0-9]{2,6}):([0-9]{2}):([0-9]{2})\.([0-9]{2})").expect("timestamp regex is valid")
    })
}

/// Extract the last `time=HH:MM:SS.ff` token in `text` as milliseconds.
///
/// Hours are limited to six ASCII digits.
pub fn parse_timestamp(text: &str) -> Option<u64> {
    let caps = timestamp_re().captures_iter(text).last()?;
    let field = |i: usize| caps[i].parse::<u64>().ok();
    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let hundredths = field(4)?;
    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(hundredths * 10)
}

/// Writer side: consumes the encoder's stderr.
#[derive(Debug)]
pub struct ProgressMonitor {
    total_ms: u64,
    elapsed_ms: Arc<AtomicU64>,
}

/// Reader side: a cheap, cloneable view of the monitor's counter.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    total_ms: u64,
    elapsed_ms: Arc<AtomicU64>,
}

impl ProgressMonitor {
    /// Create a monitor for an encode whose output lasts `total_ms`.
    pub fn new(total_ms: u64) -> Self {
        Self {
            total_ms,
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A read-only handle onto this monitor's progress.
    pub fn handle(&self) -> ProgressHandle {
        ProgressHandle {
            total_ms: self.total_ms,
            elapsed_ms: Arc::clone(&self.elapsed_ms),
        }
    }

    /// Scan a piece of diagnostic text and advance the counter.
    ///
    /// The counter never moves backwards.
    pub fn observe(&self, text: &str) {
        if let Some(ms) = parse_timestamp(text) {
            self.elapsed_ms.fetch_max(ms, Ordering::Relaxed);
        }
    }

    /// Read `reader` to the end, returning every byte read.
    ///
    /// Read errors end the stream; whatever was buffered so far is returned.
    pub async fn consume<R>(self, mut reader: R) -> Vec<u8>
    where
        R: AsyncRead + Unpin,
    {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];

        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    let window_start = buffer.len().saturating_sub(SCAN_OVERLAP);
                    buffer.extend_from_slice(&chunk[..n]);
                    self.observe(&String::from_utf8_lossy(&buffer[window_start..]));
                }
                Err(e) => {
                    tracing::debug!("diagnostic stream closed: {e}");
                    break;
                }
            }
        }

        buffer
    }
}

impl ProgressHandle {
    /// Furthest encoder position seen so far, in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::Relaxed)
    }

    /// Total duration the encode is expected to cover.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Completion in `0.0..=1.0`. Zero when the total is unknown.
    pub fn fraction(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        (self.elapsed_ms() as f64 / self.total_ms as f64).clamp(0.0, 1.0)
    }
}
