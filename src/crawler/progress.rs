//! Crawl progress events
//!
//! The coordinator reports what it is doing through a bounded channel so a
//! consumer (the CLI, a UI, a test) can observe the crawl while it runs.
//! Every event is also logged through `tracing`.

use std::fmt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default capacity of the progress channel
pub const DEFAULT_PROGRESS_CAPACITY: usize = 256;

/// One observable step of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// The crawl began from this seed
    Started { seed: String },

    /// A request is about to be issued
    Fetching { url: String, depth: u32 },

    /// A page was fetched and stored
    Fetched {
        url: String,
        status_code: u16,
        size: usize,
    },

    /// A page could not be fetched; the crawl continues
    Failed { url: String, reason: String },

    /// The crawl ran to completion
    Completed { pages: usize },

    /// The crawl stopped on a cancellation request
    Aborted { pages: usize },
}

impl CrawlEvent {
    /// Whether this is the last event of a crawl
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Aborted { .. })
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { seed } => write!(f, "Starting crawl: {}", seed),
            Self::Fetching { url, depth } => write!(f, "Fetching (depth {}): {}", depth, url),
            Self::Fetched {
                url,
                status_code,
                size,
            } => write!(f, "Fetched {} ({}, {} bytes)", url, status_code, size),
            Self::Failed { url, reason } => write!(f, "Failed {}: {}", url, reason),
            Self::Completed { pages } => write!(f, "Crawl finished. Downloaded {} pages", pages),
            Self::Aborted { pages } => write!(f, "Crawl cancelled. Downloaded {} pages", pages),
        }
    }
}

/// Sending half of the progress channel
///
/// A reporter without a channel only logs. The channel keeps one slot free
/// for the terminal event; other events are dropped once only that slot is
/// left, so a slow consumer never stalls the crawl.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    sender: Option<mpsc::Sender<CrawlEvent>>,
}

impl ProgressReporter {
    /// Creates a reporter and the receiver that observes it
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_survey::crawler::{CrawlEvent, ProgressReporter};
    ///
    /// # async fn demo() {
    /// let (progress, mut events) = ProgressReporter::channel(16);
    /// progress.emit(CrawlEvent::Started { seed: "https://example.com/".into() });
    /// assert!(events.recv().await.is_some());
    /// # }
    /// ```
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CrawlEvent>) {
        // One extra slot is reserved for `finish`
        let (sender, receiver) = mpsc::channel(capacity.max(1) + 1);
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A reporter that only logs
    pub fn silent() -> Self {
        Self::default()
    }

    /// Logs the event and forwards it without waiting
    pub fn emit(&self, event: CrawlEvent) {
        log_event(&event);
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.capacity() <= 1 {
            tracing::debug!("Progress channel full, dropping event: {}", event);
            return;
        }
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!("Progress channel full, dropping event: {}", event);
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Logs the terminal event and forwards it into the reserved slot
    pub fn finish(&self, event: CrawlEvent) {
        log_event(&event);
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(TrySendError::Full(event)) = sender.try_send(event) {
            tracing::warn!("Progress channel full, dropping terminal event: {}", event);
        }
    }
}

fn log_event(event: &CrawlEvent) {
    match event {
        CrawlEvent::Fetching { .. } => tracing::debug!("{}", event),
        CrawlEvent::Failed { .. } => tracing::warn!("{}", event),
        _ => tracing::info!("{}", event),
    }
}
