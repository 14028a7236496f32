//! Crawl session state definitions
//!
//! A session starts `Idle`, becomes `Running` once the seed has been
//! validated, and ends `Completed` (frontier exhausted or page cap reached)
//! or `Aborted` (cancelled between frontier iterations).
use std::fmt;

/// Represents the lifecycle state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Session created, nothing fetched yet
    Idle,

    /// The breadth-first loop is draining the frontier
    Running,

    /// The frontier is empty or the page cap was reached
    Completed,

    /// The session was cancelled before the frontier was exhausted
    Aborted,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Returns true if the given transition is allowed
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Aborted)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
