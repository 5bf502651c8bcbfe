/// Region state definitions for tracking harvest progress
///
/// A region moves `NotStarted -> ListLoaded -> Processing -> Complete`, or
/// straight from `NotStarted` to `Skipped` when an earlier run finished it.
use std::fmt;

/// Represents the current state of a region in one harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionState {
    // ===== Active States =====
    /// Nothing has happened for this region yet
    NotStarted,

    /// The record list is in memory (from cache or the listing API)
    ListLoaded,

    /// Records are being fetched and rows streamed to the CSV
    Processing,

    // ===== Terminal States =====
    /// CSV closed and checkpoint written
    Complete,

    /// Checkpoint already present; nothing was done
    Skipped,
}

impl RegionState {
    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: RegionState) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::ListLoaded)
                | (Self::NotStarted, Self::Skipped)
                | (Self::ListLoaded, Self::Processing)
                | (Self::Processing, Self::Complete)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::ListLoaded => "list_loaded",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RegionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
