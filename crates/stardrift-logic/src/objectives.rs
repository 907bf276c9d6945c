//! Rescue objective tallying.
//!
//! A distress event tracks a set of objectives, each pending, completed,
//! or failed. The per-tick scan reduces the set to a single outcome:
//! keep going, end now in failure (a critical objective failed), or all
//! objectives have reached a terminal state. Because completion can
//! regress (a stabilised patient can deteriorate again), a provisional
//! all-terminal result must stay stable for a debounce window before the
//! event actually ends; the re-validation predicate lives here too.

use serde::{Deserialize, Serialize};

/// Seconds a provisional outcome must remain stable before the event ends.
pub const DEBOUNCE_DELAY: f64 = 15.0;

/// Where one objective stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveStatus {
    Pending,
    Completed,
    Failed {
        /// A critical failure ends the whole event immediately.
        critical: bool,
    },
}

impl ObjectiveStatus {
    /// Completed or failed, either way no longer pending.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Result of scanning every objective once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A critical objective failed; end immediately in failure.
    CriticalFailure,
    /// Every objective is terminal. Success iff at least one completed.
    AllResolved { success: bool },
    /// Still waiting on pending objectives.
    InProgress { completed: usize, failed: usize },
}

/// Reduce a set of objective statuses to a scan outcome.
///
/// A critical failure short-circuits the rest of the scan.
pub fn tally(statuses: &[ObjectiveStatus]) -> ScanOutcome {
    let mut completed = 0;
    let mut failed = 0;

    for status in statuses {
        match status {
            ObjectiveStatus::Failed { critical: true } => return ScanOutcome::CriticalFailure,
            ObjectiveStatus::Failed { critical: false } => failed += 1,
            ObjectiveStatus::Completed => completed += 1,
            ObjectiveStatus::Pending => {}
        }
    }

    if completed + failed >= statuses.len() {
        ScanOutcome::AllResolved {
            success: completed > 0,
        }
    } else {
        ScanOutcome::InProgress { completed, failed }
    }
}

/// Debounce re-validation: the provisional outcome stands only while no
/// objective has reverted to pending.
pub fn all_terminal(statuses: &[ObjectiveStatus]) -> bool {
    statuses.iter().all(|status| status.is_terminal())
}
