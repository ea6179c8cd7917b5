/// Scan progress reporting: milestones and the lightweight messages sent
/// from the scan thread to the UI thread via a crossbeam channel.
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Number of progress steps per pass (one milestone per ~10%).
pub const MILESTONE_STEPS: u64 = 10;

/// A progress report fired when a classification pass crosses a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    /// `processed * 100 / total`, rounded down.
    pub percent: u8,
    pub processed: u64,
    pub total: u64,
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% done ({} of {})",
            self.percent, self.processed, self.total
        )
    }
}

/// Thresholds at which milestones fire during a pass over `total` files.
///
/// The thresholds are the distinct non-zero values of
/// `floor(k * total / 10)` for `k` in `1..=9`, followed by `total` itself.
/// Each fires once, the first time the processed count reaches it. Because
/// the last threshold is always `total`, a completed pass always ends with
/// exactly one 100% milestone, however `total` divides by ten.
#[derive(Debug, Clone)]
pub struct MilestoneSchedule {
    thresholds: Vec<u64>,
    next: usize,
    total: u64,
}

impl MilestoneSchedule {
    pub fn new(total: u64) -> Self {
        let mut thresholds: Vec<u64> = (1..MILESTONE_STEPS)
            .map(|k| k * total / MILESTONE_STEPS)
            .filter(|&t| t > 0)
            .collect();
        if total > 0 {
            thresholds.push(total);
        }
        thresholds.dedup();

        Self {
            thresholds,
            next: 0,
            total,
        }
    }

    /// Remaining-and-passed thresholds, ascending.
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    /// Report the processed count; returns a milestone if it reached the
    /// next pending threshold.
    pub fn observe(&mut self, processed: u64) -> Option<Milestone> {
        let mut reached = false;
        while self
            .thresholds
            .get(self.next)
            .is_some_and(|&t| processed >= t)
        {
            self.next += 1;
            reached = true;
        }

        reached.then(|| Milestone {
            percent: (processed.min(self.total) * 100 / self.total) as u8,
            processed,
            total: self.total,
        })
    }

    /// `true` once the final threshold has fired (or there was none).
    pub fn is_finished(&self) -> bool {
        self.next >= self.thresholds.len()
    }
}

/// Progress updates sent from the scan thread to the UI.
///
/// The tree itself is in the shared `LiveTree`; these messages carry only
/// counters and status.
#[derive(Debug)]
pub enum ScanProgress {
    /// The tree has been built and published to the `LiveTree`.
    TreeBuilt {
        total_files: u64,
        entries: usize,
        listing_errors: usize,
    },
    /// A directory could not be listed; its subtree is treated as empty.
    ListingError { path: PathBuf, message: String },
    /// The classification pass crossed a milestone threshold.
    Milestone(Milestone),
    /// Every file has been classified.
    Complete { duration: Duration, processed: u64 },
    /// The scan was cancelled by the user; partial verdicts stay in the tree.
    Cancelled { processed: u64 },
    /// The root vanished between validation and the build.
    Failed { message: String },
}
