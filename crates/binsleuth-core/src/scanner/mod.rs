/// Scanner module. Runs the build and the classification pass.
///
/// The algorithms themselves are synchronous ([`classify_all`] blocks the
/// caller). For an interactive host, [`start_scan`] runs both phases on a
/// background thread and writes into a **shared `LiveTree`**
/// (`Arc<RwLock<Option<FileTree>>>`) so the UI can render ratios that fill
/// in while files are classified. Progress travels over a bounded
/// crossbeam channel.
///
/// Exactly one pass runs against a given tree: the scanner thread is the
/// only writer, and it only ever sets file verdicts.
pub mod classify;
pub mod progress;

pub use classify::{classify_all, classify_all_with_cancel, classify_live, ClassifyOutcome};
pub use progress::{Milestone, MilestoneSchedule, ScanProgress};

use crate::error::{ScanError, TreeError};
use crate::model::{normalize_path, FileTree};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// A shared, concurrently-readable tree.
///
/// `None` until the scanner thread has finished building. The scanner holds
/// the write lock briefly when applying a batch of verdicts; the UI holds a
/// read lock while it renders.
pub type LiveTree = Arc<RwLock<Option<FileTree>>>;

/// Maximum number of progress messages that may queue up in the channel.
///
/// A pass sends at most ten milestones plus one message per unreadable
/// directory, so this only fills on trees with thousands of unreadable
/// directories and a UI that has stopped draining; the scanner then waits
/// rather than growing the heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Shared tree, published once the build finishes.
    pub live_tree: LiveTree,
    /// Normalised root being scanned.
    pub root: PathBuf,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop before the next file.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Start a new scan of `root_path` on a background thread.
///
/// The root is validated here, on the caller's thread, so an invalid path
/// is reported immediately and no thread is started.
pub fn start_scan(root_path: impl AsRef<Path>) -> Result<ScanHandle, ScanError> {
    let root = normalize_path(root_path.as_ref())?;
    if !root.is_dir() {
        return Err(TreeError::NotADirectory(root).into());
    }

    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let live_tree: LiveTree = Arc::new(RwLock::new(None));
    let tree_clone = live_tree.clone();
    let thread_root = root.clone();

    let thread = thread::Builder::new()
        .name("binsleuth-scanner".into())
        .spawn(move || run_scan(thread_root, progress_tx, cancel_clone, tree_clone))
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        live_tree,
        root,
        cancel_flag,
        _thread: Some(thread),
    })
}

/// Body of the scanner thread: build, publish, classify.
fn run_scan(
    root: PathBuf,
    progress_tx: Sender<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    live_tree: LiveTree,
) {
    let start = Instant::now();
    info!("Starting scan of {}", root.display());

    let tree = match FileTree::build(&root) {
        Ok(tree) => tree,
        Err(err) => {
            warn!("Scan of {} failed: {err}", root.display());
            let _ = progress_tx.send(ScanProgress::Failed {
                message: err.to_string(),
            });
            return;
        }
    };

    let total_files = tree.total_files(tree.root());
    let entries = tree.len();
    let listing_errors = tree.listing_errors().to_vec();
    *live_tree.write() = Some(tree);

    let _ = progress_tx.send(ScanProgress::TreeBuilt {
        total_files,
        entries,
        listing_errors: listing_errors.len(),
    });
    for err in listing_errors {
        let _ = progress_tx.send(ScanProgress::ListingError {
            path: err.path,
            message: err.message,
        });
    }

    let outcome = classify_live(&live_tree, &cancel_flag, |milestone| {
        let _ = progress_tx.send(ScanProgress::Milestone(milestone));
    });

    let duration = start.elapsed();
    match outcome {
        ClassifyOutcome::Completed { processed } => {
            info!(
                "Scan of {} complete: {processed} files in {duration:?}",
                root.display()
            );
            let _ = progress_tx.send(ScanProgress::Complete {
                duration,
                processed,
            });
        }
        ClassifyOutcome::Cancelled { processed } => {
            let _ = progress_tx.send(ScanProgress::Cancelled { processed });
        }
    }
}
