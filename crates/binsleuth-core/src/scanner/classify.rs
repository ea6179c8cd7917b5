/// The classification pass. Visits every file once, records its verdict,
/// and reports milestones.
///
/// Two entry points share one loop:
/// - [`classify_all`] / [`classify_all_with_cancel`] run on the caller's
///   thread against a `&mut FileTree`.
/// - [`classify_live`] runs on the scanner thread against the shared
///   `LiveTree`. Files are read *outside* the lock and verdicts are applied
///   in batches under a single short write lock, so readers rendering the
///   tree are never held up by file I/O.
///
/// Files are visited in arena order. Files that already carry a verdict
/// are counted but not read again. A file that cannot be read is
/// classified text by the classifier and never stops the pass.
use super::progress::{Milestone, MilestoneSchedule};
use super::LiveTree;
use crate::classifier;
use crate::model::{FileTree, FileVerdict, NodeIndex};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Verdicts buffered before they are applied under one write lock.
pub const APPLY_BATCH: usize = 256;

/// How a classification pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyOutcome {
    Completed { processed: u64 },
    Cancelled { processed: u64 },
}

impl ClassifyOutcome {
    pub fn processed(self) -> u64 {
        match self {
            Self::Completed { processed } | Self::Cancelled { processed } => processed,
        }
    }
}

/// One file to visit.
struct FileJob {
    index: NodeIndex,
    path: PathBuf,
    classified: bool,
}

fn collect_jobs(tree: &FileTree) -> Vec<FileJob> {
    tree.file_indices()
        .into_iter()
        .map(|index| FileJob {
            index,
            path: tree.full_path(index).to_path_buf(),
            classified: tree.classification(index).is_known(),
        })
        .collect()
}

/// Classify every file in the tree, blocking until done.
///
/// `on_milestone` fires at roughly every 10% of the files and always once
/// at 100%. A tree without files returns immediately without a milestone.
pub fn classify_all<F>(tree: &mut FileTree, on_milestone: F)
where
    F: FnMut(Milestone),
{
    let never = AtomicBool::new(false);
    classify_all_with_cancel(tree, &never, on_milestone);
}

/// [`classify_all`] with cooperative cancellation, checked between files.
pub fn classify_all_with_cancel<F>(
    tree: &mut FileTree,
    cancel: &AtomicBool,
    on_milestone: F,
) -> ClassifyOutcome
where
    F: FnMut(Milestone),
{
    let total = tree.total_files(tree.root());
    let jobs = collect_jobs(tree);
    run_pass(
        jobs,
        total,
        cancel,
        |batch| {
            for (index, verdict) in batch.drain(..) {
                tree.set_verdict(index, verdict);
            }
        },
        on_milestone,
    )
}

/// Classify the tree held in `live_tree`, applying verdicts in batches.
///
/// Returns `Completed { processed: 0 }` if no tree has been published.
pub fn classify_live<F>(live_tree: &LiveTree, cancel: &AtomicBool, on_milestone: F) -> ClassifyOutcome
where
    F: FnMut(Milestone),
{
    let (jobs, total) = {
        let guard = live_tree.read();
        match guard.as_ref() {
            Some(tree) => (collect_jobs(tree), tree.total_files(tree.root())),
            None => return ClassifyOutcome::Completed { processed: 0 },
        }
    };

    run_pass(
        jobs,
        total,
        cancel,
        |batch| {
            let mut guard = live_tree.write();
            if let Some(tree) = guard.as_mut() {
                for (index, verdict) in batch.drain(..) {
                    tree.set_verdict(index, verdict);
                }
            } else {
                batch.clear();
            }
        },
        on_milestone,
    )
}

/// The shared loop. `apply` must drain the batch it is given.
///
/// Pending verdicts are applied before every milestone, so whoever reacts
/// to a milestone sees at least the state it describes.
fn run_pass<A, F>(
    jobs: Vec<FileJob>,
    total: u64,
    cancel: &AtomicBool,
    mut apply: A,
    mut on_milestone: F,
) -> ClassifyOutcome
where
    A: FnMut(&mut Vec<(NodeIndex, FileVerdict)>),
    F: FnMut(Milestone),
{
    debug_assert_eq!(jobs.len() as u64, total, "file count drifted from the tree");

    if total == 0 {
        info!("No files to classify");
        return ClassifyOutcome::Completed { processed: 0 };
    }

    info!("Classifying {total} files");

    let mut schedule = MilestoneSchedule::new(total);
    let mut pending: Vec<(NodeIndex, FileVerdict)> = Vec::with_capacity(APPLY_BATCH);
    let mut processed: u64 = 0;

    for job in jobs {
        if cancel.load(Ordering::Relaxed) {
            apply(&mut pending);
            info!("Classification cancelled after {processed} of {total} files");
            return ClassifyOutcome::Cancelled { processed };
        }

        if !job.classified {
            pending.push((job.index, classifier::classify_file(&job.path)));
        }
        processed += 1;

        let milestone = schedule.observe(processed);
        if pending.len() >= APPLY_BATCH || milestone.is_some() {
            apply(&mut pending);
        }
        if let Some(milestone) = milestone {
            info!("{milestone}");
            on_milestone(milestone);
        }
    }

    apply(&mut pending);
    ClassifyOutcome::Completed { processed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::model::Classification;
    use parking_lot::RwLock;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn tree_with_files(n: usize) -> (TempDir, FileTree) {
        let tmp = TempDir::new().unwrap();
        for i in 0..n {
            let sub = tmp.path().join(format!("d{}", i % 3));
            fs::create_dir_all(&sub).unwrap();
            let bytes: &[u8] = if i % 2 == 0 { b"text" } else { &[0, 1, 2] };
            fs::write(sub.join(format!("f{i}")), bytes).unwrap();
        }
        let tree = FileTree::build(tmp.path()).unwrap();
        (tmp, tree)
    }

    #[test]
    fn test_empty_tree_fires_nothing() {
        let (_tmp, mut tree) = tree_with_files(0);
        let mut fired = Vec::new();
        classify_all(&mut tree, |m| fired.push(m));
        assert!(fired.is_empty());
    }

    #[test]
    fn test_final_milestone_for_23_files() {
        let (_tmp, mut tree) = tree_with_files(23);
        let mut fired = Vec::new();
        classify_all(&mut tree, |m| fired.push(m));

        let last = fired.last().expect("at least one milestone");
        assert_eq!(last.processed, 23);
        assert_eq!(last.total, 23);
        assert_eq!(last.percent, 100);
        assert_eq!(fired.len(), 10);
        assert!(fired.windows(2).all(|w| w[0].processed < w[1].processed));
    }

    #[test]
    fn test_every_file_classified_once() {
        let (_tmp, mut tree) = tree_with_files(7);
        classify_all(&mut tree, |_| {});
        for idx in tree.file_indices() {
            assert!(tree.classification(idx).is_known());
            assert!(tree.node(idx).size().is_some());
        }
        let stats = aggregate(&tree, tree.root());
        assert_eq!(stats.binary_count, 3);
        assert_eq!(stats.text_count, 4);
    }

    #[test]
    fn test_second_pass_keeps_verdicts() {
        let (tmp, mut tree) = tree_with_files(4);
        classify_all(&mut tree, |_| {});
        let before: Vec<_> = tree.file_indices().iter().map(|&i| tree.classification(i)).collect();

        // Rewrite every file as binary; the tree must not notice.
        for idx in tree.file_indices() {
            fs::write(tree.full_path(idx), [0u8; 8]).unwrap();
        }
        let mut fired = Vec::new();
        classify_all(&mut tree, |m| fired.push(m));
        let after: Vec<_> = tree.file_indices().iter().map(|&i| tree.classification(i)).collect();

        assert_eq!(before, after);
        assert_eq!(fired.last().map(|m| m.percent), Some(100));
        drop(tmp);
    }

    #[test]
    fn test_cancel_before_start() {
        let (_tmp, mut tree) = tree_with_files(5);
        let cancel = AtomicBool::new(true);
        let outcome = classify_all_with_cancel(&mut tree, &cancel, |_| {});
        assert_eq!(outcome, ClassifyOutcome::Cancelled { processed: 0 });
        assert!(tree
            .file_indices()
            .iter()
            .all(|&i| tree.classification(i) == Classification::Unknown));
    }

    #[test]
    fn test_cancel_from_milestone_stops_the_pass() {
        let (_tmp, mut tree) = tree_with_files(20);
        let cancel = AtomicBool::new(false);
        let outcome = classify_all_with_cancel(&mut tree, &cancel, |m| {
            if m.processed >= 10 {
                cancel.store(true, Ordering::Relaxed);
            }
        });
        assert_eq!(outcome, ClassifyOutcome::Cancelled { processed: 10 });

        // Verdicts up to the cancellation point were applied.
        let stats = aggregate(&tree, tree.root());
        assert_eq!(stats.assessed(), 10);
        assert_eq!(stats.total_files, 20);
    }

    #[test]
    fn test_live_pass_matches_blocking_pass() {
        let (_tmp, tree) = tree_with_files(600);
        let mut reference = tree.clone();
        classify_all(&mut reference, |_| {});

        let live: LiveTree = Arc::new(RwLock::new(Some(tree)));
        let cancel = AtomicBool::new(false);
        let outcome = classify_live(&live, &cancel, |_| {});
        assert_eq!(outcome, ClassifyOutcome::Completed { processed: 600 });

        let guard = live.read();
        let classified = guard.as_ref().unwrap();
        assert_eq!(
            aggregate(classified, classified.root()),
            aggregate(&reference, reference.root())
        );
    }

    #[test]
    fn test_live_pass_without_tree() {
        let live: LiveTree = Arc::new(RwLock::new(None));
        let outcome = classify_live(&live, &AtomicBool::new(false), |_| {});
        assert_eq!(outcome, ClassifyOutcome::Completed { processed: 0 });
    }
}
