/// End-to-end tests for the tree build, classification pass, aggregation
/// and the background scanner.
///
/// Every test builds a real directory tree under a `tempfile::TempDir`
/// and drives the public API only, with no mocking of the filesystem.
use binsleuth_core::scanner::{classify_all, start_scan, ScanHandle, ScanProgress};
use binsleuth_core::{aggregate, layout, AggregateStats, FileTree, ScanError, TreeError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

const BINARY_BYTES: [u8; 5] = [0x78, 0x03, 0xFF, 0x00, 0x64];

fn write(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

/// ```text
/// root/
///   a.txt   "hello"
///   b.dat   78 03 FF 00 64
///   c/
/// ```
fn build_small_tree(root: &Path) {
    write(&root.join("a.txt"), b"hello");
    write(&root.join("b.dat"), &BINARY_BYTES);
    fs::create_dir_all(root.join("c")).unwrap();
}

/// Two top-level branches, three levels deep, seven files:
///
/// ```text
/// root/
///   d1/d1/d1/{file1.txt, file2.txt, file3.dat}
///   d1/d2/{file1.txt, file2.dat}
///   d1/d2/d1/file1.dat
///   d2/d1/d1/file1.txt
/// ```
fn build_nested_tree(root: &Path) {
    let files = [
        "d1/d1/d1/file1.txt",
        "d1/d1/d1/file2.txt",
        "d1/d1/d1/file3.dat",
        "d1/d2/file1.txt",
        "d1/d2/file2.dat",
        "d1/d2/d1/file1.dat",
        "d2/d1/d1/file1.txt",
    ];
    for file in files {
        let path = root.join(file);
        if file.ends_with(".dat") {
            write(&path, &BINARY_BYTES);
        } else {
            write(&path, b"blabla");
        }
    }
}

/// Drain progress messages until the scan finishes, returning them all.
///
/// Waits up to 30 seconds: plenty for a tmpdir scan on any CI machine but
/// short enough that a stuck scanner does not hang the suite.
fn drain_to_completion(handle: &ScanHandle) -> Vec<ScanProgress> {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut messages = Vec::new();
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(msg) => {
                let done = matches!(
                    msg,
                    ScanProgress::Complete { .. }
                        | ScanProgress::Cancelled { .. }
                        | ScanProgress::Failed { .. }
                );
                messages.push(msg);
                if done {
                    return messages;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("scanner channel disconnected before the scan finished");
            }
        }
    }
}

fn sorted_paths(tree: &FileTree) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = tree.nodes().iter().map(|n| n.path.clone()).collect();
    paths.sort();
    paths
}

// ── Blocking API ─────────────────────────────────────────────────────────────

/// The small scenario: two files, one empty directory.
#[test]
fn small_tree_aggregates_after_classification() {
    let tmp = TempDir::new().unwrap();
    build_small_tree(tmp.path());

    let mut tree = FileTree::build(tmp.path()).unwrap();
    assert_eq!(tree.total_files(tree.root()), 2);
    assert_eq!(tree.len(), 4, "root, two files and c/");

    let mut milestones = Vec::new();
    classify_all(&mut tree, |m| milestones.push(m));

    assert_eq!(
        aggregate(&tree, tree.root()),
        AggregateStats {
            binary_count: 1,
            binary_bytes: 5,
            text_count: 1,
            text_bytes: 5,
            total_files: 2,
        }
    );
    let last = milestones.last().unwrap();
    assert_eq!((last.processed, last.total, last.percent), (2, 2, 100));
}

/// Seven files across three levels are counted before any classification.
#[test]
fn nested_tree_counts_seven_files() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());

    let tree = FileTree::build(tmp.path()).unwrap();
    assert_eq!(tree.total_files(tree.root()), 7);
    assert_eq!(aggregate(&tree, tree.root()).assessed(), 0);

    let root = tree.full_path(tree.root()).to_path_buf();
    let d1 = tree.lookup_by_path(&root.join("d1")).unwrap();
    let d2 = tree.lookup_by_path(&root.join("d2")).unwrap();
    assert_eq!(tree.total_files(d1), 6);
    assert_eq!(tree.total_files(d2), 1);
    assert!(tree.child_files(tree.root()).is_empty());
}

/// Directory ratios after a full pass, checked through the ratio bar.
#[test]
fn nested_tree_ratio_bar_after_classification() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());

    let mut tree = FileTree::build(tmp.path()).unwrap();
    classify_all(&mut tree, |_| {});

    let root_stats = aggregate(&tree, tree.root());
    assert_eq!(root_stats.binary_count, 3);
    assert_eq!(root_stats.text_count, 4);
    assert_eq!(root_stats.binary_bytes, 15);

    let bar = layout(Some(&root_stats));
    assert_eq!(bar.assessed_fraction, 1.0);
    assert!((bar.binary_fraction - 3.0 / 7.0).abs() < 1e-6);
    assert_eq!(bar.right_label, "7");
    assert_eq!(bar.left_label, "3 (15 B)");

    let missing = tree.lookup_by_path(&tmp.path().join("not-there"));
    let unknown = layout(missing.map(|idx| aggregate(&tree, idx)).as_ref());
    assert!(unknown.is_unknown);
}

/// Building an unchanged directory twice gives the same tree.
#[test]
fn rebuilding_unchanged_directory_is_stable() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());

    let first = FileTree::build(tmp.path()).unwrap();
    let second = FileTree::build(tmp.path()).unwrap();

    assert_eq!(sorted_paths(&first), sorted_paths(&second));
    let first_order: Vec<_> = first.nodes().iter().map(|n| n.path.clone()).collect();
    let second_order: Vec<_> = second.nodes().iter().map(|n| n.path.clone()).collect();
    assert_eq!(first_order, second_order);
}

/// An invalid root is the only fatal error.
#[test]
fn build_rejects_invalid_root() {
    let tmp = TempDir::new().unwrap();
    build_small_tree(tmp.path());

    assert!(matches!(
        FileTree::build(tmp.path().join("a.txt")),
        Err(TreeError::NotADirectory(_))
    ));
    assert!(matches!(
        FileTree::build(tmp.path().join("missing")),
        Err(TreeError::NotADirectory(_))
    ));
}

// ── Background scanner ───────────────────────────────────────────────────────

/// The scanner publishes the tree, reports milestones and completes.
#[test]
fn background_scan_completes() {
    let tmp = TempDir::new().unwrap();
    build_nested_tree(tmp.path());

    let handle = start_scan(tmp.path()).unwrap();
    let messages = drain_to_completion(&handle);

    assert!(matches!(
        messages.first(),
        Some(ScanProgress::TreeBuilt { total_files: 7, .. })
    ));
    let milestones: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            ScanProgress::Milestone(m) => Some(*m),
            _ => None,
        })
        .collect();
    assert_eq!(milestones.last().map(|m| m.percent), Some(100));
    assert!(matches!(
        messages.last(),
        Some(ScanProgress::Complete { processed: 7, .. })
    ));

    let guard = handle.live_tree.read();
    let tree = guard.as_ref().expect("tree published");
    let stats = aggregate(tree, tree.root());
    assert!(stats.is_complete());
    assert_eq!(stats.binary_count, 3);
}

/// An empty root completes without milestones.
#[test]
fn background_scan_of_empty_directory() {
    let tmp = TempDir::new().unwrap();

    let handle = start_scan(tmp.path()).unwrap();
    let messages = drain_to_completion(&handle);

    assert!(!messages
        .iter()
        .any(|m| matches!(m, ScanProgress::Milestone(_))));
    assert!(matches!(
        messages.last(),
        Some(ScanProgress::Complete { processed: 0, .. })
    ));
}

/// `start_scan` reports an invalid root immediately.
#[test]
fn background_scan_rejects_invalid_root() {
    let tmp = TempDir::new().unwrap();
    let result = start_scan(tmp.path().join("missing"));
    assert!(matches!(
        result,
        Err(ScanError::Tree(TreeError::NotADirectory(_)))
    ));
}

/// Cancelling ends the scan with `Cancelled` or, if the pass already
/// finished, `Complete`; either way the channel reaches a final message.
#[test]
fn background_scan_can_be_cancelled() {
    let tmp = TempDir::new().unwrap();
    for i in 0..200 {
        write(&tmp.path().join(format!("f{i}.txt")), b"some text");
    }

    let handle = start_scan(tmp.path()).unwrap();
    handle.cancel();
    assert!(handle.is_cancelled());

    let messages = drain_to_completion(&handle);
    match messages.last() {
        Some(ScanProgress::Cancelled { processed }) => assert!(*processed <= 200),
        Some(ScanProgress::Complete { processed, .. }) => assert_eq!(*processed, 200),
        other => panic!("unexpected final message: {other:?}"),
    }
}

/// A directory that cannot be listed is reported once, stays in the tree
/// without children, and does not stop the scan.
#[cfg(unix)]
#[test]
fn background_scan_reports_unlistable_directory() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("open.txt"), b"readable");
    write(&tmp.path().join("locked/hidden.dat"), &BINARY_BYTES);
    let locked = tmp.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to check in that case.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let handle = start_scan(tmp.path()).unwrap();
    let messages = drain_to_completion(&handle);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(messages.iter().any(|m| matches!(
        m,
        ScanProgress::TreeBuilt {
            total_files: 1,
            listing_errors: 1,
            ..
        }
    )));
    let reported: Vec<&PathBuf> = messages
        .iter()
        .filter_map(|m| match m {
            ScanProgress::ListingError { path, .. } => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(reported, vec![&handle.root.join("locked")]);
    assert!(matches!(
        messages.last(),
        Some(ScanProgress::Complete { processed: 1, .. })
    ));

    let guard = handle.live_tree.read();
    let tree = guard.as_ref().expect("tree published");
    let idx = tree
        .lookup_by_path(&handle.root.join("locked"))
        .expect("unlistable directory stays in the tree");
    assert!(tree.node(idx).is_dir());
    assert!(tree.node(idx).listing_failed());
    assert!(tree.child_files(idx).is_empty());
    assert!(tree.child_dirs(idx).is_empty());
}
