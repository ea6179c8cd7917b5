/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The scan thread communicates via channels; state updates happen
/// in `process_scan_messages()` which runs once per frame.
///
/// The tree lives in the scanner's **shared `LiveTree`** for the whole
/// session, so ratio bars fill in while files are classified and stay
/// readable once the pass is over.
use binsleuth_core::model::{normalize_path, FileTree, NodeIndex};
use binsleuth_core::ratio_bar::{layout, RatioBarLayout};
use binsleuth_core::scanner::{LiveTree, Milestone, ScanHandle, ScanProgress};
use binsleuth_core::{aggregate_all, AggregateStats, ScanError};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::Duration;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// No scan in progress and nothing loaded.
    Idle,
    /// The scanner thread is listing the directory tree.
    Building,
    /// The tree is published; files are being classified.
    Classifying,
    /// The pass finished or was stopped. Results are available.
    Results,
}

impl AppPhase {
    pub fn is_scanning(self) -> bool {
        matches!(self, Self::Building | Self::Classifying)
    }
}

/// A row in the flattened visible-rows list for the virtualised TreeView.
#[derive(Clone, Debug)]
pub struct VisibleRow {
    /// Index into the `FileTree` arena.
    pub node_index: NodeIndex,
    /// Nesting depth (0 = root).
    pub depth: u16,
    /// Whether this directory is currently expanded (meaningless for files).
    pub is_expanded: bool,
}

/// Maximum number of scan-progress messages drained from the channel per frame.
///
/// Keeps a burst of listing errors from blocking the render thread.
pub const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Listing errors kept for display. Further errors are only counted.
pub const MAX_LISTING_ERRORS: usize = 1_000;

/// Maximum rows in the virtualised tree-view visible-rows list.
const MAX_VISIBLE_ROWS: usize = 500_000;

/// All application state.
pub struct AppState {
    // ── Path input ─────────────────────────────────────
    /// Contents of the toolbar path field.
    pub path_input: String,
    /// Set when the submitted path is not a directory; the field turns red.
    pub path_invalid: bool,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scan_handle: Option<ScanHandle>,
    /// Normalised root of the current or last scan.
    pub root_path: Option<PathBuf>,
    pub total_files: u64,
    pub entry_count: usize,
    pub last_milestone: Option<Milestone>,
    /// Milestones of the current pass, oldest first.
    pub milestones: Vec<Milestone>,
    /// Unreadable directories (capped at [`MAX_LISTING_ERRORS`]).
    pub listing_errors: Vec<(PathBuf, String)>,
    pub listing_error_count: u64,
    pub scan_duration: Option<Duration>,
    pub scan_finished_at: Option<DateTime<Local>>,
    /// True if the most recent pass was stopped (partial ratios).
    pub scan_was_cancelled: bool,
    /// Reason the last scan could not run, shown in the status bar.
    pub scan_failure: Option<String>,

    // ── Results ────────────────────────────────────────
    /// The shared tree, `None` inside until the scanner publishes it.
    pub live_tree: Option<LiveTree>,
    pub visible_rows: Vec<VisibleRow>,
    pub selected_node: Option<NodeIndex>,
    /// Per-node aggregates, indexed like the arena. Refreshed each frame
    /// while classifying and once when the pass ends.
    stats: Vec<AggregateStats>,

    // ── UI state ───────────────────────────────────────
    pub show_about: bool,
    pub show_log: bool,
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create initial application state.
    pub fn new() -> Self {
        Self {
            path_input: String::new(),
            path_invalid: false,
            phase: AppPhase::Idle,
            scan_handle: None,
            root_path: None,
            total_files: 0,
            entry_count: 0,
            last_milestone: None,
            milestones: Vec::new(),
            listing_errors: Vec::new(),
            listing_error_count: 0,
            scan_duration: None,
            scan_finished_at: None,
            scan_was_cancelled: false,
            scan_failure: None,
            live_tree: None,
            visible_rows: Vec::new(),
            selected_node: None,
            stats: Vec::new(),
            show_about: false,
            show_log: true,
            dark_mode: true,
        }
    }

    /// Act on the path field: rescan if it names a new directory.
    ///
    /// Separators are normalised for the platform first. Returns `true` if
    /// a scan was started. A path that is not a directory marks the field
    /// invalid; the root that is already loaded is not scanned again
    /// unless its last pass was cancelled.
    pub fn submit_path_input(&mut self) -> bool {
        let normalised = normalise_separators(self.path_input.trim());
        self.path_input = normalised.clone();

        let path = PathBuf::from(normalised);
        if !path.is_dir() {
            tracing::debug!("Rejected path input {}", path.display());
            self.path_invalid = true;
            return false;
        }
        self.path_invalid = false;

        if self.is_loaded_root(&path) {
            tracing::debug!("{} is already loaded", path.display());
            return false;
        }

        self.start_scan(path).is_ok()
    }

    /// Where the folder picker opens: the loaded root, else the working
    /// directory.
    pub fn browse_start_dir(&self) -> Option<PathBuf> {
        self.root_path
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    /// Scan a directory chosen in the folder picker.
    pub fn scan_picked_dir(&mut self, dir: PathBuf) -> bool {
        self.path_input = dir.to_string_lossy().into_owned();
        self.path_invalid = false;
        self.submit_path_input()
    }

    /// `true` if `path` is the root of the tree currently shown.
    ///
    /// A pass that was cancelled leaves partial ratios, so its root does
    /// not count as loaded.
    fn is_loaded_root(&self, path: &Path) -> bool {
        if self.phase == AppPhase::Idle || self.scan_was_cancelled {
            return false;
        }
        self.with_tree(|tree| tree.lookup_by_path(path) == Some(tree.root()))
            .unwrap_or_else(|| {
                // Tree not published yet: compare against the pending root.
                match (normalize_path(path), &self.root_path) {
                    (Ok(p), Some(root)) => &p == root,
                    _ => false,
                }
            })
    }

    /// Start a scan of `path`, discarding any previous results.
    pub fn start_scan(&mut self, path: PathBuf) -> Result<(), ScanError> {
        self.cancel_scan();

        self.phase = AppPhase::Idle;
        self.scan_handle = None;
        self.root_path = None;
        self.total_files = 0;
        self.entry_count = 0;
        self.last_milestone = None;
        self.milestones.clear();
        self.listing_errors.clear();
        self.listing_error_count = 0;
        self.scan_duration = None;
        self.scan_finished_at = None;
        self.scan_was_cancelled = false;
        self.scan_failure = None;
        self.live_tree = None;
        self.visible_rows.clear();
        self.selected_node = None;
        self.stats.clear();

        match binsleuth_core::scanner::start_scan(&path) {
            Ok(handle) => {
                self.path_input = handle.root.to_string_lossy().into_owned();
                self.path_invalid = false;
                self.root_path = Some(handle.root.clone());
                self.live_tree = Some(handle.live_tree.clone());
                self.scan_handle = Some(handle);
                self.phase = AppPhase::Building;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Cannot scan {}: {err}", path.display());
                self.path_invalid = matches!(err, ScanError::Tree(_));
                self.scan_failure = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Cancel any running scan.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Run `f` against the current tree, if one has been published.
    pub fn with_tree<R>(&self, f: impl FnOnce(&FileTree) -> R) -> Option<R> {
        let live = self.live_tree.as_ref()?;
        let guard = live.read();
        guard.as_ref().map(f)
    }

    /// Process pending scan progress messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let Some(handle) = &self.scan_handle else {
            return false;
        };

        let mut batch = Vec::new();
        while batch.len() < MAX_MESSAGES_PER_FRAME {
            match handle.progress_rx.try_recv() {
                Ok(msg) => batch.push(msg),
                Err(_) => break,
            }
        }

        let mut repaint = !batch.is_empty();
        for msg in batch {
            match msg {
                ScanProgress::TreeBuilt {
                    total_files,
                    entries,
                    ..
                } => {
                    self.total_files = total_files;
                    self.entry_count = entries;
                    self.phase = AppPhase::Classifying;
                    self.build_initial_visible_rows();
                }
                ScanProgress::ListingError { path, message } => {
                    self.listing_error_count += 1;
                    if self.listing_errors.len() < MAX_LISTING_ERRORS {
                        self.listing_errors.push((path, message));
                    }
                }
                ScanProgress::Milestone(milestone) => {
                    self.last_milestone = Some(milestone);
                    self.milestones.push(milestone);
                }
                ScanProgress::Complete { duration, .. } => {
                    self.finish(Some(duration), false);
                    return true;
                }
                ScanProgress::Cancelled { .. } => {
                    self.finish(None, true);
                    return true;
                }
                ScanProgress::Failed { message } => {
                    self.phase = AppPhase::Idle;
                    self.scan_failure = Some(message);
                    self.scan_handle = None;
                    self.live_tree = None;
                    self.visible_rows.clear();
                    return true;
                }
            }
        }

        // Verdicts land in batches without a message; keep ratios current.
        if self.phase == AppPhase::Classifying {
            self.refresh_stats();
            repaint = true;
        }

        repaint
    }

    fn finish(&mut self, duration: Option<Duration>, cancelled: bool) {
        self.scan_duration = duration;
        self.scan_was_cancelled = cancelled;
        self.scan_finished_at = Some(Local::now());
        self.phase = AppPhase::Results;
        self.scan_handle = None;
        if self.visible_rows.is_empty() {
            self.build_initial_visible_rows();
        }
        self.refresh_stats();
    }

    /// Recompute every directory aggregate from the shared tree.
    pub fn refresh_stats(&mut self) {
        if let Some(stats) = self.with_tree(aggregate_all) {
            self.stats = stats;
        }
    }

    /// Aggregate for `index` as of the last refresh.
    pub fn stats_for(&self, index: NodeIndex) -> Option<AggregateStats> {
        self.stats.get(index.idx()).copied()
    }

    /// Ratio bar for `index`; the placeholder when no aggregate is known.
    pub fn layout_for(&self, index: NodeIndex) -> RatioBarLayout {
        layout(self.stats_for(index).as_ref())
    }

    /// Root row expanded, with its children listed one level down.
    fn build_initial_visible_rows(&mut self) {
        let rows = self.with_tree(|tree| {
            let root = tree.root();
            let mut rows = vec![VisibleRow {
                node_index: root,
                depth: 0,
                is_expanded: true,
            }];
            rows.extend(
                tree.children_for_display(root)
                    .into_iter()
                    .take(MAX_VISIBLE_ROWS - 1)
                    .map(|child| VisibleRow {
                        node_index: child,
                        depth: 1,
                        is_expanded: false,
                    }),
            );
            rows
        });
        self.visible_rows = rows.unwrap_or_default();
    }

    /// Toggle expansion of a node at the given row index in visible_rows.
    pub fn toggle_expand(&mut self, row_index: usize) {
        // Disjoint field borrows: the tree lock is held while rows change.
        if let Some(ref live) = self.live_tree {
            let guard = live.read();
            if let Some(tree) = guard.as_ref() {
                toggle_expand_inner(&mut self.visible_rows, row_index, tree);
            }
        }
    }
}

/// Toggle-expand implementation operating on the visible_rows vec directly.
fn toggle_expand_inner(visible_rows: &mut Vec<VisibleRow>, row_index: usize, tree: &FileTree) {
    let Some(row) = visible_rows.get(row_index) else {
        return;
    };
    if !tree.node(row.node_index).is_dir() {
        return;
    }

    if row.is_expanded {
        // Collapse: drop the consecutive rows deeper than this one.
        let parent_depth = row.depth;
        let remove_start = row_index + 1;
        let mut remove_end = remove_start;
        while remove_end < visible_rows.len() && visible_rows[remove_end].depth > parent_depth {
            remove_end += 1;
        }
        visible_rows.drain(remove_start..remove_end);
        visible_rows[row_index].is_expanded = false;
    } else {
        let child_depth = row.depth + 1;
        let headroom = MAX_VISIBLE_ROWS.saturating_sub(visible_rows.len());
        let new_rows: Vec<VisibleRow> = tree
            .children_for_display(row.node_index)
            .into_iter()
            .take(headroom)
            .map(|child| VisibleRow {
                node_index: child,
                depth: child_depth,
                is_expanded: false,
            })
            .collect();

        let insert_pos = row_index + 1;
        visible_rows.splice(insert_pos..insert_pos, new_rows);
        visible_rows[row_index].is_expanded = true;
    }
}

/// Replace forward slashes with the platform separator.
///
/// Backslashes are left alone: on Unix they are legal in file names.
pub fn normalise_separators(input: &str) -> String {
    input
        .chars()
        .map(|c| if c == '/' { MAIN_SEPARATOR } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_separators() {
        let expected = format!("a{MAIN_SEPARATOR}b{MAIN_SEPARATOR}c");
        assert_eq!(normalise_separators("a/b/c"), expected);
        assert_eq!(normalise_separators("plain"), "plain");
    }

    #[cfg(unix)]
    #[test]
    fn test_backslash_kept_on_unix() {
        assert_eq!(normalise_separators("odd\\name/x"), "odd\\name/x");
    }

    #[test]
    fn test_phase_is_scanning() {
        assert!(AppPhase::Building.is_scanning());
        assert!(AppPhase::Classifying.is_scanning());
        assert!(!AppPhase::Idle.is_scanning());
        assert!(!AppPhase::Results.is_scanning());
    }

    #[test]
    fn test_layout_without_tree_is_unknown() {
        let state = AppState::new();
        assert!(state.layout_for(NodeIndex(0)).is_unknown);
        assert!(state.stats_for(NodeIndex(0)).is_none());
    }
}
