/// Arena-backed directory tree with a path index.
///
/// All entries live in a single `Vec<FileNode>`. The build is a single
/// depth-first, pre-order pass, so every child is stored after its parent;
/// the bottom-up aggregation in [`crate::aggregate`] relies on that order.
///
/// The path index is filled during the build and never mutated afterwards.
/// The only mutation a built tree accepts is recording a file's verdict.
use super::file_node::{Classification, FileNode, FileVerdict, NodeIndex, NodeKind};
use crate::error::{ListingError, TreeError};
use compact_str::CompactString;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// The directory tree produced by a build.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// Arena: every entry in a flat vector, parents before children.
    nodes: Vec<FileNode>,

    /// The scan root (always index 0).
    root: NodeIndex,

    /// Normalised path → entry.
    path_index: HashMap<PathBuf, NodeIndex>,

    /// Directories whose listing failed during the build.
    listing_errors: Vec<ListingError>,
}

/// How a listed directory entry ends up in the tree.
enum ListedKind {
    File,
    Dir,
    /// A symlink to a directory: recorded but not descended.
    LinkedDir,
}

impl FileTree {
    /// Build the tree rooted at `root`.
    ///
    /// Fails only if `root` is not an existing directory. Subdirectories
    /// that cannot be listed (permission denied, removed mid-scan) are kept
    /// as childless entries and recorded in [`listing_errors`](Self::listing_errors).
    pub fn build(root: impl AsRef<Path>) -> Result<Self, TreeError> {
        let root = normalize_path(root.as_ref())?;
        if !root.is_dir() {
            return Err(TreeError::NotADirectory(root));
        }

        info!("Building tree for {}", root.display());

        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeIndex(0),
            path_index: HashMap::new(),
            listing_errors: Vec::new(),
        };

        let name = root_display_name(&root);
        tree.root = tree.add_node(FileNode::new_dir(root, name, None));
        tree.populate(tree.root);

        info!(
            "Tree built: {} entries, {} files, {} unreadable directories",
            tree.nodes.len(),
            tree.total_files(tree.root),
            tree.listing_errors.len()
        );

        Ok(tree)
    }

    /// Allocate a node in the arena and register its path.
    fn add_node(&mut self, node: FileNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        debug!("Adding {}: {}", if node.is_dir() { "dir" } else { "file" }, node.path.display());
        self.path_index.insert(node.path.clone(), idx);
        self.nodes.push(node);
        idx
    }

    /// List `dir` once and recurse into real subdirectories.
    fn populate(&mut self, dir: NodeIndex) {
        let dir_path = self.nodes[dir.idx()].path.clone();

        let listed = match list_dir(&dir_path) {
            Ok(listed) => listed,
            Err(err) => {
                warn!("Cannot list {}: {err}", dir_path.display());
                if let NodeKind::Directory { listing_failed, .. } = &mut self.nodes[dir.idx()].kind {
                    *listing_failed = true;
                }
                self.listing_errors.push(ListingError {
                    path: dir_path,
                    message: err.to_string(),
                });
                return;
            }
        };

        for (path, kind) in listed {
            let name = path
                .file_name()
                .map(|n| CompactString::new(n.to_string_lossy()))
                .unwrap_or_default();

            match kind {
                ListedKind::File => {
                    let idx = self.add_node(FileNode::new_file(path, name, Some(dir)));
                    self.attach(dir, idx);
                }
                ListedKind::Dir => {
                    let idx = self.add_node(FileNode::new_dir(path, name, Some(dir)));
                    self.attach(dir, idx);
                    self.populate(idx);
                }
                ListedKind::LinkedDir => {
                    let idx = self.add_node(FileNode::new_dir(path, name, Some(dir)));
                    self.attach(dir, idx);
                }
            }
        }
    }

    /// Append `child` to the matching child list of `parent`.
    fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let child_is_dir = self.nodes[child.idx()].is_dir();
        if let NodeKind::Directory { dirs, files, .. } = &mut self.nodes[parent.idx()].kind {
            if child_is_dir {
                dirs.push(child);
            } else {
                files.push(child);
            }
        }
    }

    /// Record the classification pass's verdict for a file.
    ///
    /// A file's verdict is written at most once: returns `false` (and leaves
    /// the node untouched) for directories and already classified files.
    pub(crate) fn set_verdict(&mut self, index: NodeIndex, verdict: FileVerdict) -> bool {
        match &mut self.nodes[index.idx()].kind {
            NodeKind::File {
                classification,
                size,
            } if !classification.is_known() => {
                *classification = verdict.classification;
                *size = Some(verdict.size);
                true
            }
            _ => false,
        }
    }

    /// Number of files under `index`: direct file children plus the files
    /// of every child directory. A file node counts as one.
    ///
    /// Purely structural; independent of classification state.
    pub fn total_files(&self, index: NodeIndex) -> u64 {
        match &self.nodes[index.idx()].kind {
            NodeKind::File { .. } => 1,
            NodeKind::Directory { dirs, files, .. } => {
                files.len() as u64 + dirs.iter().map(|&d| self.total_files(d)).sum::<u64>()
            }
        }
    }

    /// Reverse lookup from a path to its entry.
    ///
    /// The path is normalised the same way the build normalises paths, so
    /// `a/./b`, `a/c/../b` and `a/b/` all find `a/b`.
    pub fn lookup_by_path(&self, path: &Path) -> Option<NodeIndex> {
        if let Some(&idx) = self.path_index.get(path) {
            return Some(idx);
        }
        let normalized = normalize_path(path).ok()?;
        self.path_index.get(&normalized).copied()
    }

    /// The root directory.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &FileNode {
        &self.nodes[index.idx()]
    }

    /// All nodes in arena order.
    #[inline]
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    /// Full normalised path of a node.
    #[inline]
    pub fn full_path(&self, index: NodeIndex) -> &Path {
        &self.nodes[index.idx()].path
    }

    /// Classification of a node (`Unknown` for directories).
    #[inline]
    pub fn classification(&self, index: NodeIndex) -> Classification {
        self.nodes[index.idx()].classification()
    }

    /// Child directories of `index`, sorted by name.
    pub fn child_dirs(&self, index: NodeIndex) -> &[NodeIndex] {
        match &self.nodes[index.idx()].kind {
            NodeKind::Directory { dirs, .. } => dirs,
            NodeKind::File { .. } => &[],
        }
    }

    /// Child files of `index`, sorted by name.
    pub fn child_files(&self, index: NodeIndex) -> &[NodeIndex] {
        match &self.nodes[index.idx()].kind {
            NodeKind::Directory { files, .. } => files,
            NodeKind::File { .. } => &[],
        }
    }

    /// Children for a tree view: directories first, then files, each
    /// group sorted by name.
    pub fn children_for_display(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let dirs = self.child_dirs(index);
        let files = self.child_files(index);
        let mut children = Vec::with_capacity(dirs.len() + files.len());
        children.extend_from_slice(dirs);
        children.extend_from_slice(files);
        children
    }

    /// Every file node in traversal (arena) order.
    pub fn file_indices(&self) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.is_dir())
            .map(|(i, _)| NodeIndex::new(i))
            .collect()
    }

    /// Directories that could not be listed during the build.
    #[inline]
    pub fn listing_errors(&self) -> &[ListingError] {
        &self.listing_errors
    }

    /// Total number of registered entries (directories and files).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a built tree (the root is always present).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Read a directory's entries and decide what each one becomes.
///
/// Any error while reading the listing fails the whole listing, so a
/// directory is either fully listed or recorded as childless. Entries are
/// sorted by path so repeated builds give the same order.
fn list_dir(dir: &Path) -> io::Result<Vec<(PathBuf, ListedKind)>> {
    let mut listed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        let kind = if file_type.is_dir() {
            ListedKind::Dir
        } else if file_type.is_file() {
            ListedKind::File
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => ListedKind::File,
                Ok(target) if target.is_dir() => ListedKind::LinkedDir,
                Ok(_) => continue,
                Err(err) => {
                    debug!("Skipping dangling link {}: {err}", path.display());
                    continue;
                }
            }
        } else {
            debug!("Skipping special file {}", path.display());
            continue;
        };

        listed.push((path, kind));
    }
    listed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(listed)
}

/// Make `path` absolute and lexically normalised: `.` components are
/// dropped and `..` removes the previous component. Symlinks are not
/// resolved, so the result names the entry the way the user reached it.
pub fn normalize_path(path: &Path) -> Result<PathBuf, TreeError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(TreeError::CurrentDir)?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Derive a display name for the scan root.
fn root_display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
