/// A single entry in the arena-allocated directory tree.
///
/// Entries are stored in a flat `Vec<FileNode>` owned by the tree.
/// Parent-child relationships use indices rather than pointers, so nothing
/// needs back-references or reference counting, and the path index can map
/// straight to a `NodeIndex`.
use compact_str::CompactString;
use std::path::PathBuf;

/// Lightweight index into the arena `Vec<FileNode>`.
///
/// Uses `u32` to keep indices small; supports up to ~4 billion entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Binary/text verdict for a file. `Unknown` until the classification
/// pass reaches the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Classification {
    #[default]
    Unknown,
    Text,
    Binary,
}

impl Classification {
    #[inline]
    pub fn is_binary(self) -> bool {
        self == Self::Binary
    }

    #[inline]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "not analysed",
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

/// Classification and byte size, computed together from one open handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileVerdict {
    pub classification: Classification,
    pub size: u64,
}

/// What kind of entry a node is, with the per-kind state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory. Children are kept sorted by name, split by kind.
    Directory {
        dirs: Vec<NodeIndex>,
        files: Vec<NodeIndex>,
        /// `true` if the listing could not be read; the directory then has
        /// no children but is otherwise a normal entry.
        listing_failed: bool,
    },
    /// A regular file. Both fields are filled in once by the
    /// classification pass and never change afterwards.
    File {
        classification: Classification,
        size: Option<u64>,
    },
}

/// A single file or directory in the tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Absolute, lexically normalised path. This is the entry's identity.
    pub path: PathBuf,

    /// Final path component, for display.
    pub name: CompactString,

    /// Index of the parent node. `None` for the root.
    pub parent: Option<NodeIndex>,

    pub kind: NodeKind,
}

impl FileNode {
    /// Create a new, not yet classified file node.
    pub fn new_file(path: PathBuf, name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            path,
            name,
            parent,
            kind: NodeKind::File {
                classification: Classification::Unknown,
                size: None,
            },
        }
    }

    /// Create a new directory node with no children yet.
    pub fn new_dir(path: PathBuf, name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            path,
            name,
            parent,
            kind: NodeKind::Directory {
                dirs: Vec::new(),
                files: Vec::new(),
                listing_failed: false,
            },
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    /// Classification of a file node; always `Unknown` for directories.
    #[inline]
    pub fn classification(&self) -> Classification {
        match self.kind {
            NodeKind::File { classification, .. } => classification,
            NodeKind::Directory { .. } => Classification::Unknown,
        }
    }

    /// Byte size of a file node once measured; `None` for directories.
    #[inline]
    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size, .. } => size,
            NodeKind::Directory { .. } => None,
        }
    }

    /// `true` for a directory whose listing could not be read.
    #[inline]
    pub fn listing_failed(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Directory {
                listing_failed: true,
                ..
            }
        )
    }
}
