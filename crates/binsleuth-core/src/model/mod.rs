/// Data model for the BinSleuth directory tree.
///
/// Re-exports the arena-allocated tree structure and supporting types.
pub mod file_node;
pub mod file_tree;
pub mod size;

pub use file_node::{Classification, FileNode, FileVerdict, NodeIndex, NodeKind};
pub use file_tree::{normalize_path, FileTree};
