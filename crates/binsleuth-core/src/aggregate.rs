/// Recursive binary/text totals per directory.
///
/// Aggregates are never stored on the tree. Classification state changes
/// while a pass runs, so every query recombines the current child state;
/// a cached value would show stale ratios.
use crate::model::{Classification, FileTree, NodeIndex, NodeKind};
use std::ops::AddAssign;

/// Combined counts and sizes for a subtree.
///
/// `total_files` is structural. While classification is still running,
/// `binary_count + text_count < total_files` is expected; the two are
/// equal once every file below has been classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AggregateStats {
    pub binary_count: u64,
    pub binary_bytes: u64,
    pub text_count: u64,
    pub text_bytes: u64,
    pub total_files: u64,
}

impl AggregateStats {
    /// Number of files that have a verdict.
    #[inline]
    pub fn assessed(&self) -> u64 {
        self.binary_count + self.text_count
    }

    /// `true` once every file in the subtree has been classified.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.assessed() == self.total_files
    }

    /// Stats for a single file node.
    fn for_file(classification: Classification, size: Option<u64>) -> Self {
        let size = size.unwrap_or(0);
        let mut stats = Self {
            total_files: 1,
            ..Self::default()
        };
        match classification {
            Classification::Binary => {
                stats.binary_count = 1;
                stats.binary_bytes = size;
            }
            Classification::Text => {
                stats.text_count = 1;
                stats.text_bytes = size;
            }
            Classification::Unknown => {}
        }
        stats
    }
}

impl AddAssign for AggregateStats {
    fn add_assign(&mut self, other: Self) {
        self.binary_count += other.binary_count;
        self.binary_bytes += other.binary_bytes;
        self.text_count += other.text_count;
        self.text_bytes += other.text_bytes;
        self.total_files += other.total_files;
    }
}

/// Aggregate the subtree rooted at `index` from its current state.
///
/// Unclassified files count towards `total_files` only. On a file node
/// this returns that single file's contribution.
pub fn aggregate(tree: &FileTree, index: NodeIndex) -> AggregateStats {
    let node = tree.node(index);
    match &node.kind {
        NodeKind::File {
            classification,
            size,
        } => AggregateStats::for_file(*classification, *size),
        NodeKind::Directory { dirs, files, .. } => {
            let mut stats = AggregateStats::default();
            for &file in files {
                stats += aggregate(tree, file);
            }
            for &dir in dirs {
                stats += aggregate(tree, dir);
            }
            stats
        }
    }
}

/// Aggregate every node in one bottom-up pass.
///
/// Children are always stored after their parent, so iterating the arena
/// in *reverse* folds every child into its parent before the parent is
/// folded into its own parent. O(n), no recursion. The result is indexed
/// by `NodeIndex::idx()` and is exact for the moment it was computed.
pub fn aggregate_all(tree: &FileTree) -> Vec<AggregateStats> {
    let nodes = tree.nodes();
    let mut stats = vec![AggregateStats::default(); nodes.len()];

    for i in (0..nodes.len()).rev() {
        let node = &nodes[i];
        if let NodeKind::File {
            classification,
            size,
        } = &node.kind
        {
            stats[i] = AggregateStats::for_file(*classification, *size);
        }
        if let Some(parent) = node.parent {
            let own = stats[i];
            stats[parent.idx()] += own;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::classify_all;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path, bytes: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::File::create(path).unwrap().write_all(bytes).unwrap();
    }

    fn mixed_tree(root: &Path) {
        touch(&root.join("a.txt"), b"hello");
        touch(&root.join("b.dat"), &[0x78, 0x03, 0xFF, 0x00, 0x64]);
        touch(&root.join("sub/c.txt"), b"more text");
        touch(&root.join("sub/deeper/d.bin"), &[0u8; 40]);
        fs::create_dir_all(root.join("empty")).unwrap();
    }

    #[test]
    fn test_unclassified_tree_has_only_totals() {
        let tmp = TempDir::new().unwrap();
        mixed_tree(tmp.path());
        let tree = FileTree::build(tmp.path()).unwrap();

        let stats = aggregate(&tree, tree.root());
        assert_eq!(
            stats,
            AggregateStats {
                total_files: 4,
                ..AggregateStats::default()
            }
        );
        assert!(!stats.is_complete());
    }

    #[test]
    fn test_classified_tree_totals() {
        let tmp = TempDir::new().unwrap();
        mixed_tree(tmp.path());
        let mut tree = FileTree::build(tmp.path()).unwrap();
        classify_all(&mut tree, |_| {});

        let stats = aggregate(&tree, tree.root());
        assert_eq!(stats.binary_count, 2);
        assert_eq!(stats.binary_bytes, 45);
        assert_eq!(stats.text_count, 2);
        assert_eq!(stats.text_bytes, 14);
        assert_eq!(stats.total_files, 4);
        assert!(stats.is_complete());

        let empty = tree
            .lookup_by_path(&tree.full_path(tree.root()).join("empty"))
            .unwrap();
        assert_eq!(aggregate(&tree, empty), AggregateStats::default());
    }

    #[test]
    fn test_every_directory_is_complete_after_classification() {
        let tmp = TempDir::new().unwrap();
        mixed_tree(tmp.path());
        let mut tree = FileTree::build(tmp.path()).unwrap();
        classify_all(&mut tree, |_| {});

        for (i, node) in tree.nodes().iter().enumerate() {
            if node.is_dir() {
                let stats = aggregate(&tree, NodeIndex::new(i));
                assert_eq!(stats.total_files, stats.binary_count + stats.text_count);
                assert_eq!(stats.total_files, tree.total_files(NodeIndex::new(i)));
            }
        }
    }

    #[test]
    fn test_aggregate_all_matches_per_node_aggregate() {
        let tmp = TempDir::new().unwrap();
        mixed_tree(tmp.path());
        let mut tree = FileTree::build(tmp.path()).unwrap();

        let before = aggregate_all(&tree);
        classify_all(&mut tree, |_| {});
        let after = aggregate_all(&tree);

        for i in 0..tree.len() {
            let idx = NodeIndex::new(i);
            assert_eq!(after[i], aggregate(&tree, idx));
            assert_eq!(before[i].total_files, after[i].total_files);
        }
        assert_eq!(before[tree.root().idx()].assessed(), 0);
    }

    #[test]
    fn test_file_node_aggregate() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.dat"), &[0, 0, 0]);
        let mut tree = FileTree::build(tmp.path()).unwrap();
        classify_all(&mut tree, |_| {});

        let file = tree.file_indices()[0];
        assert_eq!(
            aggregate(&tree, file),
            AggregateStats {
                binary_count: 1,
                binary_bytes: 3,
                total_files: 1,
                ..AggregateStats::default()
            }
        );
    }
}
