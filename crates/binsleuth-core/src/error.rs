/// Error types for tree construction and scan start-up.
///
/// Only an invalid root is fatal. Everything that can go wrong further down
/// the tree (unreadable directories, unreadable files) is recorded or logged
/// and never aborts a build or a classification pass.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to build a tree at all.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The requested root does not name an existing directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A relative root could not be resolved against the working directory.
    #[error("cannot resolve relative path: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Failure to start a background scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),
}

/// A directory whose listing could not be read during the build.
///
/// The directory stays in the tree with no children; this record is kept
/// on the tree so callers can show where the gaps are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot list {}: {message}", .path.display())]
pub struct ListingError {
    pub path: PathBuf,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_directory_names_the_path() {
        let err = TreeError::NotADirectory(PathBuf::from("/no/such/place"));
        assert_eq!(err.to_string(), "not a directory: /no/such/place");
    }

    #[test]
    fn scan_error_wraps_tree_error_transparently() {
        let err: ScanError = TreeError::NotADirectory(PathBuf::from("x")).into();
        assert_eq!(err.to_string(), "not a directory: x");
    }
}
