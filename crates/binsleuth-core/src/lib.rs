/// BinSleuth Core: tree model, classification, and aggregation.
///
/// This crate contains all business logic with zero UI dependencies.
/// Frontends only need the interfaces re-exported here: build a tree,
/// classify it (blocking or on a background thread), then query
/// aggregates and ratio-bar layouts per directory.
///
/// # Modules
///
/// - [`model`]: Arena-allocated directory tree with a path index.
/// - [`classifier`]: Binary/text heuristic over a file's first kilobyte.
/// - [`aggregate`]: Recursive binary/text counts and sizes per directory.
/// - [`scanner`]: Classification pass, milestones, and the background driver.
/// - [`ratio_bar`]: Pure mapping from aggregates to a renderable bar layout.
/// - [`error`]: Error types shared across the crate.
pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod model;
pub mod ratio_bar;
pub mod scanner;

pub use aggregate::{aggregate, aggregate_all, AggregateStats};
pub use error::{ListingError, ScanError, TreeError};
pub use model::{Classification, FileNode, FileTree, FileVerdict, NodeIndex, NodeKind};
pub use ratio_bar::{layout, RatioBarLayout, RatioBarModel};
