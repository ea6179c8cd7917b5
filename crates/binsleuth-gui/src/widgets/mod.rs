/// UI widgets for BinSleuth.

pub mod ratio_bar;
pub mod status_bar;
pub mod toolbar;
pub mod tree_view;
