/// Panels composed by the app layout.

pub mod details_panel;
pub mod log_panel;
pub mod tree_panel;
