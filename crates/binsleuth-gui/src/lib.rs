/// BinSleuth GUI: egui-based desktop frontend.
///
/// This crate contains all UI code. Tree building, classification and
/// ratio computation live in `binsleuth-core`.
pub mod app;
pub mod icon;
pub mod panels;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{BinSleuthApp, BinSleuthState};
