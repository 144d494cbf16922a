//! Live dashboard — the terminal counterpart of the web UI.

pub mod app;
pub mod ui;
