//! weatherdash library
//!
//! Normalization of upstream weather data, theme and highlight state, and the
//! terminal UI. The binary in `main.rs` wires these together; integration
//! tests use the same modules.

pub mod app;
pub mod cli;
pub mod data;
pub mod error;
pub mod highlight;
pub mod icon;
pub mod logging;
pub mod refresh;
pub mod store;
pub mod theme;
pub mod ui;
