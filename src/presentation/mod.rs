//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the application form using ratatui and maps
//! keyboard input onto form store operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
