//! Application layer managing form state and submission workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the store owns the applicant's answers and submission lifecycle, and the
//! session state adds the terminal UI's cursor and mode on top.

pub mod store;
pub mod state;

pub use store::*;
pub use state::*;
