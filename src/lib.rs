//! intake - Member Recruitment Application
//!
//! A terminal application form that collects applicant answers, validates
//! them and submits them as one JSON document to the Application Intake API.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
