//! qgrid Core - Core types and shared functionality
//!
//! This crate provides the foundational types used across all qgrid components.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod params;
pub mod types;

pub use error::{QGridError, Result};
pub use params::{Hyperparameters, MAX_EPISODES};
pub use types::*;
