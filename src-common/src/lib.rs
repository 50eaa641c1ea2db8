//! Markpad Common Library
//!
//! Shared types used by the markpad engine and the CLI front end: tool and
//! player state enums, stroke records, save formats, and path helpers.

pub mod path_validation;
pub mod types;

pub use types::*;
