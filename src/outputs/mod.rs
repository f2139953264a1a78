//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: writes the [`Edition`](crate::models::Edition) of a run to a
//!   dated JSON file
//!
//! Page rendering is left to whatever consumes the JSON.

pub mod json;
