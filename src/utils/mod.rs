//! Utility modules for the admin backend.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Date normalization and formatting helpers

pub mod datetime;
