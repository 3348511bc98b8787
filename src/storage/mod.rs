//! Persistence layer
//!
//! This module owns the database connection and schema bootstrap. Queries live
//! in [`crate::repositories`]; this layer only opens the connection, creates
//! the tables and seeds reference data.

pub mod db;

pub use db::LocalStorage;
