//! KIST Park Admin - REST backend for the KIST Park content admin console
//!
//! This library provides the HTTP API used by staff to curate highlights,
//! press releases, categories and newsletter subscribers. Images travel from
//! the client as data URIs, are downscaled when too large and are stored on a
//! hosted image service.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`api`] - HTTP router, handlers and middleware
//! * [`auth`] - Bearer token verification
//! * [`cli`] - Command line arguments
//! * [`config`] - Application configuration management
//! * [`media`] - Image encoding, downscaling and hosting
//! * [`storage`] - Database connection and schema bootstrap
//! * [`repositories`] - Database queries per collection
//! * [`utils`] - Utility functions and helpers

/// HTTP API built on axum
pub mod api;

/// Google ID token verification
pub mod auth;

/// Command line parsing for the binary
pub mod cli;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging setup on top of the log facade
pub mod logger;

/// Image pipeline and hosted image store
pub mod media;

/// Repository layer for database operations
pub mod repositories;

/// Database connection and schema management
pub mod storage;

/// Utility functions for date handling
pub mod utils;

// Re-export entity models for convenient access
pub use entities::{category, highlight, press_release, sdg, subscriber, user};
