//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Repositories keep entities as pure data models while providing reusable
//! database access methods.

pub mod category;
pub mod highlight;
pub mod listing;
pub mod press_release;
pub mod sdg;
pub mod subscriber;
pub mod user;

pub use category::CategoryRepository;
pub use highlight::{HighlightFilter, HighlightRepository, PopulatedHighlight};
pub use listing::{ListWindow, SortOrder};
pub use press_release::{PressReleaseFilter, PressReleaseRepository};
pub use sdg::SdgRepository;
pub use subscriber::SubscriberRepository;
pub use user::{NewUser, UserRepository};
