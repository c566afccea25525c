//! Configuration management for nvx
//!
//! - **store**: config file location, first-run template, reading
//! - **layout**: `[Layout]` rows or a command-line override
//! - **screens**: `[Screen_<n>]` sections
//! - **user**: validation of the whole file into a [`UserConfig`]

pub mod layout;
pub mod screens;
pub mod store;
pub mod user;

// Re-export commonly used types
pub use layout::Layout;
pub use screens::ScreenRegistry;
pub use store::{Bootstrap, ConfigStore};
