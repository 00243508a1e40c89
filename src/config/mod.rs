//! Configuration management
//!
//! Handles loading and saving the config file that stores connections,
//! their named queries, user settings and keybinding overrides.

pub mod connections;
pub mod settings;

pub use connections::{Config, ConnectionProfile, SavedQuery};
pub use settings::Settings;
