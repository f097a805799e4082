//! Configuration management for lanscan.
//!
//! Provides XDG-compliant settings storage; command-line flags override
//! whatever the settings file says.

mod settings;

pub use settings::{AppSettings, Paths};
