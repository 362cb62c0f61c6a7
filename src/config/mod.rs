//! Configuration management for portsift.
//!
//! Provides XDG-compliant lookup of the optional settings file.

mod settings;

pub use settings::{AppSettings, Paths};
