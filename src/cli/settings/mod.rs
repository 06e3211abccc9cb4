//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a handler that validates input, writes the
//! field, and formats the current value:
//!
//! - Address settings (`base-url`)
//! - Duration settings (`typing-delay-ms`)
//! - Boolean settings (`single-in-flight`)

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::data::Config;

/// Trait for handling a configuration setting.
pub trait SettingHandler {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Validate `args` and store them in `config`. Returns the message shown
    /// on success.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value so the built-in default applies again.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the current value for display in `jobi set` output.
    fn format(&self, config: &Config) -> String;
}
