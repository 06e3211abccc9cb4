//! Error types for settings operations.

use std::fmt;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided address is not an http(s) URL.
    InvalidUrl(String),
    /// The provided value could not be parsed as a number of milliseconds.
    InvalidNumber(String),
    /// The typing delay is below the minimum the widget allows.
    DelayTooShort { millis: u64, minimum: u128 },
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// An error occurred while loading or persisting the configuration.
    ConfigError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: base-url, typing-delay-ms, single-in-flight");
            }
            SettingError::InvalidUrl(reason) => {
                eprintln!("❌ Invalid base URL: {reason}");
            }
            SettingError::InvalidNumber(input) => {
                eprintln!("❌ Invalid number of milliseconds: {input}");
            }
            SettingError::DelayTooShort { millis, minimum } => {
                eprintln!("❌ Typing delay of {millis} ms is too short");
                eprintln!("   Use at least {minimum} ms");
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::ConfigError(msg) => {
                eprintln!("❌ Failed to update configuration: {msg}");
            }
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown config key: {key}"),
            SettingError::InvalidUrl(reason) => write!(f, "Invalid base URL: {reason}"),
            SettingError::InvalidNumber(input) => write!(f, "Invalid number: {input}"),
            SettingError::DelayTooShort { millis, minimum } => {
                write!(f, "Typing delay {millis} ms is below the {minimum} ms minimum")
            }
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}
