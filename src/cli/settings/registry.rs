//! Registry of setting handlers.

use std::collections::HashMap;
use std::path::Path;

use super::error::SettingError;
use super::handlers::{single_in_flight_handler, BaseUrlHandler, TypingDelayHandler};
use super::SettingHandler;
use crate::core::config::data::Config;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `jobi set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(BaseUrlHandler));
        registry.register(Box::new(TypingDelayHandler));
        registry.register(Box::new(single_in_flight_handler()));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Set `key` in the platform config file.
    pub fn set(&self, key: &str, args: &[String]) -> Result<String, SettingError> {
        self.set_at(&config_path()?, key, args)
    }

    /// Unset `key` in the platform config file.
    pub fn unset(&self, key: &str) -> Result<String, SettingError> {
        self.unset_at(&config_path()?, key)
    }

    pub fn set_at(
        &self,
        config_path: &Path,
        key: &str,
        args: &[String],
    ) -> Result<String, SettingError> {
        let handler = self.handler(key)?;
        Config::mutate_at(config_path, |config| Ok(handler.set(args, config)?))
            .map_err(into_setting_error)
    }

    pub fn unset_at(&self, config_path: &Path, key: &str) -> Result<String, SettingError> {
        let handler = self.handler(key)?;
        Config::mutate_at(config_path, |config| Ok(handler.unset(config)))
            .map_err(into_setting_error)
    }

    /// One formatted line per key, in display order.
    pub fn format_all(&self, config: &Config) -> Vec<String> {
        self.display_order
            .iter()
            .filter_map(|key| self.get(key))
            .map(|handler| handler.format(config))
            .collect()
    }

    fn handler(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.get(key)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejections from a handler pass through; anything else is a config failure.
fn into_setting_error(err: Box<dyn std::error::Error>) -> SettingError {
    match err.downcast::<SettingError>() {
        Ok(setting_err) => *setting_err,
        Err(other) => SettingError::ConfigError(other.to_string()),
    }
}

fn config_path() -> Result<std::path::PathBuf, SettingError> {
    Config::get_config_path().map_err(|err| SettingError::ConfigError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn set_and_unset_round_trip_through_the_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let registry = SettingRegistry::new();

        let message = registry
            .set_at(&path, "base-url", &args(&["https://jobs.example.com/widget/index.html"]))
            .expect("set base-url");
        assert_eq!(message, "✅ Set base-url to: https://jobs.example.com");
        registry
            .set_at(&path, "typing-delay-ms", &args(&["750"]))
            .expect("set delay");
        registry
            .set_at(&path, "single-in-flight", &args(&["on"]))
            .expect("set guard");

        let config = Config::load_from_path(&path).expect("load");
        assert_eq!(config.base_url.as_deref(), Some("https://jobs.example.com"));
        assert_eq!(config.typing_delay_ms, Some(750));
        assert_eq!(config.single_in_flight, Some(true));

        registry.unset_at(&path, "typing-delay-ms").expect("unset");
        let config = Config::load_from_path(&path).expect("reload");
        assert_eq!(config.typing_delay_ms, None);
        assert_eq!(config.single_in_flight, Some(true));
    }

    #[test]
    fn rejected_values_leave_the_file_untouched() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let registry = SettingRegistry::new();

        let err = registry
            .set_at(&path, "typing-delay-ms", &args(&["soon"]))
            .expect_err("not a number");
        assert!(matches!(err, SettingError::InvalidNumber(_)));

        let err = registry
            .set_at(&path, "typing-delay-ms", &args(&["0"]))
            .expect_err("below the minimum");
        assert!(matches!(
            err,
            SettingError::DelayTooShort {
                millis: 0,
                minimum: 500
            }
        ));

        let err = registry
            .set_at(&path, "base-url", &args(&["ftp://files.example.com"]))
            .expect_err("not http");
        assert!(matches!(err, SettingError::InvalidUrl(_)));

        let err = registry
            .set_at(&path, "single-in-flight", &args(&[]))
            .expect_err("missing value");
        assert!(matches!(err, SettingError::MissingArgs { .. }));

        assert!(!path.exists());
    }

    #[test]
    fn unknown_keys_are_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        let err = SettingRegistry::new()
            .unset_at(&path, "theme")
            .expect_err("unknown key");
        assert!(matches!(err, SettingError::UnknownKey(key) if key == "theme"));
    }

    #[test]
    fn format_all_follows_display_order() {
        let registry = SettingRegistry::new();
        let config = Config {
            typing_delay_ms: Some(0),
            ..Config::default()
        };

        assert_eq!(
            registry.keys_display_order(),
            &["base-url", "typing-delay-ms", "single-in-flight"]
        );
        assert_eq!(
            registry.format_all(&config),
            vec![
                "  base-url: (unset, default: http://127.0.0.1:5001)".to_string(),
                "  typing-delay-ms: 0 (raised to 500)".to_string(),
                "  single-in-flight: (unset, default: off)".to_string(),
            ]
        );
    }
}
