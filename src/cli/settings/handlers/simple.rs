//! Handlers for single-valued settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;
use crate::core::constants::{DEFAULT_BASE_URL, MIN_TYPING_DELAY};
use crate::utils::url::resolve_origin;

/// `base-url`: the address the widget is served from. Stored as its origin.
pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(address) = args.first().filter(|a| !a.trim().is_empty()) else {
            return Err(SettingError::MissingArgs {
                hint: "To set the backend address, specify a URL:",
                example: "jobi set base-url http://localhost:5001",
            });
        };

        let origin = resolve_origin(address).map_err(SettingError::InvalidUrl)?;
        config.base_url = Some(origin.clone());
        Ok(format!("✅ Set base-url to: {origin}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        format!("✅ Unset base-url (will use default: {DEFAULT_BASE_URL})")
    }

    fn format(&self, config: &Config) -> String {
        match &config.base_url {
            Some(url) => format!("  base-url: {url}"),
            None => format!("  base-url: (unset, default: {DEFAULT_BASE_URL})"),
        }
    }
}

/// `typing-delay-ms`: minimum time the typing placeholder stays visible.
pub struct TypingDelayHandler;

impl SettingHandler for TypingDelayHandler {
    fn key(&self) -> &'static str {
        "typing-delay-ms"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let Some(input) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the typing delay, specify milliseconds:",
                example: "jobi set typing-delay-ms 750",
            });
        };

        let millis: u64 = input
            .trim()
            .parse()
            .map_err(|_| SettingError::InvalidNumber(input.clone()))?;
        let minimum = MIN_TYPING_DELAY.as_millis();
        if u128::from(millis) < minimum {
            return Err(SettingError::DelayTooShort { millis, minimum });
        }
        config.typing_delay_ms = Some(millis);
        Ok(format!("✅ Set typing-delay-ms to: {millis}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.typing_delay_ms = None;
        format!(
            "✅ Unset typing-delay-ms (will use default: {})",
            MIN_TYPING_DELAY.as_millis()
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.typing_delay_ms {
            Some(ms) if u128::from(ms) < MIN_TYPING_DELAY.as_millis() => format!(
                "  typing-delay-ms: {ms} (raised to {})",
                MIN_TYPING_DELAY.as_millis()
            ),
            Some(ms) => format!("  typing-delay-ms: {ms}"),
            None => format!(
                "  typing-delay-ms: (unset, default: {})",
                MIN_TYPING_DELAY.as_millis()
            ),
        }
    }
}
