//! Boolean setting handlers for on/off settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{format_bool, parse_bool};
use crate::cli::settings::SettingHandler;
use crate::core::config::data::Config;

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default_display: &'static str,
    get: fn(&Config) -> Option<bool>,
    set_field: fn(&mut Config, Option<bool>),
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        (self.set_field)(config, Some(value));
        Ok(format!("✅ Set {} to: {}", self.key, format_bool(value)))
    }

    fn unset(&self, config: &mut Config) -> String {
        (self.set_field)(config, None);
        format!(
            "✅ Unset {} (will use default: {})",
            self.key, self.default_display
        )
    }

    fn format(&self, config: &Config) -> String {
        match (self.get)(config) {
            Some(value) => format!("  {}: {}", self.key, format_bool(value)),
            None => format!("  {}: (unset, default: {})", self.key, self.default_display),
        }
    }
}

/// Create a handler for the `single-in-flight` setting.
pub fn single_in_flight_handler() -> BooleanHandler {
    BooleanHandler {
        key: "single-in-flight",
        hint: "To ignore sends while a reply is pending, specify on or off:",
        example: "jobi set single-in-flight on",
        default_display: "off",
        get: |c| c.single_in_flight,
        set_field: |c, v| c.single_in_flight = v,
    }
}
