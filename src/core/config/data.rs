use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::{DEFAULT_BASE_URL, MIN_TYPING_DELAY};
use crate::core::exchanger::ExchangeSettings;
use crate::utils::url::resolve_origin;

/// Persisted widget settings. Unset fields fall back to built-in defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address of the page or server the widget is served from.
    pub base_url: Option<String>,
    /// Minimum time the typing placeholder stays visible, in milliseconds.
    pub typing_delay_ms: Option<u64>,
    /// Ignore sends while a reply is pending.
    pub single_in_flight: Option<bool>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Never shorter than `MIN_TYPING_DELAY`, even if the file says so.
    pub fn typing_delay(&self) -> Duration {
        self.typing_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(MIN_TYPING_DELAY)
            .max(MIN_TYPING_DELAY)
    }

    pub fn single_in_flight(&self) -> bool {
        self.single_in_flight.unwrap_or(false)
    }

    pub fn exchange_settings(&self) -> ExchangeSettings {
        ExchangeSettings {
            min_typing_delay: self.typing_delay(),
            single_in_flight: self.single_in_flight(),
        }
    }

    /// Pick the backend address and reduce it to an origin.
    ///
    /// Precedence: command-line flag, then environment, then this config,
    /// then the built-in default. Blank values are skipped.
    pub fn resolve_origin(
        &self,
        flag: Option<&str>,
        env_value: Option<&str>,
    ) -> Result<String, String> {
        let address = [flag, env_value, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        resolve_origin(address)
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
