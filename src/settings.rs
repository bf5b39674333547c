//! Application settings
//!
//! Persisted as TOML under the platform config directory. Every field has a
//! default so a missing or partial file still yields a working setup; CLI
//! flags (env-backed) override file values after loading.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default hub endpoint the stats calls go against
pub const DEFAULT_BASE_URL: &str = "https://hub-api.neynar.com";

/// Daily nut-send quota
pub const DEFAULT_DAILY_ALLOWANCE: u32 = 50;

/// Daily reset boundary, UTC hour
pub const DEFAULT_RESET_HOUR_UTC: u32 = 11;

/// Automatic refresh cadence
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// The widget's own URL, embedded in share intents
pub const DEFAULT_FRAME_URL: &str = "https://nutbar.xyz/frames/acorntracker";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hub API base URL
    pub base_url: String,

    /// API key sent with every hub request
    pub api_key: String,

    /// Client identifier sent with every hub request
    pub client_id: String,

    /// Daily send quota the remaining-allowance figure is measured against
    pub daily_allowance: u32,

    /// UTC hour (0..24) at which the daily window resets
    pub reset_hour_utc: u32,

    /// Automatic refresh interval in milliseconds
    pub poll_interval_ms: u64,

    /// URL of this widget, used when composing a share intent
    pub frame_url: String,

    /// Display-only: when tracking started
    pub tracking_since: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            client_id: String::new(),
            daily_allowance: DEFAULT_DAILY_ALLOWANCE,
            reset_hour_utc: DEFAULT_RESET_HOUR_UTC,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            frame_url: DEFAULT_FRAME_URL.to_string(),
            tracking_since: default_tracking_since(),
        }
    }
}

fn default_tracking_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

impl Settings {
    /// Load settings from the default config path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file location: `<config_dir>/nutbar/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nutbar").join("config.toml"))
    }

    /// Check invariants the rest of the engine relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.daily_allowance == 0 {
            return Err(SettingsError::Invalid(
                "daily_allowance must be positive".to_string(),
            ));
        }
        if self.reset_hour_utc >= 24 {
            return Err(SettingsError::Invalid(format!(
                "reset_hour_utc must be in 0..24, got {}",
                self.reset_hour_utc
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        Url::parse(&self.base_url)
            .map_err(|e| SettingsError::Invalid(format!("base_url: {e}")))?;
        Url::parse(&self.frame_url)
            .map_err(|e| SettingsError::Invalid(format!("frame_url: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.daily_allowance, 50);
        assert_eq!(settings.reset_hour_utc, 11);
        assert_eq!(settings.poll_interval_ms, 1000);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"k-123\"\ndaily_allowance = 75").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.api_key, "k-123");
        assert_eq!(settings.daily_allowance, 75);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.reset_hour_utc, DEFAULT_RESET_HOUR_UTC);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "daily_allowance = \"lots\"").unwrap();

        assert!(matches!(
            Settings::load_from(file.path()),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut settings = Settings::default();
        settings.daily_allowance = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.reset_hour_utc = 24;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.poll_interval_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }
}
