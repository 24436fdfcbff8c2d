//! # Engine Configuration
//!
//! ## Configuration Sources (in order of precedence)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment variables (highest priority)                            │
//! │     HOTEL_DB_PATH, HOTEL_HOLD_MINUTES, HOTEL_SWEEP_INTERVAL_SECS,       │
//! │     HOTEL_TAX_RATE_BPS, HOTEL_UTC_OFFSET_HOURS                          │
//! │                                                                         │
//! │  2. Config file (hotel.toml)                                            │
//! │     Linux:   ~/.config/hotel-booking/hotel.toml                         │
//! │     macOS:   ~/Library/Application Support/com.hotel.booking/hotel.toml │
//! │                                                                         │
//! │  3. Defaults (lowest priority)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example hotel.toml
//! ```toml
//! [booking]
//! hold_minutes = 30
//! tax_rate_bps = 700
//!
//! [sweeper]
//! interval_secs = 60
//!
//! [database]
//! path = "./hotel.db"
//! max_connections = 5
//! busy_timeout_secs = 5
//!
//! [business]
//! utc_offset_hours = 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use hotel_core::validation::validate_tax_rate_bps;
use hotel_core::{TaxRate, DEFAULT_HOLD_MINUTES, DEFAULT_TAX_RATE_BPS, MAX_HOLD_MINUTES};
use hotel_db::DbConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Sections
// =============================================================================

/// Booking creation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSettings {
    /// How long a pending booking holds its room before the sweeper cancels it.
    #[serde(default = "default_hold_minutes")]
    pub hold_minutes: i64,

    /// Tax rate in basis points (700 = 7%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_hold_minutes() -> i64 {
    DEFAULT_HOLD_MINUTES
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            hold_minutes: default_hold_minutes(),
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweeperSettings {
    /// Seconds between expiration sweeps.
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SweeperSettings {
    fn default() -> Self {
        SweeperSettings {
            interval_secs: default_sweep_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a writer queues for the SQLite write lock.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./hotel.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

/// Where the hotel is. "Today" for room blocks is the hotel's local date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSettings {
    /// Offset from UTC in whole hours. Default: 7 (Asia/Bangkok).
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

fn default_utc_offset() -> i32 {
    7
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            utc_offset_hours: default_utc_offset(),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub booking: BookingSettings,

    #[serde(default)]
    pub sweeper: SweeperSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub business: BusinessSettings,
}

impl EngineConfig {
    /// Loads configuration: defaults, then the TOML file (explicit path or
    /// the platform default), then environment overrides, then validation.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HOLD_MINUTES).contains(&self.booking.hold_minutes) {
            return Err(ConfigError::Invalid(format!(
                "booking.hold_minutes must be between 1 and {MAX_HOLD_MINUTES}, got {}",
                self.booking.hold_minutes
            )));
        }

        validate_tax_rate_bps(self.booking.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(format!("booking.{e}")))?;

        if self.sweeper.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "sweeper.interval_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if !(-14..=14).contains(&self.business.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "business.utc_offset_hours must be between -14 and 14, got {}",
                self.business.utc_offset_hours
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `HOTEL_*` overrides from `lookup`. Unparseable values are
    /// logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("HOTEL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(value) = lookup("HOTEL_HOLD_MINUTES") {
            match value.parse() {
                Ok(minutes) => self.booking.hold_minutes = minutes,
                Err(_) => warn!(value = %value, "Ignoring invalid HOTEL_HOLD_MINUTES"),
            }
        }

        if let Some(value) = lookup("HOTEL_SWEEP_INTERVAL_SECS") {
            match value.parse() {
                Ok(secs) => self.sweeper.interval_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid HOTEL_SWEEP_INTERVAL_SECS"),
            }
        }

        if let Some(value) = lookup("HOTEL_TAX_RATE_BPS") {
            match value.parse() {
                Ok(bps) => self.booking.tax_rate_bps = bps,
                Err(_) => warn!(value = %value, "Ignoring invalid HOTEL_TAX_RATE_BPS"),
            }
        }

        if let Some(value) = lookup("HOTEL_UTC_OFFSET_HOURS") {
            match value.parse() {
                Ok(hours) => self.business.utc_offset_hours = hours,
                Err(_) => warn!(value = %value, "Ignoring invalid HOTEL_UTC_OFFSET_HOURS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "hotel", "booking")
            .map(|dirs| dirs.config_dir().join("hotel.toml"))
    }

    /// Hold length, clamped to `1..=MAX_HOLD_MINUTES` for configs that
    /// skipped [`validate`](Self::validate).
    pub fn hold_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.booking.hold_minutes.clamp(1, MAX_HOLD_MINUTES))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweeper.interval_secs)
    }

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.booking.tax_rate_bps)
    }

    /// The hotel's UTC offset. Out-of-range values fall back to UTC;
    /// [`validate`](Self::validate) rejects them before this is reached.
    pub fn business_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.business.utc_offset_hours * 3600)
            .unwrap_or(Utc.fix())
    }

    /// The hotel's local calendar date at instant `now`.
    pub fn business_today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.business_offset()).date_naive()
    }

    /// Database settings as a pool configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path)
            .max_connections(self.database.max_connections)
            .busy_timeout(Duration::from_secs(self.database.busy_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.booking.hold_minutes, 30);
        assert_eq!(config.tax_rate().bps(), 700);
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.database.path, PathBuf::from("./hotel.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [booking]
            hold_minutes = 15

            [database]
            path = "/var/lib/hotel/hotel.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.booking.hold_minutes, 15);
        assert_eq!(config.booking.tax_rate_bps, 700);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.sweeper.interval_secs, 60);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HOTEL_HOLD_MINUTES", "45"),
            ("HOTEL_SWEEP_INTERVAL_SECS", "not-a-number"),
            ("HOTEL_DB_PATH", "/tmp/override.db"),
        ]);

        let mut config = EngineConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.booking.hold_minutes, 45);
        assert_eq!(config.sweeper.interval_secs, 60);
        assert_eq!(config.database.path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.sweeper.interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EngineConfig::default();
        config.booking.tax_rate_bps = 12_000;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.business.utc_offset_hours = 15;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_hold_rejected_and_never_panics() {
        let mut config = EngineConfig::default();
        config.booking.hold_minutes = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert_eq!(config.hold_duration(), chrono::Duration::minutes(MAX_HOLD_MINUTES));

        config.booking.hold_minutes = MAX_HOLD_MINUTES;
        assert!(config.validate().is_ok());

        config.booking.hold_minutes = 0;
        assert!(config.validate().is_err());
        assert_eq!(config.hold_duration(), chrono::Duration::minutes(1));
    }

    #[test]
    fn test_huge_hold_from_env_fails_load_validation() {
        let env: HashMap<&str, &str> = [("HOTEL_HOLD_MINUTES", "9223372036854775807")].into();
        let mut config = EngineConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.booking.hold_minutes, i64::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_business_today_uses_offset() {
        let config = EngineConfig::default();
        // 18:30 UTC is already the next day in Bangkok.
        let now = Utc.with_ymd_and_hms(2024, 1, 9, 18, 30, 0).unwrap();
        assert_eq!(
            config.business_today(now),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }
}
