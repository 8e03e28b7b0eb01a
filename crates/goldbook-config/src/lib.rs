//! Configuration management for goldbook
//!
//! This module handles loading, validation, and management of
//! goldbook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the book directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Main book file name (YAML or JSON)
    #[serde(default = "default_book_file")]
    pub book_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            book_file: default_book_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_book_file() -> String {
    "book.yaml".to_string()
}

/// Ledger amounts and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Currency code used for the currency column
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Decimal places for currency amounts (fils)
    #[serde(default = "default_places")]
    pub currency_decimal_places: u32,
    /// Decimal places for gold weights
    #[serde(default = "default_places")]
    pub gold_decimal_places: u32,
    /// Unit label for gold weights
    #[serde(default = "default_gold_unit")]
    pub gold_unit: String,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            currency_decimal_places: default_places(),
            gold_decimal_places: default_places(),
            gold_unit: default_gold_unit(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.currency.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "ledger.currency".to_string(),
            });
        }
        if self.currency_decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::out_of_range(
                "ledger.currency_decimal_places",
                self.currency_decimal_places,
                0,
                u64::from(MAX_DECIMAL_PLACES),
            ));
        }
        if self.gold_decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::out_of_range(
                "ledger.gold_decimal_places",
                self.gold_decimal_places,
                0,
                u64::from(MAX_DECIMAL_PLACES),
            ));
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "KWD".to_string()
}

fn default_places() -> u32 {
    3
}

fn default_gold_unit() -> String {
    "g".to_string()
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Printed statement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Ledger rows per printed page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// Heading printed on every page
    #[serde(default = "default_statement_title")]
    pub title: String,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            title: default_statement_title(),
        }
    }
}

impl StatementConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rows_per_page == 0 || self.rows_per_page > MAX_ROWS_PER_PAGE {
            return Err(ConfigError::out_of_range(
                "statement.rows_per_page",
                self.rows_per_page as u64,
                1,
                MAX_ROWS_PER_PAGE as u64,
            ));
        }
        Ok(())
    }
}

fn default_rows_per_page() -> usize {
    25
}

fn default_statement_title() -> String {
    "Statement of Account".to_string()
}

/// Time range configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRangeConfig {
    /// Default time range (e.g., "month", "quarter", "year", "all")
    #[serde(default)]
    pub default_range: TimeRange,
    /// Fiscal year start month (1-12)
    #[serde(default = "default_fiscal_start")]
    pub fiscal_year_start: u32,
}

impl Default for TimeRangeConfig {
    fn default() -> Self {
        Self {
            default_range: TimeRange::default(),
            fiscal_year_start: default_fiscal_start(),
        }
    }
}

impl TimeRangeConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=12).contains(&self.fiscal_year_start) {
            return Err(ConfigError::out_of_range(
                "time_range.fiscal_year_start",
                self.fiscal_year_start,
                1,
                12,
            ));
        }
        Ok(())
    }
}

fn default_fiscal_start() -> u32 {
    1
}

/// Time range enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Current month
    Month,
    /// Current calendar quarter
    Quarter,
    /// Current year
    Year,
    /// All time
    All,
    /// Custom range
    Custom,
}

impl Default for TimeRange {
    fn default() -> Self {
        TimeRange::All
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            "custom" => Ok(TimeRange::Custom),
            _ => Err(format!("Invalid time range: {}", s)),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
            TimeRange::All => write!(f, "all"),
            TimeRange::Custom => write!(f, "custom"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl LoggingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::UnknownLogLevel {
                level: self.level.clone(),
            });
        }
        Ok(())
    }
}

const MAX_DECIMAL_PLACES: u32 = 10;
const MAX_ROWS_PER_PAGE: usize = 500;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Amount and formatting settings
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Statement pagination settings
    #[serde(default)]
    pub statement: StatementConfig,
    /// Time range settings
    #[serde(default)]
    pub time_range: TimeRangeConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data.book_file.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "data.book_file".to_string(),
            });
        }
        self.ledger.validate()?;
        self.statement.validate()?;
        self.time_range.validate()?;
        self.logging.validate()
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the main book file
    pub fn book_path(&self) -> PathBuf {
        self.data.path.join(&self.data.book_file)
    }
}
