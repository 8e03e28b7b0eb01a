//! Error types for goldbook-config

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    Unreadable,
    InvalidYaml,
    EmptyField,
    OutOfRange,
    UnknownLogLevel,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ConfigErrorCode::Unreadable => write!(f, "UNREADABLE"),
            ConfigErrorCode::InvalidYaml => write!(f, "INVALID_YAML"),
            ConfigErrorCode::EmptyField => write!(f, "EMPTY_FIELD"),
            ConfigErrorCode::OutOfRange => write!(f, "OUT_OF_RANGE"),
            ConfigErrorCode::UnknownLogLevel => write!(f, "UNKNOWN_LOG_LEVEL"),
        }
    }
}

/// Reportable form of a [`ConfigError`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    /// Dotted config key, e.g. `statement.rows_per_page`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Accepted values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Value found in the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ConfigErrorDetails {
    fn new(code: ConfigErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            field: None,
            expected: None,
            actual: None,
            suggestion: None,
        }
    }

    fn with_value(mut self, field: &str, expected: String, actual: String) -> Self {
        self.field = Some(field.to_string());
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, "\nExpected {}, found {}", expected, actual)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read config file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid YAML in config: {message}")]
    InvalidYaml { message: String },

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("{field} is {actual}, must be between {min} and {max}")]
    OutOfRange {
        field: String,
        actual: u64,
        min: u64,
        max: u64,
    },

    #[error("Unknown log level '{level}'")]
    UnknownLogLevel { level: String },
}

impl ConfigError {
    pub(crate) fn out_of_range(field: &str, actual: impl Into<u64>, min: u64, max: u64) -> Self {
        ConfigError::OutOfRange {
            field: field.to_string(),
            actual: actual.into(),
            min,
            max,
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::Unreadable { .. } => ConfigErrorCode::Unreadable,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::EmptyField { .. } => ConfigErrorCode::EmptyField,
            ConfigError::OutOfRange { .. } => ConfigErrorCode::OutOfRange,
            ConfigError::UnknownLogLevel { .. } => ConfigErrorCode::UnknownLogLevel,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ConfigErrorDetails {
        let details = ConfigErrorDetails::new(self.code(), self.to_string());

        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorDetails {
                suggestion: Some("Run `goldbook default-config > config.yaml` to create one.".to_string()),
                ..details
            },
            ConfigError::EmptyField { field } => ConfigErrorDetails {
                field: Some(field.clone()),
                suggestion: Some(format!("Set '{}' in your config file or remove it to use the default.", field)),
                ..details
            },
            ConfigError::OutOfRange { field, actual, min, max } => {
                details.with_value(field, format!("{}..={}", min, max), actual.to_string())
            }
            ConfigError::UnknownLogLevel { level } => {
                details.with_value("logging.level", crate::LOG_LEVELS.join(", "), level.clone())
            }
            _ => details,
        }
    }
}

/// Result type with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_code() {
        let error = ConfigError::FileNotFound {
            path: "/path/to/config.yaml".to_string(),
        };
        assert_eq!(error.code(), ConfigErrorCode::FileNotFound);
        assert_eq!(error.code().to_string(), "FILE_NOT_FOUND");
        assert!(error.to_details().suggestion.unwrap().contains("default-config"));
    }

    #[test]
    fn test_out_of_range_details() {
        let details = ConfigError::out_of_range("time_range.fiscal_year_start", 13u32, 1, 12).to_details();
        assert_eq!(details.field.as_deref(), Some("time_range.fiscal_year_start"));
        assert_eq!(details.expected.as_deref(), Some("1..=12"));
        assert_eq!(details.actual.as_deref(), Some("13"));
        assert_eq!(
            details.to_string(),
            "[OUT_OF_RANGE] time_range.fiscal_year_start is 13, must be between 1 and 12\nExpected 1..=12, found 13"
        );
    }

    #[test]
    fn test_unknown_log_level_lists_levels() {
        let details = ConfigError::UnknownLogLevel { level: "loud".to_string() }.to_details();
        assert_eq!(details.actual.as_deref(), Some("loud"));
        assert!(details.expected.unwrap().contains("debug"));
    }
}
