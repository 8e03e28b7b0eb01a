//! Error types for goldbook-core
//!
//! The balance engine itself never fails. Errors come from loading and
//! mapping book records, from lookups, from date ranges and from cheque
//! status changes.

use chrono::NaiveDate;
use goldbook_config::error::ConfigError;
use goldbook_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ChequeStatus;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Book not loaded
    NotLoaded,
    /// Account not found
    AccountNotFound,
    /// Voucher not found
    VoucherNotFound,
    /// Book could not be read or parsed
    LoadError,
    /// Invalid data format
    InvalidFormat,
    /// Validation error
    ValidationError,
    /// Configuration error
    ConfigError,
    /// Cheque status change not allowed
    InvalidChequeTransition,
    /// Range start after range end
    InvalidDateRange,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::VoucherNotFound => write!(f, "VOUCHER_NOT_FOUND"),
            ErrorCode::LoadError => write!(f, "LOAD_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InvalidChequeTransition => write!(f, "INVALID_CHEQUE_TRANSITION"),
            ErrorCode::InvalidDateRange => write!(f, "INVALID_DATE_RANGE"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for goldbook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Book not loaded")]
    NotLoaded,

    #[error("Account not found: {id}")]
    AccountNotFound { id: u64 },

    #[error("Voucher not found: {id}")]
    VoucherNotFound { id: u64 },

    #[error("Failed to load book: {message}")]
    LoadError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Cheque cannot move from {from} to {to}")]
    InvalidChequeTransition { from: ChequeStatus, to: ChequeStatus },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::VoucherNotFound { .. } => ErrorCode::VoucherNotFound,
            CoreError::LoadError { .. } => ErrorCode::LoadError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::InvalidChequeTransition { .. } => ErrorCode::InvalidChequeTransition,
            CoreError::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::AccountNotFound { .. } => ErrorSeverity::Info,
            CoreError::VoucherNotFound { .. } => ErrorSeverity::Info,
            CoreError::LoadError { .. } => ErrorSeverity::Error,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::InvalidChequeTransition { .. } => ErrorSeverity::Warning,
            CoreError::InvalidDateRange { .. } => ErrorSeverity::Warning,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details.with_suggestion("Load a book before running reports.".to_string());
            }
            CoreError::AccountNotFound { id } => {
                details = details.with_suggestion(format!(
                    "Check that account {} is listed under `accounts` in the book.",
                    id
                ));
                details = details.with_suggestion("Run `goldbook accounts` to list all accounts.".to_string());
            }
            CoreError::VoucherNotFound { .. } => {
                details = details.with_suggestion("Check that the voucher id is correct.".to_string());
            }
            CoreError::LoadError { message } => {
                details = details.with_detail(serde_json::json!({ "load_message": message }));
                details = details.with_suggestion(
                    "Check the syntax of the book file and every file it includes.".to_string(),
                );
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "format_message": message }));
                details = details.with_suggestion(
                    "Account types are Market, Casting, Faceting, Project or Gold Fixing.".to_string(),
                );
                details = details.with_suggestion("Voucher types are INV, REC or GFV.".to_string());
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
            }
            CoreError::InvalidChequeTransition { from, to } => {
                details = details.with_detail(serde_json::json!({ "from": from, "to": to }));
                if from.is_terminal() {
                    details = details.with_suggestion(format!("A {} cheque can no longer change.", from));
                } else {
                    details = details.with_suggestion(
                        "Cheques move pending -> deposited -> cleared; bounced cheques may be re-deposited."
                            .to_string(),
                    );
                }
            }
            CoreError::InvalidDateRange { .. } => {
                details = details.with_suggestion("Swap the start and end dates.".to_string());
            }
            CoreError::ConfigError { message } => {
                details = details.with_detail(serde_json::json!({ "config_message": message }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        CoreError::LoadError {
            message: error.to_string(),
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(error: ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Account the operation concerned, if any
    pub account_id: Option<u64>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            account_id: None,
            data: serde_json::json!({}),
        }
    }

    /// Add account ID
    pub fn with_account(mut self, account_id: u64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let level = match error.severity() {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error | ErrorSeverity::Critical => log::Level::Error,
        };
        log::log!(
            target: "goldbook::error",
            level,
            "[{}] {} - Operation: {} - Account: {:?}",
            error.code(),
            error,
            context.operation,
            context.account_id
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "goldbook::error",
            "WARNING: {} - Operation: {} - Account: {:?} - Data: {}",
            message,
            context.operation,
            context.account_id,
            context.data
        );
    }
}

// ==================== Tests ====================
