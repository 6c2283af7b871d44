//! Error handling for netweaver

use thiserror::Error;

/// Custom error types for netweaver
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors, including a sequence-split index that
    /// is out of range for the configured column layout
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors for user-supplied values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote command session errors (ssh spawn/exec failures)
    #[error("Remote session error: {0}")]
    Session(String),

    /// Capture orchestration errors (vif resolution, capture commands)
    #[error("Capture error: {0}")]
    Capture(String),

    /// Capture file retrieval errors (scp failures)
    #[error("File transfer error: {0}")]
    Transfer(String),

    /// A capture line had enough tokens but its timestamp token does not
    /// parse as HH:MM:SS.ffffff; aborts the whole normalization pass since
    /// it indicates the wrong column index or capture tool
    #[error("Timestamp format error: token '{token}' does not match HH:MM:SS.ffffff")]
    TimestampFormat { token: String },

    /// The two captures share no sequence key at all, so no delta can be
    /// computed; distinct from "both captures empty"
    #[error("No shared sequence keys between the two captures")]
    EmptyIntersection,

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (numbers, addresses, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new remote session error
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    /// Create a new capture orchestration error
    pub fn capture<S: Into<String>>(message: S) -> Self {
        Self::Capture(message.into())
    }

    /// Create a new file transfer error
    pub fn transfer<S: Into<String>>(message: S) -> Self {
        Self::Transfer(message.into())
    }

    /// Create a new timestamp format error for the offending token
    pub fn timestamp_format<S: Into<String>>(token: S) -> Self {
        Self::TimestampFormat {
            token: token.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Session(_) => "SESSION",
            Self::Capture(_) => "CAPTURE",
            Self::Transfer(_) => "TRANSFER",
            Self::TimestampFormat { .. } => "TIMESTAMP",
            Self::EmptyIntersection => "CORRELATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Session(_) | Self::Transfer(_) => true,
            Self::Config(_) | Self::Validation(_) | Self::Capture(_) => false,
            Self::TimestampFormat { .. } | Self::EmptyIntersection => false,
            Self::Io(_) | Self::Parse(_) | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1, // Invalid configuration/usage
            Self::Session(_) => 2,                // Remote session issues
            Self::Capture(_) => 3,                // Capture orchestration issues
            Self::Transfer(_) => 4,               // File retrieval issues
            Self::TimestampFormat { .. } => 5,    // Normalization failed
            Self::EmptyIntersection => 6,         // Correlation failed
            Self::Io(_) => 7,                     // I/O issues
            Self::Internal(_) => 99,              // Internal/unexpected errors
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the format of your IP addresses, paths, or other configuration values.", msg)
            }
            Self::Session(msg) => {
                format!("Remote session failed: {}\n\nSuggestion: Verify the host is reachable over ssh and the key path is correct.", msg)
            }
            Self::Capture(msg) => {
                format!("Capture setup failed: {}\n\nSuggestion: Verify the guest name label exists on the hypervisor and tcpdump/hping3 are installed.", msg)
            }
            Self::Transfer(msg) => {
                format!("Capture retrieval failed: {}\n\nSuggestion: Check that the capture files were written on the remote host and scp is available.", msg)
            }
            Self::TimestampFormat { token } => {
                format!("Timestamp token '{}' did not parse as HH:MM:SS.ffffff.\n\nSuggestion: Check the --timestamp-column index against the capture tool's output layout.", token)
            }
            Self::EmptyIntersection => {
                "The two captures never matched on a single sequence key.\n\nSuggestion: Check the --seq-column and --seq-split settings, and confirm both captures saw the same traffic stream.".to_string()
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data or configuration files.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Session(_) | Self::Transfer(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Capture(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::TimestampFormat { .. } | Self::EmptyIntersection => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

impl From<std::net::AddrParseError> for AppError {
    fn from(error: std::net::AddrParseError) -> Self {
        Self::parse(format!("IP address parse error: {}", error))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let original_error = e.into();
            let context = f();
            AppError::internal(format!("{}: {}", context, original_error))
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());

            if error.is_recoverable() {
                eprintln!();
                if self.use_color {
                    use colored::Colorize;
                    eprintln!("{}", "This error might be temporary. You can try running the command again.".green());
                } else {
                    eprintln!("This error might be temporary. You can try running the command again.");
                }
            }
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert!(!config_error.is_recoverable());
        assert_eq!(config_error.exit_code(), 1);

        let session_error = AppError::session("Connection refused");
        assert_eq!(session_error.category(), "SESSION");
        assert!(session_error.is_recoverable());
        assert_eq!(session_error.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::config("Test configuration error");
        let display = error.to_string();
        assert!(display.contains("Configuration error"));
        assert!(display.contains("Test configuration error"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::validation("validation"),
            AppError::session("session"),
            AppError::capture("capture"),
            AppError::transfer("transfer"),
            AppError::timestamp_format("10:61:00"),
            AppError::EmptyIntersection,
            AppError::io("io"),
            AppError::parse("parse"),
            AppError::internal("internal"),
        ];

        let expected_categories = [
            "CONFIG",
            "VALIDATION",
            "SESSION",
            "CAPTURE",
            "TRANSFER",
            "TIMESTAMP",
            "CORRELATION",
            "IO",
            "PARSE",
            "INTERNAL",
        ];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AppError::session("test").is_recoverable());
        assert!(AppError::transfer("test").is_recoverable());

        assert!(!AppError::config("test").is_recoverable());
        assert!(!AppError::timestamp_format("bad").is_recoverable());
        assert!(!AppError::EmptyIntersection.is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::session("test").exit_code(), 2);
        assert_eq!(AppError::capture("test").exit_code(), 3);
        assert_eq!(AppError::transfer("test").exit_code(), 4);
        assert_eq!(AppError::timestamp_format("test").exit_code(), 5);
        assert_eq!(AppError::EmptyIntersection.exit_code(), 6);
        assert_eq!(AppError::io("test").exit_code(), 7);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_timestamp_format_keeps_token() {
        let error = AppError::timestamp_format("not-a-time");
        assert!(error.to_string().contains("not-a-time"));
        assert!(error.to_string().contains("HH:MM:SS.ffffff"));
    }

    #[test]
    fn test_empty_intersection_distinct_from_parse() {
        let correlation = AppError::EmptyIntersection;
        let parse = AppError::parse("no data");
        assert_ne!(correlation.category(), parse.category());
        assert_ne!(correlation.exit_code(), parse.exit_code());
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::config("Missing key path");
        let message = error.user_friendly_message();
        assert!(message.contains("Configuration problem"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("Missing key path"));

        let message = AppError::EmptyIntersection.user_friendly_message();
        assert!(message.contains("--seq-column"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<i32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let addr_error = "not-an-ip".parse::<std::net::IpAddr>().unwrap_err();
        let app_error: AppError = addr_error.into();
        assert_eq!(app_error.category(), "PARSE");
    }

    #[test]
    fn test_json_parse_error_conversion() {
        let json_error: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert_eq!(app_error.category(), "PARSE");
        assert!(app_error.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("Test anyhow error");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");
    }

    #[test]
    fn test_error_context() {
        let result: Result<i32> = Err(AppError::session("Connection failed"));
        let with_context = result.context("While verifying remote hosts");

        assert!(with_context.is_err());
        let error = with_context.unwrap_err();
        assert_eq!(error.category(), "INTERNAL");
        assert!(error.to_string().contains("While verifying remote hosts"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert!(formatted_no_color.contains("[CONFIG]"));
        assert!(formatted_no_color.contains("Test error"));
        assert!(formatted_color.contains("Test error"));
    }

    #[test]
    fn test_error_reporter() {
        let reporter = ErrorReporter::new(false, true);
        let error = AppError::config("Test error");

        // Just test that it doesn't panic
        reporter.report_error(&error);

        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }
}
