use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Malformed opening window #{index} (day {day}): closes at {closes_at}, which is not after {opens_at}")]
    MalformedWindow {
        index: usize,
        day: u8,
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    },

    #[error("Opening window #{index} has invalid day {day}, expected 1 to 7")]
    InvalidDay { index: usize, day: u8 },

    #[error("Opening windows #{first} and #{second} overlap on day {day}")]
    ScheduleConflict { day: u8, first: usize, second: usize },

    #[error("No opening window at position {index}")]
    WindowNotFound { index: usize },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Action rejected by server (status {status}){}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    ActionRejected { status: u16, message: Option<String> },

    #[error("Mutation failed: {message}")]
    MutationFailed { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, AdminError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schedule,
    Validation,
    Remote,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdminError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedWindow { .. }
            | Self::InvalidDay { .. }
            | Self::ScheduleConflict { .. }
            | Self::WindowNotFound { .. } => ErrorCategory::Schedule,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ActionRejected { .. } | Self::MutationFailed { .. } | Self::ApiError(_) => {
                ErrorCategory::Remote
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Io,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Schedule | ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// True for errors resolved inside the form layer. These never reach the
    /// mutation pipeline.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Schedule | ErrorCategory::Validation
        )
    }

    /// The human-readable message embedded by the server in a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ActionRejected {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedWindow { .. } => {
                "Closing time must be after opening time".to_string()
            }
            Self::InvalidDay { .. } => "Day of week must be between 1 and 7".to_string(),
            Self::ScheduleConflict { .. } => "Opening hours overlap on the same day".to_string(),
            Self::WindowNotFound { .. } => "This opening window no longer exists".to_string(),
            Self::ValidationError { message, .. } | Self::MutationFailed { message } => {
                message.clone()
            }
            Self::ActionRejected { .. } | Self::ApiError(_) => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| "The server could not complete the operation".to_string()),
            Self::IoError(e) => format!("Could not read or write a file: {}", e),
            Self::SerializationError(e) => format!("Invalid JSON document: {}", e),
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MalformedWindow { .. } => "Pick a closing time later than the opening time",
            Self::InvalidDay { .. } => "Use 1 for Monday through 7 for Sunday",
            Self::ScheduleConflict { .. } => {
                "Adjust or remove one of the overlapping windows; touching windows are allowed"
            }
            Self::WindowNotFound { .. } => "Reload the schedule and try again",
            Self::ValidationError { .. } => "Correct the highlighted field and submit again",
            Self::ActionRejected { .. } | Self::MutationFailed { .. } => {
                "Review the server message and retry"
            }
            Self::ApiError(_) => "Check that the API is reachable and retry",
            Self::IoError(_) => "Check the file path and permissions",
            Self::SerializationError(_) => "Check the document is valid JSON",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and restart",
        }
    }
}
