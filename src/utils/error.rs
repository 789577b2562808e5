use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    /// No response was obtained from the backend.
    #[error("Transport failure: {message}")]
    TransportError { message: String },

    /// A response arrived but its status or body was not what the call expects.
    #[error("Request failed ({status} {status_text}): {message}")]
    ApplicationError {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl From<reqwest::Error> for FinderError {
    fn from(e: reqwest::Error) -> Self {
        FinderError::TransportError {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Request,
    LocalIo,
    Validation,
}

impl FinderError {
    pub fn transport(message: impl Into<String>) -> Self {
        FinderError::TransportError {
            message: message.into(),
        }
    }

    pub fn application(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        FinderError::ApplicationError {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::TransportError { .. } | FinderError::ApplicationError { .. } => {
                ErrorCategory::Request
            }
            FinderError::CsvError(_) | FinderError::IoError(_) | FinderError::SerializationError(_) => {
                ErrorCategory::LocalIo
            }
            FinderError::ConfigError { .. } | FinderError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            FinderError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn is_request_failure(&self) -> bool {
        self.category() == ErrorCategory::Request
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Validation => 1,
            ErrorCategory::Request => 2,
            ErrorCategory::LocalIo => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::TransportError { .. } => "Could not reach the tenant registry.".to_string(),
            FinderError::ApplicationError {
                status, status_text, ..
            } => format!("The tenant registry rejected the request ({} {}).", status, status_text),
            FinderError::CsvError(e) => format!("Could not write CSV output: {}", e),
            FinderError::IoError(e) => format!("File operation failed: {}", e),
            FinderError::SerializationError(e) => format!("Could not encode data: {}", e),
            FinderError::ConfigError { message } => format!("Invalid configuration: {}", message),
            FinderError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting `{}`: {}", field, reason)
            }
            FinderError::ValidationError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Request => "Check that the server is running and --base-url points at it",
            ErrorCategory::LocalIo => "Check that the output directory exists and is writable",
            ErrorCategory::Configuration => "Fix the value in the config file or on the command line",
            ErrorCategory::Validation => "Adjust the command arguments and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
