use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    #[error("Project is inactive: {id}")]
    ProjectInactive { id: String },

    #[error("Theme not found: {id}")]
    ThemeNotFound { id: String },

    #[error("HTTP {status}: {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("{message}")]
    Transport { message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Precondition,
    Delivery,
    Config,
    System,
}

/// 錯誤嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PushError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PushError::ProjectNotFound { .. }
            | PushError::ProjectInactive { .. }
            | PushError::ThemeNotFound { .. } => ErrorCategory::Precondition,
            PushError::RemoteRejected { .. }
            | PushError::Transport { .. }
            | PushError::HttpError(_) => ErrorCategory::Delivery,
            PushError::ConfigValidationError { .. }
            | PushError::InvalidConfigValueError { .. }
            | PushError::MissingConfigError { .. } => ErrorCategory::Config,
            PushError::SerializationError(_) | PushError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PushError::RemoteRejected { .. } | PushError::Transport { .. } => {
                ErrorSeverity::Medium
            }
            PushError::ProjectNotFound { .. }
            | PushError::ProjectInactive { .. }
            | PushError::ThemeNotFound { .. }
            | PushError::ConfigValidationError { .. }
            | PushError::InvalidConfigValueError { .. }
            | PushError::MissingConfigError { .. } => ErrorSeverity::High,
            PushError::HttpError(_) | PushError::SerializationError(_) | PushError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Retry applies to delivery outcomes only. Precondition and
    /// configuration errors fail the chain immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PushError::RemoteRejected { .. } | PushError::Transport { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PushError::ProjectNotFound { .. } => {
                "Check that the project id exists in your manifest"
            }
            PushError::ProjectInactive { .. } => {
                "Activate the project in your manifest (is_active = true)"
            }
            PushError::ThemeNotFound { .. } => "Check that the theme id exists in your manifest",
            PushError::RemoteRejected { .. } => {
                "Check the receiving endpoint's logs; the request reached it but was rejected"
            }
            PushError::Transport { .. } => {
                "Check the webhook URL and that the endpoint is reachable"
            }
            PushError::HttpError(_) => "Check TLS configuration and local network settings",
            PushError::SerializationError(_) => "Check the theme content for non-serializable data",
            PushError::IoError(_) => "Check file permissions and available disk space",
            PushError::ConfigValidationError { .. }
            | PushError::InvalidConfigValueError { .. }
            | PushError::MissingConfigError { .. } => {
                "Fix the manifest or CLI arguments and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PushError::ProjectNotFound { id } => {
                format!("No project named '{}' is registered", id)
            }
            PushError::ProjectInactive { id } => {
                format!("Project '{}' is registered but currently inactive", id)
            }
            PushError::ThemeNotFound { id } => format!("No theme named '{}' is registered", id),
            PushError::RemoteRejected { status, .. } => {
                format!("The endpoint rejected the delivery with status {}", status)
            }
            PushError::Transport { message } => format!("Could not reach the endpoint: {}", message),
            PushError::HttpError(e) => format!("HTTP client failure: {}", e),
            PushError::SerializationError(e) => format!("Could not serialize the payload: {}", e),
            PushError::IoError(e) => format!("File operation failed: {}", e),
            PushError::ConfigValidationError { field, message } => {
                format!("Configuration problem with '{}': {}", field, message)
            }
            PushError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid {} ({})", value, field, reason)
            }
            PushError::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PushError>;
