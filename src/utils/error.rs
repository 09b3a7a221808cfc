use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Checkpoint error: {message}")]
    CheckpointError { message: String },

    #[error("Menu parse error: {message}")]
    ParseError { message: String },

    #[error("Mail delivery to {recipient} failed: {message}")]
    MailError { recipient: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DigestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn checkpoint(message: impl Into<String>) -> Self {
        Self::CheckpointError {
            message: message.into(),
        }
    }

    pub fn mail(recipient: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::MailError {
            recipient: recipient.into(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::CheckpointError { .. } => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ParseError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::MailError { .. } => ErrorCategory::Delivery,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check network access to the menu site and try again later",
            Self::IoError(_) => "Check that the configured files exist and are writable",
            Self::SerializationError(_) => "Check that the users file is a valid JSON array",
            Self::ConfigError { .. } | Self::MissingConfigError { .. } => {
                "Review hall-digest.toml and the environment variables it references"
            }
            Self::InvalidConfigValueError { .. } => "Correct the reported field in the config",
            Self::CheckpointError { .. } => {
                "The checkpoint file must contain a single line like '2024, 03, 04'"
            }
            Self::ParseError { .. } => "The menu page layout may have changed",
            Self::MailError { .. } => "Check the SMTP credentials and the recipient address",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) => "Could not reach the menu site".to_string(),
            Self::IoError(e) => format!("File access failed: {}", e),
            Self::SerializationError(e) => format!("Could not read the user list: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
            Self::CheckpointError { message } => format!("Checkpoint unreadable: {}", message),
            Self::ParseError { message } => format!("Menu could not be read: {}", message),
            Self::MailError { recipient, .. } => format!("Could not email {}", recipient),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_are_critical() {
        let err = DigestError::checkpoint("empty file");
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_mail_error_message_names_recipient() {
        let err = DigestError::mail("ada@example.com", "connection refused");
        assert_eq!(err.category(), ErrorCategory::Delivery);
        assert!(err.to_string().contains("ada@example.com"));
        assert!(err.user_friendly_message().contains("ada@example.com"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DigestError::MissingConfigError {
            field: "site.cookie".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.recovery_suggestion().is_empty());
    }
}
