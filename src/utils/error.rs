use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosterError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("VK API error {code}: {message}")]
    VkApiError { code: i64, message: String },

    // The upload server answered without a usable photo token; VK reports
    // no error object for this case, so it gets the fixed domain code 0.
    #[error("Image upload error")]
    EmptyUploadError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Io,
    Config,
    Data,
}

impl PosterError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PosterError::TransportError(_) => ErrorSeverity::Medium,
            PosterError::VkApiError { .. } | PosterError::EmptyUploadError => ErrorSeverity::High,
            PosterError::IoError(_) => ErrorSeverity::Critical,
            PosterError::SerializationError(_) | PosterError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            PosterError::ConfigError { .. }
            | PosterError::InvalidConfigValueError { .. }
            | PosterError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PosterError::TransportError(_) => ErrorCategory::Network,
            PosterError::VkApiError { .. } | PosterError::EmptyUploadError => ErrorCategory::Api,
            PosterError::IoError(_) => ErrorCategory::Io,
            PosterError::SerializationError(_) | PosterError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            PosterError::ConfigError { .. }
            | PosterError::InvalidConfigValueError { .. }
            | PosterError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    /// Domain error code, where one exists. The empty-upload case carries
    /// the fixed code 0 the VK upload contract reserves for it.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            PosterError::VkApiError { code, .. } => Some(*code),
            PosterError::EmptyUploadError => Some(0),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PosterError::TransportError(e) => format!("A network request failed: {}", e),
            PosterError::VkApiError { code, message } => {
                format!("VK rejected the request (error {}): {}", code, message)
            }
            PosterError::EmptyUploadError => {
                "VK accepted the upload but returned no photo token".to_string()
            }
            PosterError::IoError(e) => format!("A file operation failed: {}", e),
            PosterError::SerializationError(e) => format!("Unexpected response payload: {}", e),
            PosterError::ConfigError { message } => message.clone(),
            PosterError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid {}: {}", value, field, reason),
            PosterError::MissingConfigError { field } => {
                format!("{} is not set", field)
            }
            PosterError::ProcessingError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PosterError::TransportError(_) => {
                "Check your network connection and the service base URLs, then run again"
            }
            PosterError::VkApiError { .. } => {
                "Check that the access token is valid and has wall/photos permissions for the group"
            }
            PosterError::EmptyUploadError => "Run again; transient upload-server failures clear up",
            PosterError::IoError(_) => "Check that the working directory exists and is writable",
            PosterError::SerializationError(_) | PosterError::ProcessingError { .. } => {
                "The remote API may have changed shape; rerun with --verbose and inspect the logs"
            }
            PosterError::ConfigError { .. }
            | PosterError::InvalidConfigValueError { .. }
            | PosterError::MissingConfigError { .. } => {
                "Set VK_ACCESS_TOKEN and an integer VK_GROUP_NAME in the environment or .env"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_upload_carries_fixed_code_and_message() {
        let e = PosterError::EmptyUploadError;
        assert_eq!(e.api_code(), Some(0));
        assert_eq!(e.to_string(), "Image upload error");
    }

    #[test]
    fn vk_api_error_exposes_code_and_message() {
        let e = PosterError::VkApiError {
            code: 214,
            message: "Access to adding post denied".to_string(),
        };
        assert_eq!(e.api_code(), Some(214));
        assert_eq!(e.category(), ErrorCategory::Api);
        assert!(e.to_string().contains("214"));
        assert!(e.to_string().contains("Access to adding post denied"));
    }

    #[test]
    fn config_errors_are_critical() {
        let e = PosterError::MissingConfigError {
            field: "VK_ACCESS_TOKEN".to_string(),
        };
        assert_eq!(e.severity(), ErrorSeverity::Critical);
        assert_eq!(e.category(), ErrorCategory::Config);
        assert_eq!(e.api_code(), None);
    }
}
