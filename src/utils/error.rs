use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Degree '{degree}' has no curricular plan")]
    NotConfigured { degree: String },

    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Lookup,
    DataSource,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScheduleError {
    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotConfigured { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::DataSource { .. } | Self::IoError(_) => ErrorCategory::DataSource,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 查無學期：呼叫端可以改用目前學期重試
            Self::NotFound { .. } => ErrorSeverity::Medium,
            Self::NotConfigured { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::SerializationError(_)
            | Self::CsvError(_) => ErrorSeverity::High,
            Self::DataSource { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotConfigured { .. } => {
                "Add at least one curricular plan to the degree in the catalog"
            }
            Self::NotFound { .. } => {
                "Check the term or degree key, or omit --term to use the current term"
            }
            Self::DataSource { .. } | Self::IoError(_) => {
                "Check that the catalog file exists and is readable"
            }
            Self::SerializationError(_) | Self::CsvError(_) => {
                "Try a different output format"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the reported field in the catalog file and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotConfigured { degree } => {
                format!("Degree '{}' has no curricular plan configured", degree)
            }
            Self::NotFound { kind, key } => format!("Could not find {} '{}'", kind, key),
            Self::IoError(e) => format!("Could not read the catalog: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
