use crate::domain::model::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Unique constraint '{constraint}' violated: {message}")]
    UniqueViolation { constraint: String, message: String },

    #[error("Foreign key '{constraint}' violated: {message}")]
    ForeignKeyViolation { constraint: String, message: String },

    #[error("{entity} #{id} not found")]
    NotFound { entity: EntityKind, id: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClinicError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: EntityKind, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Validation failures are expected outcomes: the requested action was not
    /// performed and the message should be shown to the caller as-is.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::UniqueViolation { .. }
            | Self::ForeignKeyViolation { .. }
            | Self::NotFound { .. } => ErrorCategory::Persistence,
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Persistence | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::UniqueViolation { message, .. } => message.clone(),
            Self::ForeignKeyViolation { message, .. } => message.clone(),
            Self::NotFound { entity, id } => format!("No {} with id {} exists", entity, id),
            Self::IoError(e) => format!("Could not access clinic data: {}", e),
            Self::SerializationError(e) => format!("Clinic data file is corrupt: {}", e),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            Self::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid value for '{}': {}", value, field, reason),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Correct the highlighted value and try again",
            Self::UniqueViolation { .. } => "Choose a name that is not already used for this owner",
            Self::ForeignKeyViolation { .. } => {
                "Remove the dependent records first (visits, then pets, then owners)"
            }
            Self::NotFound { .. } => "Check the id with one of the list commands",
            Self::IoError(_) => "Check that the storage path exists and is writable",
            Self::SerializationError(_) => "Restore the data file from a backup or run teardown",
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_medium_severity() {
        let err = ClinicError::validation("at", "You cannot schedule a visit in the past");
        assert!(err.is_validation());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(
            err.user_friendly_message(),
            "You cannot schedule a visit in the past"
        );
    }

    #[test]
    fn test_storage_errors_are_critical() {
        let err = ClinicError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_validation());
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = ClinicError::not_found(EntityKind::Pet, 7);
        assert_eq!(err.to_string(), "Pet #7 not found");
        assert_eq!(err.category(), ErrorCategory::Persistence);
    }
}
