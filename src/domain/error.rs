use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Collaborator unavailable: {operation} - {message}")]
    CollaboratorUnavailable { operation: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn collaborator(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the external retrieval/generation layer
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::CollaboratorUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("weights sum to 0.9");
        assert_eq!(error.to_string(), "Configuration error: weights sum to 0.9");
    }

    #[test]
    fn test_collaborator_error() {
        let error = DomainError::collaborator("retrieve", "connection refused");
        assert_eq!(
            error.to_string(),
            "Collaborator unavailable: retrieve - connection refused"
        );
        assert!(error.is_collaborator());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert!(!error.is_collaborator());
    }
}
