//! Application layer errors with categorization and mapping from the
//! domain layer.

use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain validation failures
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Request validation at the use-case boundary
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Resource does not exist or is soft-deleted
    #[error("Resource not found: {resource} with ID '{id}'")]
    NotFound { resource: String, id: String },

    /// Caller is not the owner of the resource
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    /// Upstream API failures (embedding/completion providers)
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Bounded operation exceeded its deadline
    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    /// Repository failures
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ApplicationError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn timeout<S: Into<String>>(operation: S) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalService { .. } | Self::Timeout { .. } | Self::Storage { .. }
        )
    }

    /// Stable category label for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::AccessDenied { .. } => "access_denied",
            Self::ExternalService { .. } => "external_service",
            Self::Timeout { .. } => "timeout",
            Self::Storage { .. } => "storage",
            Self::Configuration { .. } => "configuration",
        }
    }
}
