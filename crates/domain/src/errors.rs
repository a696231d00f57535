//! Domain errors - business rule violations only.

use thiserror::Error;

/// Violations of the knowledge/review business rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title too long: {actual} characters, maximum {max}")]
    TitleTooLong { max: usize, actual: usize },

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Priority out of range: {0}, must be between 1 and 5")]
    PriorityOutOfRange(u8),

    #[error("Invalid source type: {0}")]
    InvalidSourceType(String),

    #[error("Invalid severity: {0}")]
    InvalidSeverity(String),

    #[error("Feedback score out of range: {0}, must be 1, 2 or 3")]
    InvalidFeedbackScore(u8),

    #[error("Feedback comment too long: {actual} characters, maximum {max}")]
    FeedbackCommentTooLong { max: usize, actual: usize },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if error is an input validation error (they all are today,
    /// kept as a seam for future business-rule variants).
    pub fn is_validation_error(&self) -> bool {
        true
    }

    /// Error category label for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            DomainError::EmptyTitle
            | DomainError::TitleTooLong { .. }
            | DomainError::EmptyContent => "content",
            DomainError::InvalidCategory(_)
            | DomainError::InvalidSourceType(_)
            | DomainError::InvalidSeverity(_) => "classification",
            DomainError::PriorityOutOfRange(_) => "priority",
            DomainError::InvalidFeedbackScore(_)
            | DomainError::FeedbackCommentTooLong { .. } => "feedback",
        }
    }
}
