//! SourceType - where a knowledge item came from.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Provenance of a knowledge item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Entered by the user directly.
    #[default]
    Manual,
    /// Extracted from a past review.
    Review,
    /// Extracted from a conversation.
    Conversation,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Manual => "manual",
            SourceType::Review => "review",
            SourceType::Conversation => "conversation",
        }
    }

    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "manual" => Ok(SourceType::Manual),
            "review" => Ok(SourceType::Review),
            "conversation" => Ok(SourceType::Conversation),
            _ => Err(DomainError::InvalidSourceType(s.to_string())),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
