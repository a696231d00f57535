//! Review - one code-review transaction with its structured outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::Severity;

/// Maximum feedback comment length, counted in characters.
pub const FEEDBACK_COMMENT_MAX_CHARS: usize = 500;

/// One code submission and the generated review for it.
///
/// Created empty when the request starts; `set_review_result` fills the
/// output exactly once after generation and parsing succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    id: Uuid,
    owner_id: String,
    code: String,
    language: String,
    context: Option<String>,
    raw_markdown: String,
    structured: Option<StructuredReviewResult>,
    referenced_knowledge: Vec<Uuid>,
    llm_provider: String,
    llm_model: String,
    tokens_used: u32,
    feedback_score: Option<u8>,
    feedback_comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new(
        owner_id: impl Into<String>,
        code: impl Into<String>,
        language: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            code: code.into(),
            language: language.into(),
            context,
            raw_markdown: String::new(),
            structured: None,
            referenced_knowledge: Vec::new(),
            llm_provider: String::new(),
            llm_model: String::new(),
            tokens_used: 0,
            feedback_score: None,
            feedback_comment: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn raw_markdown(&self) -> &str {
        &self.raw_markdown
    }

    pub fn structured(&self) -> Option<&StructuredReviewResult> {
        self.structured.as_ref()
    }

    pub fn referenced_knowledge(&self) -> &[Uuid] {
        &self.referenced_knowledge
    }

    pub fn llm_provider(&self) -> &str {
        &self.llm_provider
    }

    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }

    pub fn tokens_used(&self) -> u32 {
        self.tokens_used
    }

    pub fn feedback_score(&self) -> Option<u8> {
        self.feedback_score
    }

    pub fn feedback_comment(&self) -> Option<&str> {
        self.feedback_comment.as_deref()
    }

    pub fn has_feedback(&self) -> bool {
        self.feedback_score.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    // Business operations

    /// Record the generation outcome. `referenced` is the exact list of
    /// knowledge items rendered into the prompt, in prompt order.
    #[allow(clippy::too_many_arguments)]
    pub fn set_review_result(
        &mut self,
        raw_markdown: impl Into<String>,
        structured: StructuredReviewResult,
        referenced: Vec<Uuid>,
        llm_provider: impl Into<String>,
        llm_model: impl Into<String>,
        tokens_used: u32,
    ) {
        self.raw_markdown = raw_markdown.into();
        self.structured = Some(structured);
        self.referenced_knowledge = referenced;
        self.llm_provider = llm_provider.into();
        self.llm_model = llm_model.into();
        self.tokens_used = tokens_used;
        self.updated_at = Utc::now();
    }

    /// Attach user feedback. Overwrites any previous feedback.
    pub fn set_feedback(&mut self, score: u8, comment: &str) -> DomainResult<()> {
        if !(1..=3).contains(&score) {
            return Err(DomainError::InvalidFeedbackScore(score));
        }
        let comment_chars = comment.chars().count();
        if comment_chars > FEEDBACK_COMMENT_MAX_CHARS {
            return Err(DomainError::FeedbackCommentTooLong {
                max: FEEDBACK_COMMENT_MAX_CHARS,
                actual: comment_chars,
            });
        }
        self.feedback_score = Some(score);
        self.feedback_comment = if comment.is_empty() {
            None
        } else {
            Some(comment.to_string())
        };
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Parsed, storable form of the model's markdown answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReviewResult {
    pub summary: String,
    pub good_points: Vec<String>,
    pub improvements: Vec<Improvement>,
}

/// One improvement section from the review, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub title: String,
    pub description: String,
    pub code_after: Option<String>,
    pub severity: Severity,
}
