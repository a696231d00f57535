//! Knowledge - a user-owned coding rule fed into review prompts.
//!
//! Carries its own usage statistics and an optional embedding used for
//! similarity retrieval. The embedding is a cache over title+content and
//! is invalidated whenever the content changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{Category, SourceType};

/// Maximum title length, counted in characters.
pub const TITLE_MAX_CHARS: usize = 200;

/// A reusable coding rule owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledge {
    id: Uuid,
    owner_id: String,
    title: String,
    content: String,
    category: Category,
    priority: u8,
    source_type: SourceType,
    source_id: Option<Uuid>,
    usage_count: u32,
    last_used_at: Option<DateTime<Utc>>,
    embedding: Option<Vec<f32>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Knowledge {
    /// Create a manually entered knowledge item.
    pub fn new(
        owner_id: impl Into<String>,
        title: &str,
        content: &str,
        category: Category,
        priority: u8,
    ) -> DomainResult<Self> {
        Self::with_source(owner_id, title, content, category, priority, SourceType::Manual, None)
    }

    /// Create a knowledge item extracted from a past review.
    pub fn from_review(
        owner_id: impl Into<String>,
        review_id: Uuid,
        title: &str,
        content: &str,
        category: Category,
        priority: u8,
    ) -> DomainResult<Self> {
        Self::with_source(
            owner_id,
            title,
            content,
            category,
            priority,
            SourceType::Review,
            Some(review_id),
        )
    }

    fn with_source(
        owner_id: impl Into<String>,
        title: &str,
        content: &str,
        category: Category,
        priority: u8,
        source_type: SourceType,
        source_id: Option<Uuid>,
    ) -> DomainResult<Self> {
        let now = Utc::now();
        let item = Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            category,
            priority,
            source_type,
            source_id,
            usage_count: 0,
            last_used_at: None,
            embedding: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        item.validate()?;
        Ok(item)
    }

    fn validate(&self) -> DomainResult<()> {
        if self.title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(DomainError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual: title_chars,
            });
        }
        if self.content.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        if !(1..=5).contains(&self.priority) {
            return Err(DomainError::PriorityOutOfRange(self.priority));
        }
        Ok(())
    }

    // Getters

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }

    pub fn usage_count(&self) -> u32 {
        self.usage_count
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active
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

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    // Business operations

    /// Replace title/content/category/priority, re-validating the result.
    /// A cached embedding no longer describes the new text and is dropped.
    pub fn update_content(
        &mut self,
        title: &str,
        content: &str,
        category: Category,
        priority: u8,
    ) -> DomainResult<()> {
        let previous = (
            std::mem::take(&mut self.title),
            std::mem::take(&mut self.content),
            self.category,
            self.priority,
        );

        self.title = title.trim().to_string();
        self.content = content.trim().to_string();
        self.category = category;
        self.priority = priority;

        if let Err(e) = self.validate() {
            self.title = previous.0;
            self.content = previous.1;
            self.category = previous.2;
            self.priority = previous.3;
            return Err(e);
        }

        self.embedding = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record one use in a generated review.
    pub fn record_usage(&mut self) {
        self.usage_count += 1;
        let now = Utc::now();
        self.last_used_at = Some(now);
        self.updated_at = now;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Mark as deleted. The record stays addressable for reviews that
    /// reference it.
    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn set_embedding(&mut self, embedding: Vec<f32>) {
        self.embedding = Some(embedding);
        self.updated_at = Utc::now();
    }

    pub fn clear_embedding(&mut self) {
        self.embedding = None;
        self.updated_at = Utc::now();
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// Text that the embedding is computed over.
    pub fn embedding_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.content)
    }
}
