//! Review pipeline and review query DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::Review;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCodeRequest {
    pub owner_id: String,
    pub code: String,
    pub language: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCodeResponse {
    pub review: Review,
    /// True when the embedding step failed and retrieval fell back to
    /// all active knowledge items.
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReviewsRequest {
    pub owner_id: String,
    /// 1-based; defaults to 1.
    pub page: Option<u32>,
    /// Defaults to 10, capped at 100.
    pub page_size: Option<u32>,
    pub language: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// `created_at` (default) or `language`.
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReviewsResponse {
    pub items: Vec<Review>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFeedbackRequest {
    pub owner_id: String,
    pub review_id: Uuid,
    /// 1 (bad) to 3 (good).
    pub score: u8,
    pub comment: Option<String>,
}
