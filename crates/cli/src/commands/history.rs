//! `kaizen history` and `kaizen show` - browse persisted reviews.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use console::style;
use uuid::Uuid;

use application::dtos::ListReviewsRequest;
use application::use_cases::{GetReviewUseCase, ListReviewsUseCase};

use crate::context;

#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// 1-based page number
    #[arg(long)]
    page: Option<u32>,

    /// Reviews per page (max 100)
    #[arg(long)]
    page_size: Option<u32>,

    /// Only reviews for this language
    #[arg(short, long)]
    language: Option<String>,

    /// Only reviews created on or after this day (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Only reviews created on or before this day (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// `created_at` (default, newest first) or `language`
    #[arg(long)]
    sort_by: Option<String>,
}

impl HistoryCommand {
    pub async fn execute(self, owner: &str) -> Result<()> {
        let created_from = self
            .from
            .as_deref()
            .map(|raw| parse_day_bound(raw, false))
            .transpose()?;
        let created_to = self
            .to
            .as_deref()
            .map(|raw| parse_day_bound(raw, true))
            .transpose()?;

        let use_case = ListReviewsUseCase::new(context::open_review_store()?);
        let response = use_case
            .execute(ListReviewsRequest {
                owner_id: owner.to_string(),
                page: self.page,
                page_size: self.page_size,
                language: self.language,
                created_from,
                created_to,
                sort_by: self.sort_by,
            })
            .await?;

        if response.items.is_empty() {
            println!("No reviews found");
            return Ok(());
        }

        for review in &response.items {
            let feedback = match review.feedback_score() {
                Some(score) => format!("  feedback {score}/3"),
                None => String::new(),
            };
            println!(
                "{}  {:<12} {}  {} tok{}",
                review.created_at().format("%Y-%m-%d %H:%M"),
                review.language(),
                style(review.id()).dim(),
                review.tokens_used(),
                feedback
            );
        }
        println!(
            "Page {}/{} ({} review(s) total)",
            response.page, response.total_pages, response.total
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Review ID, as printed by `review` and `history`
    id: Uuid,
}

impl ShowCommand {
    pub async fn execute(self, owner: &str) -> Result<()> {
        let use_case = GetReviewUseCase::new(context::open_review_store()?);
        let review = use_case.execute(owner, self.id).await?;

        println!("{}", style("Review").cyan().bold());
        println!("  ID:       {}", review.id());
        println!("  Language: {}", review.language());
        println!(
            "  Created:  {}",
            review.created_at().format("%Y-%m-%d %H:%M:%S")
        );
        println!(
            "  Model:    {}/{} ({} tokens)",
            review.llm_provider(),
            review.llm_model(),
            review.tokens_used()
        );
        if let Some(context) = review.context() {
            println!("  Context:  {context}");
        }
        if !review.referenced_knowledge().is_empty() {
            println!(
                "  Knowledge applied: {} item(s)",
                review.referenced_knowledge().len()
            );
        }
        if let Some(score) = review.feedback_score() {
            match review.feedback_comment() {
                Some(comment) => println!("  Feedback: {score}/3 - {comment}"),
                None => println!("  Feedback: {score}/3"),
            }
        }
        println!();
        println!("{}", review.raw_markdown());
        Ok(())
    }
}

fn parse_day_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date {raw:?} (expected YYYY-MM-DD)"))?;
    let (h, m, s) = if end_of_day { (23, 59, 59) } else { (0, 0, 0) };
    let naive = date.and_hms_opt(h, m, s).context("invalid time of day")?;
    Ok(naive.and_utc())
}
