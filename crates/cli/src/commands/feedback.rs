//! `kaizen feedback` - rate a past review.

use anyhow::Result;
use clap::Args;
use console::style;
use uuid::Uuid;

use application::dtos::UpdateFeedbackRequest;
use application::use_cases::UpdateFeedbackUseCase;

use crate::context;

#[derive(Debug, Args)]
pub struct FeedbackCommand {
    /// Review ID, as printed by `review` and `history`
    id: Uuid,

    /// 1 (not helpful) to 3 (helpful)
    score: u8,

    /// Optional free-form note, up to 500 characters
    #[arg(short, long)]
    comment: Option<String>,
}

impl FeedbackCommand {
    pub async fn execute(self, owner: &str) -> Result<()> {
        let use_case = UpdateFeedbackUseCase::new(context::open_review_store()?);
        let review = use_case
            .execute(UpdateFeedbackRequest {
                owner_id: owner.to_string(),
                review_id: self.id,
                score: self.score,
                comment: self.comment,
            })
            .await?;
        println!(
            "{} feedback {}/3 recorded for {}",
            style("Saved").green().bold(),
            self.score,
            review.id()
        );
        Ok(())
    }
}
