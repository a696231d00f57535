//! `kaizen review` - run the full review pipeline on a source file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use application::dtos::ReviewCodeRequest;
use application::use_cases::{ReviewCodeUseCase, ReviewCodeUseCaseImpl};

use crate::context;

#[derive(Debug, Args)]
pub struct ReviewCommand {
    /// Source file to review.
    pub file: PathBuf,

    /// Language of the code, e.g. `Rust` or `TypeScript`.
    #[arg(short, long)]
    pub language: String,

    /// Extra context for the reviewer (purpose, constraints).
    #[arg(short, long)]
    pub context: Option<String>,
}

impl ReviewCommand {
    pub async fn execute(self, owner: &str) -> Result<()> {
        let code = std::fs::read_to_string(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;

        let knowledge_store = context::open_knowledge_store()?;
        let review_store = context::open_review_store()?;
        let embedding = context::embedding_provider()?;
        let (completion, review_config) = context::completion_provider()?;

        let use_case = ReviewCodeUseCaseImpl::new(
            embedding,
            completion,
            knowledge_store,
            review_store,
            review_config,
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(format!("Reviewing {}...", self.file.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));

        let result = use_case
            .review_code(ReviewCodeRequest {
                owner_id: owner.to_string(),
                code,
                language: self.language,
                context: self.context,
            })
            .await;
        spinner.finish_and_clear();

        let response = result?;
        let review = response.review;

        println!("{}", style("Review complete").cyan().bold());
        println!("  ID:     {}", review.id());
        println!(
            "  Model:  {} ({} tokens)",
            review.llm_model(),
            review.tokens_used()
        );
        if !review.referenced_knowledge().is_empty() {
            println!(
                "  Knowledge applied: {} item(s)",
                review.referenced_knowledge().len()
            );
        }
        if response.used_fallback {
            println!(
                "{}",
                style("  Note: similarity search was unavailable; all active knowledge was used")
                    .yellow()
            );
        }
        println!();
        println!("{}", review.raw_markdown());
        Ok(())
    }
}
