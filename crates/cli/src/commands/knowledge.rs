//! `kaizen knowledge` - manage the review knowledge base.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use uuid::Uuid;

use application::dtos::{CreateKnowledgeRequest, ListKnowledgeRequest, UpdateKnowledgeRequest};
use application::use_cases::{
    BackfillEmbeddingsUseCase, CreateKnowledgeUseCase, DeleteKnowledgeUseCase,
    KnowledgeStatsUseCase, ListKnowledgeUseCase, UpdateKnowledgeUseCase,
};
use domain::{Category, Knowledge};

use crate::context;

#[derive(Debug, Args)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    command: KnowledgeSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum KnowledgeSubcommand {
    /// Add a knowledge item
    Add {
        /// Short title shown in lists and prompts
        title: String,
        /// Guideline text injected into review prompts
        content: String,
        #[arg(long, value_parser = parse_category)]
        category: Category,
        /// 1 (lowest) to 5 (highest)
        #[arg(long, default_value_t = 3)]
        priority: u8,
    },
    /// List active knowledge items
    List {
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Update fields of an existing item
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        #[arg(long)]
        priority: Option<u8>,
    },
    /// Soft-delete an item
    Delete { id: Uuid },
    /// Show active item counts per category
    Stats,
    /// Embed items that were saved without a vector
    Backfill {
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

impl KnowledgeCommand {
    pub async fn execute(self, owner: &str) -> Result<()> {
        let store = context::open_knowledge_store()?;

        match self.command {
            KnowledgeSubcommand::Add {
                title,
                content,
                category,
                priority,
            } => {
                let use_case = CreateKnowledgeUseCase::new(store, context::embedding_provider()?);
                let knowledge = use_case
                    .execute(CreateKnowledgeRequest {
                        owner_id: owner.to_string(),
                        title,
                        content,
                        category,
                        priority,
                    })
                    .await?;
                println!("{} {}", style("Added").green().bold(), knowledge.id());
                if !knowledge.has_embedding() {
                    println!(
                        "{}",
                        style("Embedding failed; run `kaizen knowledge backfill` later").yellow()
                    );
                }
            }
            KnowledgeSubcommand::List { category } => {
                let use_case = ListKnowledgeUseCase::new(store);
                let items = use_case
                    .execute(ListKnowledgeRequest {
                        owner_id: owner.to_string(),
                        category,
                    })
                    .await?;
                if items.is_empty() {
                    println!("No knowledge items yet");
                    return Ok(());
                }
                for item in &items {
                    print_item(item);
                }
                println!("{} item(s)", items.len());
            }
            KnowledgeSubcommand::Update {
                id,
                title,
                content,
                category,
                priority,
            } => {
                let use_case = UpdateKnowledgeUseCase::new(store, context::embedding_provider()?);
                let knowledge = use_case
                    .execute(UpdateKnowledgeRequest {
                        owner_id: owner.to_string(),
                        knowledge_id: id,
                        title,
                        content,
                        category,
                        priority,
                    })
                    .await?;
                println!("{} {}", style("Updated").green().bold(), knowledge.id());
            }
            KnowledgeSubcommand::Delete { id } => {
                let use_case = DeleteKnowledgeUseCase::new(store);
                use_case.execute(owner, id).await?;
                println!("{} {}", style("Deleted").green().bold(), id);
            }
            KnowledgeSubcommand::Stats => {
                let use_case = KnowledgeStatsUseCase::new(store);
                let stats = use_case.execute(owner).await?;
                println!("{}", style("Knowledge base").cyan().bold());
                println!("  Total active: {}", stats.total);
                for entry in &stats.by_category {
                    println!("  {:<16} {}", entry.category.as_str(), entry.count);
                }
            }
            KnowledgeSubcommand::Backfill { batch_size } => {
                let use_case =
                    BackfillEmbeddingsUseCase::new(store, context::embedding_provider()?);
                let outcome = use_case.execute(batch_size).await?;
                println!(
                    "Backfill: {} candidate(s), {} embedded",
                    outcome.candidates, outcome.embedded
                );
                for failure in &outcome.failures {
                    println!("{} {}", style("failed:").red(), failure);
                }
            }
        }
        Ok(())
    }
}

fn print_item(item: &Knowledge) {
    println!(
        "{} [{}] prio {} used {}x{}",
        style(item.id()).dim(),
        item.category().as_str(),
        item.priority(),
        item.usage_count(),
        if item.has_embedding() {
            ""
        } else {
            "  (no embedding)"
        }
    );
    println!("  {}", style(item.title()).bold());
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse_str(s).map_err(|_| {
        let keys: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        format!("unknown category (expected one of: {})", keys.join(", "))
    })
}
