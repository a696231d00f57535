use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;

use commands::{FeedbackCommand, HistoryCommand, KnowledgeCommand, ReviewCommand, ShowCommand};

#[derive(Parser)]
#[command(name = "kaizen")]
#[command(about = "AI code review backed by your own knowledge base")]
#[command(version)]
struct Cli {
    /// Owner namespace for knowledge and reviews
    #[arg(long, env = "KAIZEN_OWNER", default_value = "local", global = true)]
    owner: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a source file against the knowledge base
    Review(ReviewCommand),
    /// Manage knowledge items
    Knowledge(KnowledgeCommand),
    /// List past reviews
    History(HistoryCommand),
    /// Show one review in full
    Show(ShowCommand),
    /// Rate a past review
    Feedback(FeedbackCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    common::init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Review(cmd) => cmd.execute(&cli.owner).await,
        Commands::Knowledge(cmd) => cmd.execute(&cli.owner).await,
        Commands::History(cmd) => cmd.execute(&cli.owner).await,
        Commands::Show(cmd) => cmd.execute(&cli.owner).await,
        Commands::Feedback(cmd) => cmd.execute(&cli.owner).await,
    }
}
