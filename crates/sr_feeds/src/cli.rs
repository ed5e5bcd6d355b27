use clap::{Args, Subcommand};
use sr_core::{Error, Result};

use crate::manager::FeedManager;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// List configured feeds
    List,
    /// Fetch feeds and print their articles
    Fetch {
        /// Feed name (or its first word, e.g. lemonde). Fetches every feed if omitted.
        #[arg(required = false)]
        feed: Option<String>,
    },
}

pub async fn handle_command(args: FeedArgs, manager: &FeedManager) -> Result<()> {
    match args.command {
        FeedCommands::List => {
            println!("Configured feeds:");
            for feed in manager.feeds() {
                println!("  {} - {}", feed.name, feed.url);
            }
        }
        FeedCommands::Fetch { feed: Some(name) } => {
            let feed = manager
                .find_feed(&name)
                .ok_or_else(|| Error::Config(format!("Feed not found: {}", name)))?;
            let articles = manager.fetch_feed(feed).await?;
            println!("Found {} articles in {}", articles.len(), feed.name);
            for article in articles {
                println!("🆕 [{}] {} - {}", article.id, article.title, article.link);
            }
        }
        FeedCommands::Fetch { feed: None } => {
            let articles = manager.fetch_all().await;
            println!("Found {} articles", articles.len());
            for article in articles {
                println!(
                    "🆕 [{}] {} ({}) - {}",
                    article.id, article.title, article.source, article.link
                );
            }
        }
    }
    Ok(())
}
