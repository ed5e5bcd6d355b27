use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sr_core::{ArticleId, ArticleSource, Error, Result};
use sr_engine::{EngineConfig, RecommendationEngine, StopWords};
use sr_feeds::{default_feeds, handle_command, load_feeds, FeedArgs, FeedManager};
use sr_storage::ArticleStore;
use sr_web::AppState;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serendipitous news recommendations", long_about = None)]
pub struct Cli {
    /// JSON file with the feeds to ingest. Uses the built-in outlets if omitted.
    #[arg(long, env = "SR_FEEDS")]
    feeds: Option<PathBuf>,
    /// Stop words: french, english, none, or a path to a newline-delimited list
    #[arg(long, default_value = "french", env = "SR_STOP_WORDS")]
    stop_words: String,
    /// Minimum corpus size before a refresh is skipped
    #[arg(long, default_value_t = 5)]
    ready_threshold: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000", env = "SR_ADDR")]
        addr: String,
        /// Refresh the corpus periodically (e.g. 30m, 1h, 1h 15m 30s)
        #[arg(long, value_parser = humantime::parse_duration)]
        refresh_interval: Option<Duration>,
    },
    /// Print a random selection of articles to start from
    Sample {
        #[arg(short, default_value_t = 5)]
        n: usize,
    },
    /// Recommend articles related to the given one, from other outlets
    Recommend {
        /// Article id as printed by `sample`
        id: String,
        #[arg(short, default_value_t = 3)]
        n: usize,
    },
    Feeds(FeedArgs),
}

fn build_feeds(cli: &Cli) -> Result<FeedManager> {
    let feeds = match &cli.feeds {
        Some(path) => load_feeds(path)?,
        None => default_feeds(),
    };
    info!("📡 {} feeds configured", feeds.len());
    FeedManager::new(feeds)
}

fn build_engine(cli: &Cli) -> Arc<RecommendationEngine> {
    let config = EngineConfig {
        ready_threshold: cli.ready_threshold,
        ..EngineConfig::default()
    }
    .with_stop_words(StopWords::resolve(&cli.stop_words));
    Arc::new(RecommendationEngine::new(Arc::new(ArticleStore::new()), config))
}

async fn load_corpus(engine: &RecommendationEngine, source: &dyn ArticleSource) -> Result<()> {
    engine.ensure_ready(source).await;
    if engine.store().is_empty() {
        return Err(Error::EmptyCorpus);
    }
    Ok(())
}

fn spawn_refresh_loop(engine: Arc<RecommendationEngine>, source: Arc<dyn ArticleSource>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately and the corpus was just loaded
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("⏰ Scheduled refresh");
            engine.refresh(source.as_ref()).await;
        }
    });
}

async fn run(cli: Cli) -> Result<()> {
    let feeds = build_feeds(&cli)?;

    if let Commands::Feeds(args) = &cli.command {
        return handle_command(args.clone(), &feeds).await;
    }

    let engine = build_engine(&cli);
    let source: Arc<dyn ArticleSource> = Arc::new(feeds);

    match cli.command {
        Commands::Serve { addr, refresh_interval } => {
            engine.refresh(source.as_ref()).await;
            if let Some(every) = refresh_interval {
                if every.is_zero() {
                    return Err(Error::Config("Refresh interval must be positive".to_string()));
                }
                info!("Refreshing every {}", humantime::format_duration(every));
                spawn_refresh_loop(engine.clone(), source.clone(), every);
            }
            sr_web::serve(AppState::new(engine, source), &addr).await
        }
        Commands::Sample { n } => {
            load_corpus(&engine, source.as_ref()).await?;
            for article in engine.get_initial_sample(n)? {
                println!("[{}] {} ({})", article.id, article.title, article.source);
            }
            Ok(())
        }
        Commands::Recommend { id, n } => {
            let id: ArticleId = id.parse()?;
            load_corpus(&engine, source.as_ref()).await?;
            let result = engine.get_recommendations(id, n)?;
            println!("📰 {} ({})", result.reference.title, result.reference.source);
            for item in result.items {
                println!(
                    "  {:.3} [{:?}] {} ({}) - {}",
                    item.score, item.pick, item.article.title, item.article.source, item.article.link
                );
            }
            Ok(())
        }
        Commands::Feeds(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    sr_feeds::init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn refresh_interval(args: &[&str]) -> std::result::Result<Option<Duration>, clap::Error> {
        let cli = Cli::try_parse_from(["sr", "serve"].into_iter().chain(args.iter().copied()))?;
        match cli.command {
            Commands::Serve { refresh_interval, .. } => Ok(refresh_interval),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_refresh_interval() {
        let secs = |s: &str| refresh_interval(&["--refresh-interval", s]).unwrap().map(|d| d.as_secs());
        assert_eq!(secs("1h"), Some(3600));
        assert_eq!(secs("30m"), Some(1800));
        assert_eq!(secs("1h 15m 30s"), Some(4530));
        assert_eq!(secs("1d"), Some(86400));
        assert_eq!(refresh_interval(&[]).unwrap(), None);
        assert!(refresh_interval(&["--refresh-interval", "1x"]).is_err());
        assert!(refresh_interval(&["--refresh-interval", "h"]).is_err());
        assert!(refresh_interval(&["--refresh-interval", ""]).is_err());
    }

    #[test]
    fn test_refresh_interval_overflow() {
        // Must be rejected as a usage error rather than wrapping or panicking
        let result = std::panic::catch_unwind(|| refresh_interval(&["--refresh-interval", "999999999999999d"]));
        assert!(matches!(result, Ok(Err(_))));
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::try_parse_from(["sr", "--stop-words", "none", "recommend", "00000000000000ff", "-n", "4"])
            .unwrap();
        assert_eq!(cli.stop_words, "none");
        match cli.command {
            Commands::Recommend { id, n } => {
                assert_eq!(id, "00000000000000ff");
                assert_eq!(n, 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_build_engine_from_flags() {
        let cli = Cli::try_parse_from(["sr", "--ready-threshold", "2", "sample"]).unwrap();
        let engine = build_engine(&cli);
        assert_eq!(engine.config().ready_threshold, 2);
        assert!(engine.config().vectorizer.stop_words.is_active());
    }
}
