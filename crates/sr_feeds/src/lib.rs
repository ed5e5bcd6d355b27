pub mod cli;
pub mod config;
pub mod logging;
pub mod manager;
pub mod parser;

pub use cli::{handle_command, FeedArgs, FeedCommands};
pub use config::{default_feeds, load_feeds, FeedConfig};
pub use logging::{init_logging, Logger};
pub use manager::FeedManager;
pub use parser::{parse_feed, FeedEntry};

pub mod prelude {
    pub use super::{FeedConfig, FeedManager};
    pub use sr_core::{Article, ArticleSource, Error, Result};
}
