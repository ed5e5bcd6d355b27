pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

pub use error::Error;
pub use normalize::strip_html;
pub use source::ArticleSource;
pub use types::{Article, ArticleId};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::{Article, ArticleId, ArticleSource, Error, Result};
}
