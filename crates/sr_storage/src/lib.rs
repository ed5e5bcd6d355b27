pub mod snapshot;
pub mod store;

pub use snapshot::CorpusSnapshot;
pub use store::ArticleStore;

pub mod prelude {
    pub use super::{ArticleStore, CorpusSnapshot};
}
