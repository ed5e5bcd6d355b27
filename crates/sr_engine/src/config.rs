use crate::stopwords::StopWords;

#[derive(Debug, Clone)]
pub struct VectorizerConfig {
    /// Inclusive range of n-gram lengths
    pub ngram_range: (usize, usize),
    pub stop_words: StopWords,
    pub lowercase: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            stop_words: StopWords::french(),
            lowercase: true,
        }
    }
}

impl VectorizerConfig {
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub vectorizer: VectorizerConfig,
    /// Articles offered when the user has not picked anything yet
    pub sample_size: usize,
    /// Recommendations returned per request
    pub top_n: usize,
    /// Minimum corpus size before the store counts as ready
    pub ready_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            sample_size: 5,
            top_n: 3,
            ready_threshold: 5,
        }
    }
}

impl EngineConfig {
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.vectorizer.stop_words = stop_words;
        self
    }
}
