//! TF-IDF vectorization of the corpus.
//!
//! ```text
//! tfidf(t, d) = count(t, d) × idf(t)
//! idf(t)      = ln((1 + N) / (1 + df(t))) + 1
//! ```
//!
//! Rows are L2-normalized, so the dot product of two rows is their cosine
//! similarity.

use std::collections::{BTreeMap, HashMap};

use crate::config::VectorizerConfig;
use crate::error::VectorizationError;
use crate::stopwords::StopWords;

/// Sparse row: `(column, weight)` pairs sorted by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            if a_idx == b_idx {
                sum += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }
}

/// One row per document over a shared vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfMatrix {
    rows: Vec<SparseVector>,
    vocabulary: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Terms in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.column_of(term).map(|col| self.idf[col])
    }
}

#[derive(Debug, Clone)]
pub struct TextVectorizer {
    config: VectorizerConfig,
}

impl TextVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.config.stop_words
    }

    /// The same configuration without any stop-word filtering.
    pub fn unfiltered(&self) -> Self {
        Self::new(self.config.clone().with_stop_words(StopWords::None))
    }

    /// Build the vocabulary from `documents` and vectorize each of them.
    ///
    /// An empty vocabulary is only an error when stop-word filtering is what
    /// emptied it; without stop words the rows are simply all-zero.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<TfidfMatrix, VectorizationError> {
        if documents.is_empty() {
            return Err(VectorizationError::NoDocuments);
        }

        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in self.analyze(doc.as_ref()) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() && self.config.stop_words.is_active() {
            return Err(VectorizationError::EmptyVocabulary {
                documents: documents.len(),
            });
        }

        let n_docs = documents.len() as f64;
        let mut columns: HashMap<&str, usize> = HashMap::with_capacity(doc_freq.len());
        let mut vocabulary = Vec::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (col, (term, df)) in doc_freq.iter().enumerate() {
            columns.insert(*term, col);
            vocabulary.push(term.to_string());
            idf.push(((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let rows = counts
            .iter()
            .map(|doc| {
                let entries = doc
                    .iter()
                    .map(|(term, &count)| {
                        let col = columns[term.as_str()];
                        (col, count as f64 * idf[col])
                    })
                    .collect();
                let mut row = SparseVector::new(entries);
                row.normalize();
                row
            })
            .collect();

        Ok(TfidfMatrix {
            rows,
            vocabulary,
            idf,
        })
    }

    /// Tokenize, drop stop words, then emit every configured n-gram.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.config.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = tokenize(&text)
            .filter(|t| !self.config.stop_words.is_stop_word(t))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }
}

/// Word tokens of two or more characters.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
}
