//! Stop-word resources for the vectorizer.
//!
//! A list is resolved once, when the engine is configured. If a list cannot
//! be loaded the failure is logged and the engine runs unfiltered.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

const FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "et", "eux", "il",
    "ils", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon",
    "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa", "se",
    "ses", "son", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre", "vous",
    "c", "d", "j", "l", "à", "m", "n", "s", "t", "y", "été", "étée", "étées", "étés", "étant",
    "étante", "étants", "étantes", "suis", "es", "est", "sommes", "êtes", "sont", "serai",
    "seras", "sera", "serons", "serez", "seront", "serais", "serait", "serions", "seriez",
    "seraient", "étais", "était", "étions", "étiez", "étaient", "fus", "fut", "fûmes", "fûtes",
    "furent", "sois", "soit", "soyons", "soyez", "soient", "fusse", "fusses", "fût", "fussions",
    "fussiez", "fussent", "ayant", "ayante", "ayantes", "ayants", "eu", "eue", "eues", "eus",
    "ai", "as", "avons", "avez", "ont", "aurai", "auras", "aura", "aurons", "aurez", "auront",
    "aurais", "aurait", "aurions", "auriez", "auraient", "avais", "avait", "avions", "aviez",
    "avaient", "eut", "eûmes", "eûtes", "eurent", "aie", "aies", "ait", "ayons", "ayez", "aient",
    "eusse", "eusses", "eût", "eussions", "eussiez", "eussent",
];

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now",
];

/// A named set of lowercase stop words.
#[derive(Clone, PartialEq, Eq)]
pub struct StopWordList {
    language: String,
    words: HashSet<String>,
}

impl StopWordList {
    pub fn new<I, S>(language: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            language: language.into(),
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }
}

impl fmt::Debug for StopWordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopWordList")
            .field("language", &self.language)
            .field("words", &self.words.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopWords {
    Loaded(StopWordList),
    None,
}

impl StopWords {
    pub fn french() -> Self {
        Self::Loaded(StopWordList::new("french", FRENCH))
    }

    pub fn english() -> Self {
        Self::Loaded(StopWordList::new("english", ENGLISH))
    }

    /// Load a newline-delimited list. Lines starting with `#` are ignored.
    ///
    /// Falls back to [`StopWords::None`] when the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let words = contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'));
                let language = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "custom".to_string());
                let list = StopWordList::new(language, words);
                info!("🛑 Loaded {} stop words from {}", list.len(), path.display());
                Self::Loaded(list)
            }
            Err(e) => {
                warn!(
                    "⚠️ Stop words unavailable ({}): {}, vectorizing without stop-word filtering",
                    path.display(),
                    e
                );
                Self::None
            }
        }
    }

    /// Resolve a CLI-style name: `french`, `english`, `none`, or a file path.
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "french" | "fr" => Self::french(),
            "english" | "en" => Self::english(),
            "none" | "" => Self::None,
            _ => Self::from_file(name.trim()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Loaded(list) if !list.is_empty())
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        match self {
            Self::Loaded(list) => list.contains(token),
            Self::None => false,
        }
    }
}

impl fmt::Display for StopWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(list) => write!(f, "{} ({} words)", list.language(), list.len()),
            Self::None => write!(f, "none"),
        }
    }
}
