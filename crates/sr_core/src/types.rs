use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::normalize::strip_html;
use crate::Error;

pub const UNTITLED: &str = "Untitled";
pub const NO_SUMMARY: &str = "No summary available";

/// Stable article identifier, the leading 64 bits of SHA-256 over the
/// trimmed link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(u64);

impl ArticleId {
    pub fn from_link(link: &str) -> Self {
        let digest = Sha256::digest(link.trim().as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(bytes))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.len() > 16 {
            return Err(Error::InvalidId(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| Error::InvalidId(s.to_string()))
    }
}

impl TryFrom<String> for ArticleId {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArticleId> for String {
    fn from(id: ArticleId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Deduplication key. Falls back to the title when the entry had no link.
    pub link: String,
    pub source: String,
    pub summary: String,
    /// Title and summary with markup removed, the text that gets vectorized.
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Build a normalized article from a raw feed entry.
    ///
    /// Returns `None` when the entry has neither a link nor a title, since
    /// nothing could identify it.
    pub fn from_entry(
        source: &str,
        title: Option<&str>,
        link: Option<&str>,
        summary: Option<&str>,
    ) -> Option<Self> {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let link = link
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .or(title)?;

        let raw_title = title.unwrap_or_default();
        let raw_summary = summary.unwrap_or_default();
        let full_text = strip_html(&format!("{} {}", raw_title, raw_summary));

        Some(Self {
            id: ArticleId::from_link(link),
            title: title
                .map(strip_html)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            link: link.to_string(),
            source: source.to_string(),
            summary: summary
                .map(strip_html)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NO_SUMMARY.to_string()),
            full_text,
            published_at: None,
        })
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn dedup_key(&self) -> &str {
        &self.link
    }
}
