//! Minimal RSS 2.0 / RSS 1.0 / Atom reader.
//!
//! Only the fields the corpus needs are extracted: title, link, a summary and
//! the publication date. Channel-level metadata is ignored.

use chrono::{DateTime, Utc};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sr_core::{Article, Error, Result};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    /// Convert into a normalized article attributed to `source`.
    pub fn into_article(self, source: &str) -> Option<Article> {
        let summary = self.summary.or(self.content);
        Article::from_entry(
            source,
            self.title.as_deref(),
            self.link.as_deref(),
            summary.as_deref(),
        )
        .map(|article| article.with_published_at(self.published))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Summary,
    Content,
    Published,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"description" | b"summary" => Some(Field::Summary),
            b"content" | b"content:encoded" => Some(Field::Content),
            b"pubDate" | b"published" | b"updated" | b"dc:date" => Some(Field::Published),
            _ => None,
        }
    }
}

fn is_entry(name: &[u8]) -> bool {
    name == b"item" || name == b"entry"
}

/// Atom links carry the URL in `href`; only `alternate` links point at the article.
fn atom_href(element: &BytesStart<'_>) -> Option<String> {
    let rel = element
        .try_get_attribute("rel")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value_with(resolve_html5_entity).ok().map(|v| v.into_owned()));
    if rel.as_deref().is_some_and(|rel| rel != "alternate") {
        return None;
    }
    element
        .try_get_attribute("href")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value_with(resolve_html5_entity).ok().map(|v| v.trim().to_string()))
        .filter(|href| !href.is_empty())
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn set_once(slot: &mut Option<String>, value: &str) {
    let value = value.trim();
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

impl FeedEntry {
    fn assign(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => set_once(&mut self.title, value),
            Field::Link => set_once(&mut self.link, value),
            Field::Summary => set_once(&mut self.summary, value),
            Field::Content => set_once(&mut self.content, value),
            Field::Published => {
                if self.published.is_none() {
                    self.published = parse_date(value);
                }
            }
        }
    }
}

/// Extract every `<item>` / `<entry>` of a feed document.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<(Field, Vec<u8>)> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Feed(format!(
                "Malformed feed at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(element) => {
                let name = element.name().as_ref().to_vec();
                if is_entry(&name) {
                    current = Some(FeedEntry::default());
                    field = None;
                } else if let Some(entry) = current.as_mut() {
                    if field.is_none() {
                        if let Some(kind) = Field::from_name(&name) {
                            if kind == Field::Link {
                                if let Some(href) = atom_href(&element) {
                                    set_once(&mut entry.link, &href);
                                }
                            }
                            field = Some((kind, name));
                            text.clear();
                        }
                    }
                }
            }
            Event::Empty(element) => {
                if let Some(entry) = current.as_mut() {
                    if element.name().as_ref() == b"link" {
                        if let Some(href) = atom_href(&element) {
                            set_once(&mut entry.link, &href);
                        }
                    }
                }
            }
            Event::Text(value) => {
                if field.is_some() {
                    // Feeds routinely use HTML entities that XML does not define
                    match value.unescape_with(resolve_html5_entity) {
                        Ok(value) => text.push_str(&value),
                        Err(e) => {
                            debug!("Keeping raw text, unescape failed: {}", e);
                            text.push_str(&String::from_utf8_lossy(&value));
                        }
                    }
                }
            }
            Event::CData(value) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&value.into_inner()));
                }
            }
            Event::End(element) => {
                let name = element.name();
                if is_entry(name.as_ref()) {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                    field = None;
                } else if field
                    .as_ref()
                    .is_some_and(|(_, open)| open.as_slice() == name.as_ref())
                {
                    if let (Some((kind, _)), Some(entry)) = (field.take(), current.as_mut()) {
                        entry.assign(kind, &text);
                    }
                    text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
