//! Text cleanup applied to feed entries before they enter the corpus.

use scraper::Html;

/// Remove markup from `text`, decode entities and collapse whitespace.
pub fn strip_html(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return clean_text(text);
    }
    let fragment = Html::parse_fragment(text);
    let raw = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    clean_text(&raw)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
