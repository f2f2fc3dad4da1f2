//! Shared HTML helpers. Field extractors live in `extract`.

pub mod extract;

use scraper::{ElementRef, Html};

pub fn parse(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Text content of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Collapse runs of whitespace into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold immediately repeated words ("Director Director" → "Director"), case-insensitively.
pub fn fold_repeated_words(s: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for word in s.split_whitespace() {
        if out.last().is_some_and(|prev| prev.eq_ignore_ascii_case(word)) {
            continue;
        }
        out.push(word);
    }
    out.join(" ")
}

/// Parse "1,234" style counts.
pub fn parse_count(s: &str) -> Option<u64> {
    s.trim().replace(',', "").parse().ok()
}

/// Texts of the direct children of `el`, one per child node, empties dropped.
///
/// Tab panels on film pages are laid out as a flat label, value, label, value… run.
pub fn child_texts(el: ElementRef<'_>) -> Vec<String> {
    el.children()
        .filter_map(|node| {
            if let Some(child) = ElementRef::wrap(node) {
                Some(child.text().collect::<Vec<_>>().join(" "))
            } else {
                node.value().as_text().map(|t| String::from(&**t))
            }
        })
        .map(|t| normalize_ws(&t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Pair a flat alternating run into (label, value) entries.
/// A trailing element without a partner is dropped.
pub fn pair_alternating<I>(items: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut iter = items.into_iter();
    while let (Some(label), Some(value)) = (iter.next(), iter.next()) {
        out.push((label, value));
    }
    out
}
