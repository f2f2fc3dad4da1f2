pub mod diary;
pub mod film;
pub mod rating;
pub mod reviews;
pub mod user;

use std::sync::LazyLock;

use scraper::{Html, Selector};

static POSTER_SLUG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.poster-list [data-film-slug], ul.poster-list [data-item-slug]").unwrap());

/// Film slugs of every poster in the page's poster grid, in grid order.
pub fn poster_slugs(doc: &Html) -> Vec<String> {
    doc.select(&POSTER_SLUG)
        .filter_map(|el| {
            let v = el.value();
            v.attr("data-film-slug").or_else(|| v.attr("data-item-slug"))
        })
        .map(str::to_string)
        .collect()
}

/// Page-level entry point for watched-films, watchlist and similar-films pages.
pub fn poster_slugs_page(markup: &str) -> Vec<String> {
    poster_slugs(&super::parse(markup))
}

// ── Tests ──
