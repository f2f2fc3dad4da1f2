//! Popular-review pages (`/film/{slug}/reviews/`).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::parser::{normalize_ws, parse, text_of};
use crate::records::Review;

static REVIEW_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.film-detail").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static BODY_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.body-text p").unwrap());
static RATING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.rating").unwrap());
static DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span._nobr").unwrap());
static LIKE_TARGET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.like-link-target[data-likeable-uid]").unwrap());

static PROFILE_HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/([\w-]+)/$").unwrap());

fn review(row: ElementRef<'_>) -> Review {
    let username = row
        .select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| PROFILE_HREF_RE.captures(href).map(|c| c[1].to_string()));

    let paragraphs: Vec<String> = row
        .select(&BODY_PARAGRAPH)
        .map(text_of)
        .filter(|p| !p.is_empty())
        .collect();
    let text = (!paragraphs.is_empty()).then(|| paragraphs.join("\n"));

    let non_empty = |s: String| (!s.is_empty()).then_some(s);

    Review {
        username,
        text,
        rating: row.select(&RATING).next().map(text_of).and_then(non_empty),
        date: row.select(&DATE).next().map(text_of).and_then(non_empty),
        review_id: row
            .select(&LIKE_TARGET)
            .find_map(|p| p.value().attr("data-likeable-uid"))
            .map(normalize_ws),
    }
}

pub fn reviews(doc: &Html) -> Vec<Review> {
    doc.select(&REVIEW_ROW).map(review).collect()
}

pub fn reviews_page(markup: &str) -> Vec<Review> {
    reviews(&parse(markup))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <ul class="film-popular-review">
      <li class="film-detail">
        <a class="avatar -a40" href="/karsten/"><img src="a.jpg" alt="Karsten"></a>
        <div class="film-detail-content">
          <div class="attribution-block -large">
            <p class="attribution">
              <a class="context" href="/karsten/film/the-substance/"> Review by <strong class="name">Karsten</strong></a>
              <span class="rating -green rated-8"> ★★★★ </span>
              <span class="_nobr">14 Sep 2024</span>
            </p>
          </div>
          <div class="body-text -prose collapsible-text">
            <p>demi moore said  hold my  syringe</p>
            <p>second paragraph</p>
          </div>
          <p class="like-link-target react-component -monotone" data-likeable-uid="viewing:612345"></p>
        </div>
      </li>
      <li class="film-detail">
        <div class="film-detail-content">
          <p class="attribution"><a class="context" href="/film/the-substance/">anonymous</a></p>
          <div class="body-text -prose collapsible-text"><p>no rating here</p></div>
        </div>
      </li>
    </ul>"#;

    #[test]
    fn full_review_row() {
        let rows = reviews_page(PAGE);
        assert_eq!(rows.len(), 2);
        let r = &rows[0];
        assert_eq!(r.username.as_deref(), Some("karsten"));
        assert_eq!(
            r.text.as_deref(),
            Some("demi moore said hold my syringe\nsecond paragraph")
        );
        assert_eq!(r.rating.as_deref(), Some("★★★★"));
        assert_eq!(r.date.as_deref(), Some("14 Sep 2024"));
        assert_eq!(r.review_id.as_deref(), Some("viewing:612345"));
    }

    #[test]
    fn sparse_review_row() {
        let rows = reviews_page(PAGE);
        let r = &rows[1];
        assert_eq!(r.username, None);
        assert_eq!(r.text.as_deref(), Some("no rating here"));
        assert_eq!(r.rating, None);
        assert_eq!(r.date, None);
        assert_eq!(r.review_id, None);
    }
}
