//! Film detail page (`/film/{slug}/`) and its single-page satellites.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::poster_slugs;
use crate::error::{Result, ScrapeError};
use crate::parser::{child_texts, fold_repeated_words, pair_alternating, parse, parse_count, text_of};
use crate::records::{CastMember, FilmStats, Release};

// Tried one at a time; the dedicated release-year links outrank any stray year link.
static YEAR_LINKS: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    ["div.releaseyear a", "span.releasedate a", "a[href*='/films/year/']"]
        .map(|s| Selector::parse(s).unwrap())
});
static DIRECTORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.directorlist a").unwrap());
static SYNOPSIS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.review.body-text.-prose.-hero").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static FILM_ID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.really-lazy-load[data-film-id]").unwrap());
static CAST_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.cast-list a.text-slug").unwrap());
static TAB_CREW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#tab-crew").unwrap());
static TAB_DETAILS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#tab-details").unwrap());
static TAB_RELEASES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#tab-releases").unwrap());
static RELEASE_DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h5.date").unwrap());
static RELEASE_COUNTRY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.name").unwrap());
static FOOTER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.text-link.text-footer").unwrap());
static TRAILER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p.trailer-link a.play, a.play.js-video-zoom").unwrap());
static GENRE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href*='/films/genre/']").unwrap());
static SUB_NAV_COUNT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.sub-nav a[title]").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/year/(\d{4})/").unwrap());
static MINS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+mins").unwrap());
static LEADING_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([\d,]+)").unwrap());

/// Release year from the year link. Mandatory: every film page carries one.
pub fn release_year(doc: &Html) -> Result<i32> {
    YEAR_LINKS
        .iter()
        .find_map(|sel| {
            doc.select(sel)
                .filter_map(|a| a.value().attr("href"))
                .find_map(|href| YEAR_RE.captures(href)?[1].parse::<i32>().ok())
        })
        .ok_or_else(|| ScrapeError::missing("release_year"))
}

pub fn directors(doc: &Html) -> Vec<String> {
    doc.select(&DIRECTORS)
        .map(text_of)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Synopsis paragraphs of the hero block; the tagline and heading are skipped.
pub fn synopsis(doc: &Html) -> String {
    let Some(hero) = doc.select(&SYNOPSIS).next() else {
        return String::new();
    };
    let paragraphs: Vec<String> = hero.select(&PARAGRAPH).map(text_of).filter(|p| !p.is_empty()).collect();
    if paragraphs.is_empty() {
        text_of(hero).replace("Synopsis", "").trim().to_string()
    } else {
        paragraphs.join(" ")
    }
}

/// Numeric film id carried on the poster placeholder. Mandatory for posters.
pub fn film_id(doc: &Html) -> Result<String> {
    doc.select(&FILM_ID)
        .filter_map(|el| el.value().attr("data-film-id"))
        .find(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::missing("film_id"))
}

/// `838140` → `8/3/8/1/4/0`.
pub fn poster_path_prefix(film_id: &str) -> String {
    film_id
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join("/")
}

pub fn poster_url_for(poster_base: &str, film_id: &str, slug: &str) -> String {
    format!(
        "{}/{}/{}-{}-0-1000-0-1500-crop.jpg",
        poster_base.trim_end_matches('/'),
        poster_path_prefix(film_id),
        film_id,
        slug
    )
}

pub fn poster_url(doc: &Html, poster_base: &str, slug: &str) -> Result<String> {
    let id = film_id(doc)?;
    Ok(poster_url_for(poster_base, &id, slug))
}

pub fn cast(doc: &Html) -> Vec<CastMember> {
    doc.select(&CAST_LINK)
        .filter_map(|a| {
            let actor = text_of(a);
            if actor.is_empty() {
                return None;
            }
            let character = a
                .value()
                .attr("title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            Some(CastMember { actor, character })
        })
        .collect()
}

/// Role → names from the crew tab. Repeated role words are folded.
pub fn crew(doc: &Html) -> BTreeMap<String, String> {
    tab_pairs(doc, &TAB_CREW, true)
}

/// Label → values from the details tab (studios, country, language…).
pub fn details(doc: &Html) -> BTreeMap<String, String> {
    tab_pairs(doc, &TAB_DETAILS, false)
}

fn tab_pairs(doc: &Html, tab: &Selector, fold: bool) -> BTreeMap<String, String> {
    let Some(panel) = doc.select(tab).next() else {
        return BTreeMap::new();
    };
    let items = child_texts(panel).into_iter().map(|t| {
        if fold {
            fold_repeated_words(&t)
        } else {
            t
        }
    });
    pair_alternating(items).into_iter().collect()
}

pub fn releases(doc: &Html) -> Vec<Release> {
    let Some(panel) = doc.select(&TAB_RELEASES).next() else {
        return Vec::new();
    };
    let dates = panel.select(&RELEASE_DATE).map(text_of);
    let countries = panel.select(&RELEASE_COUNTRY).map(text_of);
    dates
        .zip(countries)
        .map(|(date, country)| Release { date, country })
        .collect()
}

/// Running time in minutes from the page footer. Mandatory.
pub fn duration(doc: &Html) -> Result<u32> {
    doc.select(&FOOTER)
        .map(text_of)
        .find_map(|text| MINS_RE.captures(&text)?[1].parse::<u32>().ok())
        .ok_or_else(|| ScrapeError::missing("duration"))
}

pub fn trailer(doc: &Html) -> Option<String> {
    let href = doc.select(&TRAILER).find_map(|a| a.value().attr("href"))?;
    if let Some(rest) = href.strip_prefix("//") {
        Some(format!("https://{}", rest))
    } else {
        Some(href.to_string())
    }
}

// ── Satellite pages ──

/// `/film/{slug}/genres/`
pub fn genres_page(markup: &str) -> Vec<String> {
    let doc = parse(markup);
    doc.select(&GENRE_LINK)
        .map(text_of)
        .filter(|g| !g.is_empty())
        .collect()
}

/// `/film/{slug}/similar/`
pub fn similar_page(markup: &str) -> Vec<String> {
    poster_slugs(&parse(markup))
}

/// `/film/{slug}/members/`: members, fans, likes, reviews, lists counts in
/// sub-nav order. All five must be present.
pub fn stats_page(markup: &str) -> Result<FilmStats> {
    let doc = parse(markup);
    let counts: Vec<u64> = doc
        .select(&SUB_NAV_COUNT)
        .filter_map(|a| {
            let title = a.value().attr("title")?;
            parse_count(&LEADING_COUNT_RE.captures(title)?[1])
        })
        .collect();

    match counts.as_slice() {
        [members, fans, likes, reviews, lists, ..] => Ok(FilmStats {
            members: *members,
            fans: *fans,
            likes: *likes,
            reviews: *reviews,
            lists: *lists,
        }),
        _ => Err(ScrapeError::Extraction {
            field: "stats",
            reason: format!("expected 5 counts in sub-nav, found {}", counts.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Html {
        let html = std::fs::read_to_string("tests/fixtures/film_the_substance.html").unwrap();
        parse(&html)
    }

    #[test]
    fn substance_year_and_directors() {
        let doc = fixture();
        assert_eq!(release_year(&doc).unwrap(), 2024);
        assert_eq!(directors(&doc), vec!["Coralie Fargeat"]);
    }

    #[test]
    fn substance_synopsis() {
        let s = synopsis(&fixture());
        assert!(s.starts_with("A fading celebrity"));
        assert!(!s.contains("Synopsis"));
    }

    #[test]
    fn substance_poster() {
        let url = poster_url(&fixture(), "https://a.ltrbxd.com/resized/film-poster", "the-substance").unwrap();
        assert_eq!(
            url,
            "https://a.ltrbxd.com/resized/film-poster/8/3/8/1/4/0/838140-the-substance-0-1000-0-1500-crop.jpg"
        );
    }

    #[test]
    fn poster_prefix_splits_digits() {
        assert_eq!(poster_path_prefix("838140"), "8/3/8/1/4/0");
        assert_eq!(poster_path_prefix("7"), "7");
    }

    #[test]
    fn substance_cast() {
        let c = cast(&fixture());
        assert_eq!(c.len(), 3);
        assert_eq!(c[0].actor, "Demi Moore");
        assert_eq!(c[0].character.as_deref(), Some("Elisabeth Sparkle"));
        assert_eq!(c[2].actor, "Uncredited Extra");
        assert_eq!(c[2].character, None);
    }

    #[test]
    fn substance_crew_and_details() {
        let doc = fixture();
        let crew = crew(&doc);
        assert_eq!(crew.get("Director").map(String::as_str), Some("Coralie Fargeat"));
        assert_eq!(crew.get("Producers").map(String::as_str), Some("Coralie Fargeat Tim Bevan"));
        assert!(!crew.contains_key("Orphan"));
        let details = details(&doc);
        assert_eq!(details.get("Country").map(String::as_str), Some("France UK USA"));
    }

    #[test]
    fn substance_releases_duration_trailer() {
        let doc = fixture();
        let r = releases(&doc);
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].date, "19 May 2024");
        assert_eq!(r[0].country, "France");
        assert_eq!(duration(&doc).unwrap(), 141);
        assert_eq!(trailer(&doc).as_deref(), Some("https://www.youtube.com/embed/LNlrGhBpYjc"));
    }

    #[test]
    fn release_year_link_outranks_earlier_year_links() {
        let doc = parse(
            r#"<nav><a href="/films/year/1999/">Films of 1999</a></nav>
               <div class="releaseyear"><a href="/films/year/2024/">2024</a></div>"#,
        );
        assert_eq!(release_year(&doc).unwrap(), 2024);

        let doc = parse(r#"<p><a href="/films/year/1987/">1987</a></p>"#);
        assert_eq!(release_year(&doc).unwrap(), 1987);
    }

    #[test]
    fn missing_year_is_extraction_error() {
        let doc = parse("<html><body><h1>Untitled</h1></body></html>");
        assert!(matches!(
            release_year(&doc),
            Err(ScrapeError::Extraction { field: "release_year", .. })
        ));
        assert!(matches!(film_id(&doc), Err(ScrapeError::Extraction { field: "film_id", .. })));
        assert!(duration(&doc).is_err());
    }

    #[test]
    fn missing_optional_fields_degrade() {
        let doc = parse("<html><body></body></html>");
        assert!(directors(&doc).is_empty());
        assert_eq!(synopsis(&doc), "");
        assert!(cast(&doc).is_empty());
        assert!(crew(&doc).is_empty());
        assert!(releases(&doc).is_empty());
        assert_eq!(trailer(&doc), None);
    }

    #[test]
    fn genres_from_links() {
        let html = r#"<div id="tab-genres">
            <a href="/films/genre/horror/" class="text-slug">Horror</a>
            <a href="/films/genre/science-fiction/" class="text-slug">Science Fiction</a>
            <a href="/films/theme/body-horror/">Body horror</a></div>"#;
        assert_eq!(genres_page(html), vec!["Horror", "Science Fiction"]);
    }

    #[test]
    fn stats_from_sub_nav() {
        let html = r#"<ul class="sub-nav">
            <li><a href="/film/x/members/" title="1,234,567 people">Watched</a></li>
            <li><a href="/film/x/fans/" title="12,345 fans">Fans</a></li>
            <li><a href="/film/x/likes/" title="456,789 likes">Likes</a></li>
            <li><a href="/film/x/reviews/" title="98,765 reviews">Reviews</a></li>
            <li><a href="/film/x/lists/" title="54,321 lists">Lists</a></li></ul>"#;
        let s = stats_page(html).unwrap();
        assert_eq!(s.members, 1_234_567);
        assert_eq!(s.fans, 12_345);
        assert_eq!(s.lists, 54_321);
    }

    #[test]
    fn stats_incomplete_is_error() {
        let html = r#"<ul class="sub-nav"><li><a title="3 people">Watched</a></li></ul>"#;
        assert!(stats_page(html).is_err());
    }
}
