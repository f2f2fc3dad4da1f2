//! Profile, network and list pages of a member.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::parser::{parse, parse_count, text_of};
use crate::records::ProfileStats;

static STATISTIC: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".profile-statistic").unwrap());
static STAT_VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".value").unwrap());
static STAT_DEFINITION: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".definition").unwrap());
static FAVOURITE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#favourites [data-film-slug]").unwrap());
static PATRON: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.badge.-patron").unwrap());
static PRO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.badge.-pro").unwrap());
static BIO_PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".js-bio-content p").unwrap());
static PERSON_NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.name[href]").unwrap());
static LIST_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section.list-set section.list h2").unwrap());

static HANDLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/([A-Za-z0-9_-]+)/$").unwrap());

/// Header statistics, favourites and membership badges from `/{user}/`.
pub fn profile_stats(doc: &Html) -> ProfileStats {
    let mut stats = ProfileStats::default();

    for stat in doc.select(&STATISTIC) {
        let value = stat.select(&STAT_VALUE).next().map(text_of);
        let definition = stat.select(&STAT_DEFINITION).next().map(text_of);
        let (Some(value), Some(definition)) = (value, definition) else {
            continue;
        };
        let Some(count) = parse_count(&value) else {
            continue;
        };
        match definition.to_lowercase().as_str() {
            "films" => stats.films = count,
            "this year" => stats.this_year = count,
            "following" => stats.following = count,
            "followers" => stats.followers = count,
            "lists" => stats.lists = count,
            _ => {}
        }
    }

    stats.favorite_films = doc
        .select(&FAVOURITE)
        .filter_map(|el| el.value().attr("data-film-slug"))
        .map(str::to_string)
        .collect();
    stats.is_patron = doc.select(&PATRON).next().is_some();
    stats.is_pro = doc.select(&PRO).next().is_some();
    stats
}

/// Bio paragraphs, empty when the member wrote none.
pub fn bio(doc: &Html) -> Vec<String> {
    doc.select(&BIO_PARAGRAPH)
        .map(text_of)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Handles on one page of a following/followers listing.
pub fn network_page(markup: &str) -> Vec<String> {
    let doc = parse(markup);
    doc.select(&PERSON_NAME)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| HANDLE_RE.captures(href).map(|c| c[1].to_string()))
        .collect()
}

/// List titles on one page of a member's lists.
pub fn lists_page(markup: &str) -> Vec<String> {
    let doc = parse(markup);
    doc.select(&LIST_TITLE)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Html {
        parse(&std::fs::read_to_string("tests/fixtures/profile.html").unwrap())
    }

    #[test]
    fn header_statistics() {
        let stats = profile_stats(&profile());
        assert_eq!(stats.films, 1432);
        assert_eq!(stats.this_year, 118);
        assert_eq!(stats.following, 57);
        assert_eq!(stats.followers, 2301);
        assert_eq!(stats.lists, 12);
    }

    #[test]
    fn favourites_and_badges() {
        let stats = profile_stats(&profile());
        assert_eq!(
            stats.favorite_films,
            vec!["paris-texas", "in-the-mood-for-love", "the-thing", "perfect-days-2023"]
        );
        assert!(stats.is_patron);
        assert!(!stats.is_pro);
    }

    #[test]
    fn missing_statistics_default_to_zero() {
        let doc = parse(
            r#"<div class="profile-stats">
                 <h4 class="profile-statistic statistic"><a href="/x/films/"><span class="value">3</span><span class="definition">Films</span></a></h4>
                 <h4 class="profile-statistic statistic"><span class="value">9</span><span class="definition">Tags</span></h4>
               </div>"#,
        );
        let stats = profile_stats(&doc);
        assert_eq!(stats.films, 3);
        assert_eq!(stats.followers, 0);
        assert_eq!(stats.lists, 0);
        assert!(stats.favorite_films.is_empty());
        assert!(!stats.is_patron);
    }

    #[test]
    fn bio_paragraphs() {
        assert_eq!(
            bio(&profile()),
            vec!["Watching everything, slowly.", "Mostly horror in October."]
        );
        assert!(bio(&parse("<div class='profile-info'></div>")).is_empty());
    }

    #[test]
    fn network_handles() {
        let markup = r#"<table class="person-table"><tbody>
            <tr><td class="table-person"><div class="person-summary">
              <a class="avatar -a40" href="/davidehrlich/"><img alt="David Ehrlich"></a>
              <h3 class="title-3"><a href="/davidehrlich/" class="name">David Ehrlich</a></h3>
            </div></td></tr>
            <tr><td class="table-person"><div class="person-summary">
              <h3 class="title-3"><a href="/k_ryo-99/" class="name">Ryo</a></h3>
            </div></td></tr>
            <tr><td class="table-person"><div class="person-summary">
              <h3 class="title-3"><a href="/someone/films/" class="name">Not a profile link</a></h3>
            </div></td></tr>
          </tbody></table>"#;
        assert_eq!(network_page(markup), vec!["davidehrlich", "k_ryo-99"]);
    }

    #[test]
    fn list_titles() {
        let markup = r#"<section class="list-set">
            <section class="list -overlapped -summary" data-film-list-id="1">
              <a href="/someuser/list/best-of-2024/" class="list-link"></a>
              <div class="film-list-summary"><h2 class="title-2 title prettify"><a href="/someuser/list/best-of-2024/">Best of 2024</a></h2></div>
            </section>
            <section class="list -overlapped -summary" data-film-list-id="2">
              <div class="film-list-summary"><h2 class="title-2 title prettify"><a href="/someuser/list/comfort/">Comfort   watches</a></h2></div>
            </section>
          </section>"#;
        assert_eq!(lists_page(markup), vec!["Best of 2024", "Comfort watches"]);
    }
}
