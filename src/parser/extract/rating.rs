//! `/csi/film/{slug}/rating-histogram/` fragment.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::parser::{parse, parse_count};
use crate::records::RatingHistogram;

static BARS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section.ratings-histogram-chart ul li a[title]").unwrap());

// "6,234 ★★★ ratings (18%)"
static BAR_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d,]+)\s(\S+)\sratings\s\((\d+%)\)").unwrap());

/// Bucket counts read from the bars' tooltips. Bars without votes carry no
/// link and stay at zero.
pub fn histogram(doc: &Html) -> RatingHistogram {
    let mut hist = RatingHistogram::default();
    for bar in doc.select(&BARS) {
        let Some(title) = bar.value().attr("title") else {
            continue;
        };
        let Some(caps) = BAR_TITLE_RE.captures(title) else {
            continue;
        };
        if let Some(count) = parse_count(&caps[1]) {
            hist.set(&caps[2], count);
        }
    }
    hist
}

pub fn histogram_page(markup: &str) -> RatingHistogram {
    histogram(&parse(markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r#"
    <section class="section ratings-histogram-chart">
      <h2 class="section-heading"><a href="/film/the-substance/ratings/">Ratings</a></h2>
      <span class="average-rating"><a class="tooltip display-rating" href="/film/the-substance/ratings/">3.8</a></span>
      <div class="rating-histogram clear rating-histogram-exploded">
        <span class="rating-green rating-green-tiny rating-1"><span class="rating rated-2">★</span></span>
        <ul>
          <li class="rating-histogram-bar" style="width: 15px; left: 0px">
            <a href="/film/the-substance/ratings/rated/.5/" class="ir tooltip" title="12 half-★ ratings (0%)">12&nbsp;half-★ ratings (0%)<i style="height: 1px;"></i></a>
          </li>
          <li class="rating-histogram-bar" style="width: 15px; left: 16px">
            <a href="/film/the-substance/ratings/rated/1/" class="ir tooltip" title="55 ★ ratings (0%)">55&nbsp;★ ratings (0%)<i></i></a>
          </li>
          <li class="rating-histogram-bar" style="width: 15px; left: 32px"><i style="height: 1px;"></i></li>
          <li class="rating-histogram-bar" style="width: 15px; left: 48px">
            <a href="/film/the-substance/ratings/rated/3/" class="ir tooltip" title="6,234 ★★★ ratings (18%)">6,234&nbsp;★★★ ratings (18%)<i></i></a>
          </li>
          <li class="rating-histogram-bar" style="width: 15px; left: 64px">
            <a href="/film/the-substance/ratings/rated/5/" class="ir tooltip" title="1,023 ★★★★★ ratings (3%)">1,023&nbsp;★★★★★ ratings (3%)<i></i></a>
          </li>
        </ul>
      </div>
    </section>"#;

    #[test]
    fn bars_fill_named_buckets() {
        let h = histogram_page(FRAGMENT);
        assert_eq!(h.get("half-★"), Some(12));
        assert_eq!(h.get("★"), Some(55));
        assert_eq!(h.get("★½"), Some(0));
        assert_eq!(h.get("★★★"), Some(6234));
        assert_eq!(h.get("★★★★★"), Some(1023));
        assert_eq!(h.total(), 12 + 55 + 6234 + 1023);
    }

    #[test]
    fn missing_buckets_keep_positions() {
        // The empty ★½ bar must not shift later buckets down.
        let h = histogram_page(FRAGMENT);
        let expected = (12 + 2 * 55 + 6 * 6234 + 10 * 1023) as f64 / (12 + 55 + 6234 + 1023) as f64;
        assert_eq!(h.average().unwrap(), (expected * 1000.0).round() / 1000.0);
    }

    #[test]
    fn no_ratings_yet() {
        let h = histogram_page(r#"<section class="section ratings-histogram-chart"><p>Not enough ratings</p></section>"#);
        assert_eq!(h.total(), 0);
        assert!(h.average().is_err());
    }
}
