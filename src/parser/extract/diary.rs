//! Diary pages (`/{user}/films/diary/`).
//!
//! Each `find_*` function yields one aligned series: exactly one element per
//! diary row, with a placeholder where the row lacks the marker.

use std::sync::LazyLock;

use chrono::NaiveDate;
use itertools::izip;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::aggregator::FieldSet;
use crate::parser::parse;
use crate::records::DiaryEntry;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr.diary-entry-row").unwrap());
static DAY_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.td-day a[href]").unwrap());
static FILM_SLUG: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td.td-film-details [data-film-slug], td.td-film-details [data-item-slug]").unwrap()
});
static RATING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.td-rating span.rating").unwrap());
static LIKED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.td-like .icon-liked").unwrap());
static REWATCH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.td-rewatch").unwrap());
static REVIEW_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.td-review a[href]").unwrap());

static DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/diary/for/(\d{4})/(\d{2})/(\d{2})/").unwrap());
static RATED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brated-(\d+)\b").unwrap());

fn rows(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.select(&ROW)
}

fn attr_of(row: ElementRef<'_>, sel: &Selector, name: &str) -> Option<String> {
    row.select(sel)
        .find_map(|el| el.value().attr(name))
        .map(str::to_string)
}

pub fn find_dates(doc: &Html) -> Vec<Option<NaiveDate>> {
    rows(doc)
        .map(|row| {
            let href = attr_of(row, &DAY_LINK, "href")?;
            let caps = DAY_RE.captures(&href)?;
            NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
        })
        .collect()
}

pub fn find_film_slugs(doc: &Html) -> Vec<Option<String>> {
    rows(doc)
        .map(|row| {
            row.select(&FILM_SLUG).find_map(|el| {
                let v = el.value();
                v.attr("data-film-slug").or_else(|| v.attr("data-item-slug"))
            })
        })
        .map(|slug| slug.map(str::to_string))
        .collect()
}

/// Stars in half-star steps, from the `rated-<n>` class (n counts half stars).
pub fn find_ratings(doc: &Html) -> Vec<Option<f32>> {
    rows(doc)
        .map(|row| {
            row.select(&RATING).find_map(|el| {
                el.value()
                    .classes()
                    .find_map(|c| RATED_RE.captures(c))
                    .and_then(|caps| caps[1].parse::<u8>().ok())
                    .map(|halves| f32::from(halves) / 2.0)
            })
        })
        .collect()
}

pub fn find_likes(doc: &Html) -> Vec<bool> {
    rows(doc).map(|row| row.select(&LIKED).next().is_some()).collect()
}

/// A row counts as a rewatch unless its rewatch cell is switched off.
pub fn find_rewatches(doc: &Html) -> Vec<bool> {
    rows(doc)
        .map(|row| {
            row.select(&REWATCH)
                .next()
                .map_or(true, |cell| !cell.value().classes().any(|c| c == "icon-status-off"))
        })
        .collect()
}

pub fn find_reviews(doc: &Html) -> Vec<Option<String>> {
    rows(doc).map(|row| attr_of(row, &REVIEW_LINK, "href")).collect()
}

/// Diary fields stored column-wise, one aligned series per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiaryFields {
    pub dates: Vec<Option<NaiveDate>>,
    pub film_slugs: Vec<Option<String>>,
    pub ratings: Vec<Option<f32>>,
    pub likes: Vec<bool>,
    pub rewatches: Vec<bool>,
    pub reviews: Vec<Option<String>>,
}

impl DiaryFields {
    pub fn from_doc(doc: &Html) -> Self {
        Self {
            dates: find_dates(doc),
            film_slugs: find_film_slugs(doc),
            ratings: find_ratings(doc),
            likes: find_likes(doc),
            rewatches: find_rewatches(doc),
            reviews: find_reviews(doc),
        }
    }

    fn is_aligned(&self) -> bool {
        let n = self.dates.len();
        [
            self.film_slugs.len(),
            self.ratings.len(),
            self.likes.len(),
            self.rewatches.len(),
            self.reviews.len(),
        ]
        .iter()
        .all(|len| *len == n)
    }
}

impl FieldSet for DiaryFields {
    type Record = DiaryEntry;

    fn rows(&self) -> usize {
        self.dates.len()
    }

    fn append(&mut self, other: Self) {
        self.dates.extend(other.dates);
        self.film_slugs.extend(other.film_slugs);
        self.ratings.extend(other.ratings);
        self.likes.extend(other.likes);
        self.rewatches.extend(other.rewatches);
        self.reviews.extend(other.reviews);
    }

    fn into_records(self) -> Vec<DiaryEntry> {
        debug_assert!(self.is_aligned(), "diary series out of alignment");
        izip!(
            self.dates,
            self.film_slugs,
            self.ratings,
            self.likes,
            self.rewatches,
            self.reviews
        )
        .map(|(date, film_slug, rating, like, rewatch, review)| DiaryEntry {
            date,
            film_slug,
            rating,
            like,
            rewatch,
            review,
        })
        .collect()
    }
}

pub fn diary_page(markup: &str) -> DiaryFields {
    DiaryFields::from_doc(&parse(markup))
}

// ── Tests ──
