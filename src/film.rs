//! Stateful film assembler: holds a slug, its detail page, and whatever has
//! been scraped so far.

use std::collections::BTreeMap;

use scraper::Html;
use tracing::info;

use crate::client::Scraper;
use crate::error::{Result, ScrapeError};
use crate::parser::extract::film;
use crate::parser::parse;
use crate::records::{CastMember, FilmRecord, FilmStats, RatingHistogram, Release, Review};

/// Which fields `get_film_data` fills. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmFields {
    pub release_year: bool,
    pub directors: bool,
    pub synopsis: bool,
    pub rating: bool,
    pub poster: bool,
    pub genres: bool,
}

impl Default for FilmFields {
    fn default() -> Self {
        Self {
            release_year: true,
            directors: true,
            synopsis: true,
            rating: true,
            poster: true,
            genres: true,
        }
    }
}

impl FilmFields {
    pub fn none() -> Self {
        Self {
            release_year: false,
            directors: false,
            synopsis: false,
            rating: false,
            poster: false,
            genres: false,
        }
    }
}

pub struct Film {
    scraper: Scraper,
    page: Option<String>,
    record: FilmRecord,
}

impl Film {
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper,
            page: None,
            record: FilmRecord::default(),
        }
    }

    /// Point the assembler at `slug` and fetch its detail page.
    ///
    /// Previously scraped fields are discarded. With `auto_scrape` the default
    /// field set is filled straight away.
    pub async fn set_slug(&mut self, slug: &str, auto_scrape: bool) -> Result<()> {
        let page = self.scraper.film_page(slug).await?;
        self.page = Some(page);
        self.record = FilmRecord {
            slug: slug.to_string(),
            ..FilmRecord::default()
        };
        info!(slug, "film page loaded");

        if auto_scrape {
            self.get_film_data(FilmFields::default()).await?;
        }
        Ok(())
    }

    pub fn slug(&self) -> Option<&str> {
        self.page.as_ref().map(|_| self.record.slug.as_str())
    }

    pub fn record(&self) -> &FilmRecord {
        &self.record
    }

    pub fn into_record(self) -> FilmRecord {
        self.record
    }

    fn require_slug(&self) -> Result<String> {
        self.slug()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::Precondition("no film slug set".into()))
    }

    /// Run `f` over the parsed detail page. The document lives only for the call.
    fn with_page<T>(&self, f: impl FnOnce(&Html) -> T) -> Result<T> {
        let markup = self
            .page
            .as_deref()
            .ok_or_else(|| ScrapeError::Precondition("no film slug set".into()))?;
        Ok(f(&parse(markup)))
    }

    /// Fill the selected fields, in a fixed order, stopping at the first error.
    pub async fn get_film_data(&mut self, fields: FilmFields) -> Result<()> {
        self.require_slug()?;
        if fields.release_year {
            self.get_release_year()?;
        }
        if fields.directors {
            self.get_directors()?;
        }
        if fields.synopsis {
            self.get_synopsis()?;
        }
        if fields.poster {
            self.get_poster()?;
        }
        if fields.rating {
            self.get_rating().await?;
        }
        if fields.genres {
            self.get_genres().await?;
        }
        Ok(())
    }

    // ── Detail page fields ──

    pub fn get_release_year(&mut self) -> Result<i32> {
        let year = self.with_page(film::release_year)??;
        self.record.release_year = Some(year);
        Ok(year)
    }

    pub fn get_directors(&mut self) -> Result<Vec<String>> {
        let directors = self.with_page(film::directors)?;
        self.record.directors = Some(directors.clone());
        Ok(directors)
    }

    pub fn get_synopsis(&mut self) -> Result<String> {
        let synopsis = self.with_page(film::synopsis)?;
        self.record.synopsis = Some(synopsis.clone());
        Ok(synopsis)
    }

    pub fn get_poster(&mut self) -> Result<String> {
        let slug = self.require_slug()?;
        let poster_base = self.scraper.config().poster_base_url.clone();
        let url = self.with_page(|doc| film::poster_url(doc, &poster_base, &slug))??;
        self.record.poster_url = Some(url.clone());
        Ok(url)
    }

    pub fn get_cast(&mut self) -> Result<Vec<CastMember>> {
        let cast = self.with_page(film::cast)?;
        self.record.cast = Some(cast.clone());
        Ok(cast)
    }

    pub fn get_crew(&mut self) -> Result<BTreeMap<String, String>> {
        let crew = self.with_page(film::crew)?;
        self.record.crew = Some(crew.clone());
        Ok(crew)
    }

    pub fn get_details(&mut self) -> Result<BTreeMap<String, String>> {
        let details = self.with_page(film::details)?;
        self.record.details = Some(details.clone());
        Ok(details)
    }

    pub fn get_releases(&mut self) -> Result<Vec<Release>> {
        let releases = self.with_page(film::releases)?;
        self.record.releases = Some(releases.clone());
        Ok(releases)
    }

    pub fn get_duration(&mut self) -> Result<u32> {
        let minutes = self.with_page(film::duration)??;
        self.record.duration_minutes = Some(minutes);
        Ok(minutes)
    }

    /// `Ok(None)` when the film has no trailer.
    pub fn get_trailer(&mut self) -> Result<Option<String>> {
        let trailer = self.with_page(film::trailer)?;
        self.record.trailer_url = trailer.clone();
        Ok(trailer)
    }

    // ── Satellite pages ──

    /// Histogram and its average. The histogram is kept even when the film
    /// has no ratings and the average fails.
    pub async fn get_rating(&mut self) -> Result<(RatingHistogram, f64)> {
        let slug = self.require_slug()?;
        let histogram = self.scraper.rating_histogram(&slug).await?;
        self.record.rating_histogram = Some(histogram);
        let average = histogram.average()?;
        self.record.average_rating = Some(average);
        Ok((histogram, average))
    }

    pub async fn get_genres(&mut self) -> Result<Vec<String>> {
        let slug = self.require_slug()?;
        let genres = self.scraper.genres(&slug).await?;
        self.record.genres = Some(genres.clone());
        Ok(genres)
    }

    pub async fn get_stats(&mut self) -> Result<FilmStats> {
        let slug = self.require_slug()?;
        let stats = self.scraper.film_stats(&slug).await?;
        self.record.stats = Some(stats);
        Ok(stats)
    }

    pub async fn get_similars(&mut self) -> Result<Vec<String>> {
        let slug = self.require_slug()?;
        let similar = self.scraper.similar_films(&slug).await?;
        self.record.similar_films = Some(similar.clone());
        Ok(similar)
    }

    /// Popular reviews from the first `pages` review pages.
    pub async fn get_reviews(&mut self, pages: u32) -> Result<Vec<Review>> {
        let slug = self.require_slug()?;
        let reviews = self.scraper.film_reviews(&slug, pages).await?.into_records();
        self.record.reviews = Some(reviews.clone());
        Ok(reviews)
    }
}
