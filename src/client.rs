//! `Scraper`: one async call per page group, shared by both assemblers.
//!
//! Markup is parsed only inside the synchronous extractor calls, so no parsed
//! document is ever held across an `.await`.

use std::sync::Arc;

use tracing::debug;

use crate::aggregator::{Aggregator, Collection, FieldSet};
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::parser::extract::{self, diary, film, rating, reviews, user};
use crate::records::{DiaryEntry, FilmStats, Network, RatingHistogram, Review};
use crate::resource::{
    film_subpage_url, film_url, profile_url, rating_histogram_url, validate_slug, validate_username,
    Resource, ResourceKind,
};

#[derive(Clone)]
pub struct Scraper {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<ScraperConfig>,
    aggregator: Aggregator,
}

impl Scraper {
    /// Scraper over a real HTTP client.
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ScraperConfig::from_env()?)
    }

    pub fn with_fetcher(config: ScraperConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let aggregator = Aggregator::new(Arc::clone(&fetcher), config.base(), config.concurrency);
        Self {
            fetcher,
            config: Arc::new(config),
            aggregator,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn get(&self, url: &str) -> Result<String> {
        Ok(self.fetcher.fetch(url).await?)
    }

    // ── Film pages ──

    /// Raw markup of `/film/{slug}/`.
    pub async fn film_page(&self, slug: &str) -> Result<String> {
        validate_slug(slug)?;
        self.get(&film_url(self.config.base(), slug)).await
    }

    pub async fn rating_histogram(&self, slug: &str) -> Result<RatingHistogram> {
        validate_slug(slug)?;
        let markup = self.get(&rating_histogram_url(self.config.base(), slug)).await?;
        Ok(rating::histogram_page(&markup))
    }

    pub async fn genres(&self, slug: &str) -> Result<Vec<String>> {
        validate_slug(slug)?;
        let markup = self.get(&film_subpage_url(self.config.base(), slug, "genres")).await?;
        Ok(film::genres_page(&markup))
    }

    pub async fn film_stats(&self, slug: &str) -> Result<FilmStats> {
        validate_slug(slug)?;
        let markup = self.get(&film_subpage_url(self.config.base(), slug, "members")).await?;
        film::stats_page(&markup)
    }

    pub async fn similar_films(&self, slug: &str) -> Result<Vec<String>> {
        validate_slug(slug)?;
        let markup = self.get(&film_subpage_url(self.config.base(), slug, "similar")).await?;
        Ok(film::similar_page(&markup))
    }

    /// Popular reviews, reading at most `pages` pages.
    pub async fn film_reviews(&self, slug: &str, pages: u32) -> Result<Collection<Review>> {
        validate_slug(slug)?;
        let resource = Resource::new(slug, ResourceKind::FilmReviews);
        self.aggregator
            .collect(&resource, None, Some(pages), reviews::reviews_page)
            .await
    }

    // ── Member pages ──

    /// Raw markup of `/{username}/`.
    pub async fn profile_page(&self, username: &str) -> Result<String> {
        validate_username(username)?;
        self.get(&profile_url(self.config.base(), username)).await
    }

    async fn user_collection<F: FieldSet>(
        &self,
        username: &str,
        kind: ResourceKind,
        extract: fn(&str) -> F,
    ) -> Result<Collection<F::Record>> {
        validate_username(username)?;
        let resource = Resource::new(username, kind);
        debug!(resource = %resource, "starting member collection");
        self.aggregator.collect(&resource, None, None, extract).await
    }

    pub async fn watched_films(&self, username: &str) -> Result<Collection<String>> {
        self.user_collection(username, ResourceKind::WatchedFilms, extract::poster_slugs_page)
            .await
    }

    pub async fn watchlist(&self, username: &str) -> Result<Collection<String>> {
        self.user_collection(username, ResourceKind::Watchlist, extract::poster_slugs_page)
            .await
    }

    pub async fn following(&self, username: &str) -> Result<Collection<String>> {
        self.user_collection(username, ResourceKind::Following, user::network_page)
            .await
    }

    pub async fn followers(&self, username: &str) -> Result<Collection<String>> {
        self.user_collection(username, ResourceKind::Followers, user::network_page)
            .await
    }

    /// Both directions of the member's network, collected side by side.
    pub async fn network(&self, username: &str) -> Result<Network> {
        let (following, followers) =
            tokio::try_join!(self.following(username), self.followers(username))?;
        Ok(Network {
            following: following.into_records(),
            followers: followers.into_records(),
        })
    }

    pub async fn diary(&self, username: &str) -> Result<Collection<DiaryEntry>> {
        self.user_collection(username, ResourceKind::Diary, diary::diary_page)
            .await
    }

    pub async fn lists(&self, username: &str) -> Result<Collection<String>> {
        self.user_collection(username, ResourceKind::Lists, user::lists_page)
            .await
    }
}
