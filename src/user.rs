//! Stateful member assembler.

use scraper::Html;
use tracing::info;

use crate::aggregator::Collection;
use crate::client::Scraper;
use crate::error::{Result, ScrapeError};
use crate::parser::extract::user;
use crate::parser::parse;
use crate::records::{DiaryEntry, Network, ProfileStats, UserRecord};

pub struct User {
    scraper: Scraper,
    profile: Option<String>,
    record: UserRecord,
}

impl User {
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper,
            profile: None,
            record: UserRecord::default(),
        }
    }

    /// Point the assembler at `username` and fetch the profile page.
    pub async fn set_username(&mut self, username: &str) -> Result<()> {
        let profile = self.scraper.profile_page(username).await?;
        self.profile = Some(profile);
        self.record = UserRecord {
            username: username.to_string(),
            ..UserRecord::default()
        };
        info!(username, "profile page loaded");
        Ok(())
    }

    pub fn username(&self) -> Option<&str> {
        self.profile.as_ref().map(|_| self.record.username.as_str())
    }

    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    pub fn into_record(self) -> UserRecord {
        self.record
    }

    fn require_username(&self) -> Result<String> {
        self.username()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::Precondition("no username set".into()))
    }

    fn with_profile<T>(&self, f: impl FnOnce(&Html) -> T) -> Result<T> {
        let markup = self
            .profile
            .as_deref()
            .ok_or_else(|| ScrapeError::Precondition("no username set".into()))?;
        Ok(f(&parse(markup)))
    }

    /// Profile statistics and bio, both read from the profile page.
    pub fn populate(&mut self) -> Result<()> {
        self.get_profile_stats()?;
        self.get_bio()?;
        Ok(())
    }

    pub fn get_profile_stats(&mut self) -> Result<ProfileStats> {
        let stats = self.with_profile(user::profile_stats)?;
        self.record.stats = Some(stats.clone());
        Ok(stats)
    }

    pub fn get_bio(&mut self) -> Result<Vec<String>> {
        let bio = self.with_profile(user::bio)?;
        self.record.bio = Some(bio.clone());
        Ok(bio)
    }

    pub async fn get_watched_films(&mut self) -> Result<Collection<String>> {
        let username = self.require_username()?;
        let films = self.scraper.watched_films(&username).await?;
        self.record.watched_films = Some(films.records.clone());
        Ok(films)
    }

    pub async fn get_watchlist(&mut self) -> Result<Collection<String>> {
        let username = self.require_username()?;
        let films = self.scraper.watchlist(&username).await?;
        self.record.watchlist = Some(films.records.clone());
        Ok(films)
    }

    pub async fn get_network(&mut self) -> Result<Network> {
        let username = self.require_username()?;
        let network = self.scraper.network(&username).await?;
        self.record.network = Some(network.clone());
        Ok(network)
    }

    pub async fn get_diary(&mut self) -> Result<Collection<DiaryEntry>> {
        let username = self.require_username()?;
        let diary = self.scraper.diary(&username).await?;
        self.record.diary = Some(diary.records.clone());
        Ok(diary)
    }

    pub async fn get_lists(&mut self) -> Result<Collection<String>> {
        let username = self.require_username()?;
        let lists = self.scraper.lists(&username).await?;
        self.record.lists = Some(lists.records.clone());
        Ok(lists)
    }
}
