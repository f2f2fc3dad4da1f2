//! Scraper for Letterboxd film, member and diary pages.
//!
//! [`Scraper`] issues page requests and runs the extractors; [`Film`] and
//! [`User`] keep an identity plus the fields gathered for it.

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod film;
pub mod pagination;
pub mod parser;
pub mod records;
pub mod resource;
pub mod user;

pub use aggregator::{Aggregator, Collection, FieldSet};
pub use client::Scraper;
pub use config::ScraperConfig;
pub use error::{FetchError, Result, ScrapeError};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use film::{Film, FilmFields};
pub use records::{
    CastMember, DiaryEntry, FilmRecord, FilmStats, Network, ProfileStats, RatingHistogram, Release,
    Review, UserRecord,
};
pub use resource::{PageRef, Resource, ResourceKind};
pub use user::User;
