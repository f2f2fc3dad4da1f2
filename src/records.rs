//! Plain output records. Nothing here touches the network.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Result, ScrapeError};

/// Star labels in bucket order, half a star through five stars.
pub const STAR_LABELS: [&str; 10] = [
    "half-★", "★", "★½", "★★", "★★½", "★★★", "★★★½", "★★★★", "★★★★½", "★★★★★",
];

/// Vote counts for the ten half-star rating buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingHistogram {
    counts: [u64; 10],
}

impl RatingHistogram {
    pub fn from_counts(counts: [u64; 10]) -> Self {
        Self { counts }
    }

    /// Bucket index (0-based) for a star label, if it is one of the ten.
    pub fn bucket_of(label: &str) -> Option<usize> {
        STAR_LABELS.iter().position(|l| *l == label)
    }

    pub fn set(&mut self, label: &str, count: u64) -> bool {
        match Self::bucket_of(label) {
            Some(i) => {
                self.counts[i] = count;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        Self::bucket_of(label).map(|i| self.counts[i])
    }

    pub fn counts(&self) -> &[u64; 10] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Σ(bucket × count) / Σ(count) with buckets numbered 1..=10, rounded to
    /// three decimals. Fails when there are no ratings at all.
    pub fn average(&self) -> Result<f64> {
        let total = self.total();
        if total == 0 {
            return Err(ScrapeError::Extraction {
                field: "average_rating",
                reason: "histogram has no ratings".to_string(),
            });
        }
        let weighted: u64 = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u64 + 1) * c)
            .sum();
        Ok(round3(weighted as f64 / total as f64))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        STAR_LABELS.iter().copied().zip(self.counts.iter().copied())
    }
}

impl Serialize for RatingHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(STAR_LABELS.len()))?;
        for (label, count) in self.iter() {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastMember {
    pub actor: String,
    /// `None` when the credit carries no character name.
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub date: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilmStats {
    pub members: u64,
    pub fans: u64,
    pub likes: u64,
    pub reviews: u64,
    pub lists: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Review {
    pub username: Option<String>,
    pub text: Option<String>,
    pub rating: Option<String>,
    pub date: Option<String>,
    pub review_id: Option<String>,
}

/// Everything scraped about one film. Fields stay `None` until fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilmRecord {
    pub slug: String,
    pub release_year: Option<i32>,
    pub directors: Option<Vec<String>>,
    pub synopsis: Option<String>,
    pub poster_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub rating_histogram: Option<RatingHistogram>,
    pub average_rating: Option<f64>,
    pub cast: Option<Vec<CastMember>>,
    pub crew: Option<BTreeMap<String, String>>,
    pub details: Option<BTreeMap<String, String>>,
    pub releases: Option<Vec<Release>>,
    pub duration_minutes: Option<u32>,
    pub trailer_url: Option<String>,
    pub similar_films: Option<Vec<String>>,
    pub stats: Option<FilmStats>,
    pub reviews: Option<Vec<Review>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub films: u64,
    pub this_year: u64,
    pub following: u64,
    pub followers: u64,
    pub lists: u64,
    pub favorite_films: Vec<String>,
    pub is_patron: bool,
    pub is_pro: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Network {
    pub following: Vec<String>,
    pub followers: Vec<String>,
}

/// One diary row. Row-level fields that were not marked on the page are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaryEntry {
    pub date: Option<NaiveDate>,
    pub film_slug: Option<String>,
    /// Stars, in half-star steps.
    pub rating: Option<f32>,
    pub like: bool,
    pub rewatch: bool,
    pub review: Option<String>,
}

/// Everything scraped about one user. Fields stay `None` until fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub stats: Option<ProfileStats>,
    pub bio: Option<Vec<String>>,
    pub watched_films: Option<Vec<String>>,
    pub watchlist: Option<Vec<String>>,
    pub network: Option<Network>,
    pub diary: Option<Vec<DiaryEntry>>,
    pub lists: Option<Vec<String>>,
}
