//! URL templates for every page the scraper reads, and identifier checks.

use std::fmt;

use crate::error::{Result, ScrapeError};

/// A paginated collection on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    WatchedFilms,
    Watchlist,
    Following,
    Followers,
    Diary,
    Lists,
    /// Reviews of a film. The owner is a film slug, not a username.
    FilmReviews,
}

impl ResourceKind {
    /// Path below the owner, with trailing slash.
    fn segment(self) -> &'static str {
        match self {
            ResourceKind::WatchedFilms => "films/",
            ResourceKind::Watchlist => "watchlist/",
            ResourceKind::Following => "following/",
            ResourceKind::Followers => "followers/",
            ResourceKind::Diary => "films/diary/",
            ResourceKind::Lists => "lists/",
            ResourceKind::FilmReviews => "reviews/",
        }
    }

    /// Text that precedes the page number in this resource's pagination links.
    pub fn page_marker(self) -> String {
        format!("{}page/", self.segment())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::WatchedFilms => "watched films",
            ResourceKind::Watchlist => "watchlist",
            ResourceKind::Following => "following",
            ResourceKind::Followers => "followers",
            ResourceKind::Diary => "diary",
            ResourceKind::Lists => "lists",
            ResourceKind::FilmReviews => "film reviews",
        };
        f.write_str(name)
    }
}

/// One owner's collection of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub owner: String,
    pub kind: ResourceKind,
}

impl Resource {
    pub fn new(owner: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            owner: owner.into(),
            kind,
        }
    }

    /// Root of the collection: `{base}/{owner}/{segment}`.
    pub fn root_url(&self, base: &str) -> String {
        match self.kind {
            ResourceKind::FilmReviews => {
                format!("{}/film/{}/{}", base, self.owner, self.kind.segment())
            }
            _ => format!("{}/{}/{}", base, self.owner, self.kind.segment()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.kind, self.owner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub resource: Resource,
    pub page: u32,
}

impl PageRef {
    pub fn new(resource: Resource, page: u32) -> Self {
        Self { resource, page }
    }

    pub fn first(resource: Resource) -> Self {
        Self::new(resource, 1)
    }

    /// Page 1 is the bare collection root; later pages append `page/{n}/`.
    pub fn url(&self, base: &str) -> String {
        let root = self.resource.root_url(base);
        if self.page <= 1 {
            root
        } else {
            format!("{}page/{}/", root, self.page)
        }
    }
}

// ── Single-page templates ──

pub fn film_url(base: &str, slug: &str) -> String {
    format!("{}/film/{}/", base, slug)
}

pub fn film_subpage_url(base: &str, slug: &str, sub: &str) -> String {
    format!("{}/film/{}/{}/", base, slug, sub)
}

pub fn rating_histogram_url(base: &str, slug: &str) -> String {
    format!("{}/csi/film/{}/rating-histogram/", base, slug)
}

pub fn profile_url(base: &str, username: &str) -> String {
    format!("{}/{}/", base, username)
}

// ── Identifier validation ──

/// Film slugs are URL-safe: non-empty, no whitespace.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(ScrapeError::Precondition("film slug is empty".into()));
    }
    if slug.chars().any(char::is_whitespace) {
        return Err(ScrapeError::Precondition(format!(
            "film slug cannot contain spaces: {:?}",
            slug
        )));
    }
    Ok(())
}

/// Account handles are opaque but must form a single path segment.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(ScrapeError::Precondition("username is empty".into()));
    }
    if username.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ScrapeError::Precondition(format!(
            "username is not a valid handle: {:?}",
            username
        )));
    }
    Ok(())
}
