use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";
pub const DEFAULT_POSTER_BASE_URL: &str = "https://a.ltrbxd.com/resized/film-poster";
pub const DEFAULT_CONCURRENCY: usize = 8;
const ENV_PREFIX: &str = "LBXD";

/// Scraper settings. Every field has a default; `LBXD_*` variables override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Site root, without trailing slash.
    pub base_url: String,
    /// Image host prefix used to build poster URLs.
    pub poster_base_url: String,
    /// Upper bound on concurrent page fetches inside one collection.
    pub concurrency: usize,
    pub user_agent: Option<String>,
    /// Transport timeout. Unset means the client never times out.
    pub timeout_secs: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poster_base_url: DEFAULT_POSTER_BASE_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: None,
            timeout_secs: None,
        }
    }
}

impl ScraperConfig {
    /// Defaults layered under `LBXD_BASE_URL`, `LBXD_CONCURRENCY`, etc.
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("poster_base_url", DEFAULT_POSTER_BASE_URL)?
            .set_default("concurrency", DEFAULT_CONCURRENCY as i64)?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize::<Self>()?)
    }

    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ScraperConfig::default();
        assert_eq!(cfg.base_url, "https://letterboxd.com");
        assert_eq!(cfg.concurrency, 8);
        assert!(cfg.user_agent.is_none());
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn base_strips_trailing_slash() {
        let cfg = ScraperConfig {
            base_url: "http://localhost:8080/".into(),
            ..Default::default()
        };
        assert_eq!(cfg.base(), "http://localhost:8080");
    }

    #[test]
    fn from_env_without_overrides_uses_defaults() {
        let cfg = ScraperConfig::from_env().unwrap();
        assert_eq!(cfg.poster_base_url, DEFAULT_POSTER_BASE_URL);
        assert!(cfg.concurrency >= 1);
    }
}
