//! Client and feed configuration
//!
//! Values come from the environment (`LIBRIS_*`) with built-in defaults.
//! Credentials are plain values handed to whoever needs them; nothing here
//! is global.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DESIRED_MIN: usize = 8;
pub const DEFAULT_CAP: usize = 8;

/// Connection settings for the library service
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `http://localhost:8080/api`
    pub api_base: String,

    /// Bearer token for authenticated endpoints
    pub token: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `LIBRIS_API_BASE`, `LIBRIS_TOKEN` and `LIBRIS_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = lookup("LIBRIS_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let mut config = Self::new(api_base);
        config.token = lookup("LIBRIS_TOKEN").filter(|v| !v.trim().is_empty());
        if let Some(secs) = lookup("LIBRIS_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("LIBRIS_TIMEOUT_SECS", &secs)?);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "api_base",
                format!("'{}' is not an http(s) URL", self.api_base),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::invalid("timeout", "must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// How full a section should be, and how full it may get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLimits {
    /// Sections shorter than this are topped up from fallback sources
    pub desired_min: usize,

    /// Upper bound on a topped-up section
    pub cap: usize,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            desired_min: DEFAULT_DESIRED_MIN,
            cap: DEFAULT_CAP,
        }
    }
}

/// A named feed, where it comes from, and which sections it must contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDefinition {
    pub name: String,

    /// Path below the API base, e.g. `/discover`
    pub endpoint: String,

    pub sections: Vec<String>,
}

impl FeedDefinition {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, sections: &[&str]) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Feed catalogue plus default limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub limits: FeedLimits,
    pub feeds: Vec<FeedDefinition>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limits: FeedLimits::default(),
            feeds: vec![
                FeedDefinition::new("discover", "/discover", &["trending", "newArrivals"]),
                FeedDefinition::new(
                    "recommendations",
                    "/recommendations/me",
                    &["popularOverall", "becauseYouBorrowed"],
                ),
            ],
        }
    }
}

impl FeedConfig {
    /// Built-in catalogue with `LIBRIS_FEED_DESIRED_MIN` / `LIBRIS_FEED_CAP` applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup("LIBRIS_FEED_DESIRED_MIN") {
            config.limits.desired_min = parse_number("LIBRIS_FEED_DESIRED_MIN", &v)?;
        }
        if let Some(v) = lookup("LIBRIS_FEED_CAP") {
            config.limits.cap = parse_number("LIBRIS_FEED_CAP", &v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_limits(mut self, limits: FeedLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Add or replace a feed definition
    pub fn with_feed(mut self, feed: FeedDefinition) -> Self {
        self.feeds.retain(|f| f.name != feed.name);
        self.feeds.push(feed);
        self
    }

    pub fn feed(&self, name: &str) -> Option<&FeedDefinition> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// Expected sections of a feed; empty for feeds not in the catalogue
    pub fn sections_for(&self, name: &str) -> &[String] {
        self.feed(name).map(|f| f.sections.as_slice()).unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.cap == 0 {
            return Err(ConfigError::invalid("cap", "must be at least 1"));
        }

        let mut names = HashSet::new();
        for feed in &self.feeds {
            if feed.name.trim().is_empty() {
                return Err(ConfigError::invalid("feeds", "feed names must be non-empty"));
            }
            if !names.insert(feed.name.as_str()) {
                return Err(ConfigError::invalid(
                    "feeds",
                    format!("feed '{}' is declared twice", feed.name),
                ));
            }
            if !feed.endpoint.starts_with('/') {
                return Err(ConfigError::invalid(
                    "feeds",
                    format!("endpoint of feed '{}' must start with '/'", feed.name),
                ));
            }
            if feed.sections.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::invalid(
                    "feeds",
                    format!("feed '{}' has an empty section name", feed.name),
                ));
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("'{}' is not a valid number", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_client_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_client_from_vars() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LIBRIS_API_BASE", "https://library.example/api"),
            ("LIBRIS_TOKEN", "secret"),
            ("LIBRIS_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://library.example/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_client_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[("LIBRIS_API_BASE", "ftp://x")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("LIBRIS_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("LIBRIS_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_feed_catalogue() {
        let config = FeedConfig::default();
        assert_eq!(config.sections_for("discover"), ["trending", "newArrivals"]);
        assert_eq!(
            config.sections_for("recommendations"),
            ["popularOverall", "becauseYouBorrowed"]
        );
        assert!(config.sections_for("unknown").is_empty());
        assert_eq!(config.limits, FeedLimits { desired_min: 8, cap: 8 });
    }

    #[test]
    fn test_feed_limits_from_vars() {
        let config = FeedConfig::from_lookup(lookup(&[
            ("LIBRIS_FEED_DESIRED_MIN", "4"),
            ("LIBRIS_FEED_CAP", "12"),
        ]))
        .unwrap();
        assert_eq!(config.limits, FeedLimits { desired_min: 4, cap: 12 });

        assert!(FeedConfig::from_lookup(lookup(&[("LIBRIS_FEED_CAP", "0")])).is_err());
    }

    #[test]
    fn test_with_feed_replaces_definition() {
        let config = FeedConfig::default()
            .with_feed(FeedDefinition::new("discover", "/v2/discover", &["staffPicks"]));
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.sections_for("discover"), ["staffPicks"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_blank_sections() {
        let mut config = FeedConfig::default();
        config
            .feeds
            .push(FeedDefinition::new("discover", "/again", &["x"]));
        assert!(config.validate().is_err());

        let config =
            FeedConfig::default().with_feed(FeedDefinition::new("staff", "/staff", &[" "]));
        assert!(config.validate().is_err());
    }
}
