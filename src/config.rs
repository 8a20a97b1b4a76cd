// Runtime configuration.
// Collects cache location, freshness, and search settings from defaults and the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_TTL, default_cache_dir};
use crate::search::{SearchFields, StrategyKind};

/// What to do when a freshly fetched set cannot be written to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Treat the whole fetch as failed.
    #[default]
    Fail,
    /// Log the failure and hand the fetched data to the caller anyway.
    ReturnData,
}

impl FromStr for CacheWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "return-data" | "return_data" => Ok(Self::ReturnData),
            other => Err(format!("unknown cache write policy: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the cache entry and the log file
    pub cache_dir: PathBuf,
    /// How long a cache entry stays fresh
    pub ttl: Duration,
    /// Read the cache before hitting the API
    pub use_cache: bool,
    /// Behavior when the cache write after a fetch fails
    pub cache_write_policy: CacheWritePolicy,
    /// Scoring strategy used for search
    pub strategy: StrategyKind,
    /// Case-sensitive matching for the weighted strategy
    pub case_sensitive: bool,
    /// Repository fields the search looks at
    pub search_fields: SearchFields,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir().unwrap_or_else(|| PathBuf::from(".starfind")),
            ttl: DEFAULT_TTL,
            use_cache: true,
            cache_write_policy: CacheWritePolicy::default(),
            strategy: StrategyKind::default(),
            case_sensitive: true,
            search_fields: SearchFields::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unparseable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("STARFIND_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(val) = lookup("STARFIND_CACHE_TTL_HOURS") {
            if let Ok(hours) = val.parse::<u64>() {
                config.ttl = ttl_from_hours(hours);
            }
        }
        if let Some(val) = lookup("STARFIND_STRATEGY") {
            if let Ok(strategy) = val.parse() {
                config.strategy = strategy;
            }
        }
        if let Some(val) = lookup("STARFIND_CASE_SENSITIVE") {
            if let Some(flag) = parse_bool(&val) {
                config.case_sensitive = flag;
            }
        }
        if let Some(val) = lookup("STARFIND_SEARCH_FIELDS") {
            if let Ok(fields) = val.parse() {
                config.search_fields = fields;
            }
        }
        if let Some(val) = lookup("STARFIND_CACHE_WRITE_POLICY") {
            if let Ok(policy) = val.parse() {
                config.cache_write_policy = policy;
            }
        }

        config
    }

    /// Full path of the starred repository cache entry.
    pub fn cache_path(&self) -> PathBuf {
        crate::cache::starred_cache_path(&self.cache_dir)
    }
}

/// Convert a TTL in hours, saturating instead of overflowing on huge values.
pub fn ttl_from_hours(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(60 * 60))
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert!(config.use_cache);
        assert!(config.case_sensitive);
        assert_eq!(config.strategy, StrategyKind::Weighted);
        assert_eq!(config.cache_write_policy, CacheWritePolicy::Fail);
        assert_eq!(config.search_fields, SearchFields::ALL);
        assert!(config.cache_path().ends_with("starred_repositories.json"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STARFIND_CACHE_DIR", "/tmp/stars"),
            ("STARFIND_CACHE_TTL_HOURS", "2"),
            ("STARFIND_STRATEGY", "indexed"),
            ("STARFIND_CASE_SENSITIVE", "false"),
            ("STARFIND_CACHE_WRITE_POLICY", "return-data"),
            ("STARFIND_SEARCH_FIELDS", "name,readme"),
        ]));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/stars"));
        assert_eq!(config.ttl, Duration::from_secs(7200));
        assert_eq!(config.strategy, StrategyKind::Indexed);
        assert!(!config.case_sensitive);
        assert_eq!(config.cache_write_policy, CacheWritePolicy::ReturnData);
        assert_eq!(
            config.search_fields,
            SearchFields {
                name: true,
                description: false,
                readme: true,
            }
        );
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("STARFIND_CACHE_TTL_HOURS", "soon"),
            ("STARFIND_STRATEGY", "magic"),
            ("STARFIND_CASE_SENSITIVE", "maybe"),
            ("STARFIND_SEARCH_FIELDS", "topics"),
        ]));
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.strategy, StrategyKind::Weighted);
        assert!(config.case_sensitive);
        assert_eq!(config.search_fields, SearchFields::ALL);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let config = Config::from_lookup(lookup(&[(
            "STARFIND_CACHE_TTL_HOURS",
            "18446744073709551615",
        )]));
        assert_eq!(config.ttl, Duration::from_secs(u64::MAX));
        assert_eq!(ttl_from_hours(2), Duration::from_secs(7200));
    }
}
