use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Search queries to crawl. Listings from every query accumulate into
    /// one ranked set.
    #[serde(default)]
    pub queries: Vec<QueryConfig>,

    /// Listings with a longer total commute (in minutes) are discarded.
    /// A commute exactly at the ceiling is kept.
    #[serde(default = "default_commute_ceiling")]
    pub commute_ceiling_minutes: u32,

    /// Where the ranked CSV report lands. Overwritten on every run.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Timeout applied to every network request, e.g. "30s".
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            commute_ceiling_minutes: default_commute_ceiling(),
            output: default_output(),
            request_timeout: default_request_timeout(),
            routing: RoutingConfig::default(),
            scoring: None,
        }
    }
}

impl Config {
    /// Parsed request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.request_timeout)
            .with_context(|| format!("Invalid request_timeout: {:?}", self.request_timeout))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    pub name: Option<String>,
    pub url: String,
}

/// Transit routing service parameters. The defaults point at the public
/// direction API with the destination the report is built around.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default = "default_routing_endpoint")]
    pub endpoint: String,

    /// Where the commute ends, e.g. a campus or office name.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Region the routing service resolves both endpoints in.
    #[serde(default = "default_region")]
    pub region: String,

    /// Routing API key. Can also come from the ROOM_RANK_AK environment
    /// variable, the --api-key flag, or the stored key file.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_routing_endpoint(),
            destination: default_destination(),
            region: default_region(),
            api_key: None,
        }
    }
}

fn default_commute_ceiling() -> u32 {
    40
}

fn default_output() -> PathBuf {
    PathBuf::from("rooms.csv")
}

fn default_request_timeout() -> String {
    "30s".to_string()
}

fn default_routing_endpoint() -> String {
    "http://api.map.baidu.com/direction/v1".to_string()
}

fn default_destination() -> String {
    "人民大学".to_string()
}

fn default_region() -> String {
    "北京".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_gets_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.queries.is_empty());
        assert_eq!(config.commute_ceiling_minutes, 40);
        assert_eq!(config.output, PathBuf::from("rooms.csv"));
        assert_eq!(config.request_timeout, "30s");
        assert_eq!(config.routing.endpoint, "http://api.map.baidu.com/direction/v1");
        assert_eq!(config.routing.destination, "人民大学");
        assert_eq!(config.routing.region, "北京");
        assert!(config.routing.api_key.is_none());
        assert!(config.scoring.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
queries:
  - name: two-room
    url: "http://www.ziroom.com/z/nl/z2-r2100TO3000-u2-a2.html"
  - url: "http://www.ziroom.com/z/nl/z2-r2100TO3000-u3-a2.html"
commute_ceiling_minutes: 35
output: /tmp/report.csv
request_timeout: 10s
routing:
  destination: "中关村"
  api_key: "test-key"
scoring:
  rent_weight: 1.2
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.queries.len(), 2);
        assert_eq!(config.queries[0].name.as_deref(), Some("two-room"));
        assert!(config.queries[1].name.is_none());
        assert_eq!(config.commute_ceiling_minutes, 35);
        assert_eq!(config.output, PathBuf::from("/tmp/report.csv"));
        assert_eq!(config.routing.destination, "中关村");
        assert_eq!(config.routing.region, "北京");
        assert_eq!(config.routing.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.scoring.unwrap().rent_weight, Some(1.2));
    }

    #[test]
    fn test_timeout_parses_humantime() {
        let config = Config::default();
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(30));

        let mut config = Config::default();
        config.request_timeout = "bogus".to_string();
        assert!(config.timeout().is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_saphyr::from_str::<Config>("persistence: true").is_err());
    }
}
