//! Engine configuration.
//!
//! Bounds and defaults for request parameters, the fanout deadline, and the
//! policy choices re-exported from `geosample-types`.
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

pub use geosample_types::config::{CellRanking, EmptyCellPolicy, FailurePolicy};
pub use geosample_types::grid::GridResolution;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Upper bound for `limit` in list and radius mode
    #[serde(default = "Config::default_max_limit")]
    pub max_limit: u32,

    /// `limit` used when the caller gives none
    #[serde(default = "Config::default_default_limit")]
    pub default_limit: u32,

    /// Upper bound for each grid axis
    #[serde(default = "Config::default_max_resolution")]
    pub max_resolution: u32,

    #[serde(default)]
    pub default_resolution: GridResolution,

    /// Deadline for a whole grid fanout or radius query
    #[serde(
        rename = "query_timeout_ms",
        default = "Config::default_query_timeout",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub query_timeout: Duration,

    #[serde(default)]
    pub empty_cells: EmptyCellPolicy,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default)]
    pub ranking: CellRanking,
}

impl Config {
    const fn default_max_limit() -> u32 {
        25
    }

    const fn default_default_limit() -> u32 {
        25
    }

    const fn default_max_resolution() -> u32 {
        10
    }

    const fn default_query_timeout() -> Duration {
        Duration::from_secs(10)
    }

    pub fn with_max_limit(mut self, max_limit: u32) -> Self {
        assert!(max_limit > 0, "Max limit must be greater than zero");
        self.max_limit = max_limit;
        self
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        assert!(limit > 0, "Default limit must be greater than zero");
        self.default_limit = limit;
        self
    }

    pub fn with_max_resolution(mut self, max_resolution: u32) -> Self {
        assert!(max_resolution > 0, "Max resolution must be greater than zero");

        if max_resolution > 32 {
            log::warn!(
                "Max resolution of {} allows up to {} concurrent cell queries per request",
                max_resolution,
                max_resolution as u64 * max_resolution as u64
            );
        }

        self.max_resolution = max_resolution;
        self
    }

    pub fn with_default_resolution(mut self, resolution: GridResolution) -> Self {
        self.default_resolution = resolution;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "Query timeout must be non-zero");
        self.query_timeout = timeout;
        self
    }

    pub fn with_empty_cells(mut self, policy: EmptyCellPolicy) -> Self {
        self.empty_cells = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_ranking(mut self, ranking: CellRanking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_limit == 0 {
            return Err("Max limit must be greater than zero".to_string());
        }

        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(format!(
                "Default limit {} must be in [1, {}]",
                self.default_limit, self.max_limit
            ));
        }

        if self.max_resolution == 0 {
            return Err("Max resolution must be greater than zero".to_string());
        }

        let res = self.default_resolution;
        if res.horizontal() == 0
            || res.vertical() == 0
            || res.horizontal() > self.max_resolution
            || res.vertical() > self.max_resolution
        {
            return Err(format!(
                "Default resolution {}x{} must be within [1, {}] on both axes",
                res.horizontal(),
                res.vertical(),
                self.max_resolution
            ));
        }

        if self.query_timeout.is_zero() {
            return Err("Query timeout must be non-zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_limit: Self::default_max_limit(),
            default_limit: Self::default_default_limit(),
            max_resolution: Self::default_max_resolution(),
            default_resolution: GridResolution::default(),
            query_timeout: Self::default_query_timeout(),
            empty_cells: EmptyCellPolicy::default(),
            failure_policy: FailurePolicy::default(),
            ranking: CellRanking::default(),
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis().min(u64::MAX as u128) as u64)
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
