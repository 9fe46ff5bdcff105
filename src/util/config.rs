use std::path::Path;

use serde_derive::Deserialize;

use crate::{data_types::common::LatLng, error::ConfigError, logerr};

const DEFAULT_DATA_URL: &str =
    "https://storage.googleapis.com/craigatron-strava-data-public/2022_stats.json";
const DEFAULT_ACTIVITY_LINK_BASE: &str = "https://www.strava.com/activities/";

/// How the popup orders the highlighted activities.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListOrdering {
    /// Lexicographic on the rendered lines. Only approximately chronological.
    #[default]
    FormattedText,
    /// By activity date, oldest first.
    Date,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
    pub width_px: f64,
    pub height_px: f64,
    pub stroke_weight: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 42.389118,
            center_lng: -71.097153,
            zoom: 13.0,
            width_px: 1024.0,
            height_px: 768.0,
            stroke_weight: 3.0,
        }
    }
}

impl MapConfig {
    pub fn center(&self) -> LatLng {
        LatLng::new(self.center_lat, self.center_lng)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    pub threshold_px: f64,
    pub max_listed: usize,
    pub emphasis_weight: f64,
    pub ordering: ListOrdering,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            threshold_px: 5.0,
            max_listed: 10,
            emphasis_weight: 6.0,
            ordering: ListOrdering::FormattedText,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProgressConfig {
    pub target_miles: f64,
    pub bar_width_px: f64,
    pub marker_half_width_px: f64,
    pub tick_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            target_miles: 1700.0,
            bar_width_px: 500.0,
            marker_half_width_px: 25.0,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub static_dir: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            static_dir: "dist/strava-stats".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_url: String,
    pub activity_link_base: String,
    pub map: MapConfig,
    pub highlight: HighlightConfig,
    pub progress: ProgressConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            activity_link_base: DEFAULT_ACTIVITY_LINK_BASE.to_string(),
            map: Default::default(),
            highlight: Default::default(),
            progress: Default::default(),
            server: Default::default(),
        }
    }
}

impl Config {
    const CC: &'static str = "Config";

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Config::from_toml(&content)
    }

    /// Falls back to the defaults when the file is missing or unreadable.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            return Config::default();
        }

        Config::load(path).unwrap_or_else(|err| {
            logerr!("{}: {}, using defaults", path.display(), err);
            Config::default()
        })
    }
}
