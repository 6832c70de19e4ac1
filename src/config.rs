use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::chart::ColorMode;
use crate::domain::errors::AppError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{AssetOption, AssetSlug, Timespan};
use crate::infrastructure::cache::CacheOptions;
use crate::infrastructure::http::messari_client::DEFAULT_BASE_URL;
use crate::log_warn;

/// Id of the `<script type="application/json">` element holding page config.
pub const EMBEDDED_CONFIG_ID: &str = "dashboard-config";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_dedupe_interval_ms() -> i64 {
    CacheOptions::default().dedupe_interval_ms
}

fn default_chart_height() -> f64 {
    440.0
}

fn default_true() -> bool {
    true
}

/// Startup settings for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    /// Sent as `x-messari-api-key` when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub default_asset: AssetOption,
    #[serde(default)]
    pub default_timespan: Timespan,
    #[serde(default)]
    pub color_mode: ColorMode,
    #[serde(default = "default_dedupe_interval_ms")]
    pub dedupe_interval_ms: i64,
    #[serde(default)]
    pub refresh_interval_ms: Option<u32>,
    #[serde(default = "default_true")]
    pub revalidate_on_focus: bool,
    #[serde(default = "default_chart_height")]
    pub chart_height: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            api_key: None,
            default_asset: AssetOption::default(),
            default_timespan: Timespan::default(),
            color_mode: ColorMode::default(),
            dedupe_interval_ms: default_dedupe_interval_ms(),
            refresh_interval_ms: None,
            revalidate_on_focus: true,
            chart_height: default_chart_height(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Embedded JSON (or defaults), then the stored color mode, then the
    /// query string. Broken JSON falls back to defaults.
    pub fn resolve(embedded: Option<&str>, stored_mode: Option<ColorMode>, query: &str) -> Self {
        let mut config = match embedded.map(str::trim).filter(|json| !json.is_empty()) {
            Some(json) => Self::from_json(json).unwrap_or_else(|err| {
                log_warn!(LogComponent::Application("Config"), "embedded config ignored: {}", err);
                Self::default()
            }),
            None => Self::default(),
        };
        if let Some(mode) = stored_mode {
            config.color_mode = mode;
        }
        config.with_query_string(query)
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions { dedupe_interval_ms: self.dedupe_interval_ms.max(0) }
    }

    /// Apply `?asset=..&timespan=..&mode=..` overrides. Unknown keys and
    /// unparsable values are skipped.
    pub fn with_query_string(mut self, query: &str) -> Self {
        let pairs = parse_query(query);
        if let Some(slug) = pairs.get("asset").and_then(Value::as_str).and_then(|s| AssetSlug::new(s).ok()) {
            if slug.value() != self.default_asset.value {
                // the label is replaced once the asset list has loaded
                let slug = slug.value().to_string();
                self.default_asset = AssetOption { label: slug.clone(), value: slug, id: String::new() };
            }
        }
        if let Some(timespan) = override_value::<Timespan>(&pairs, "timespan") {
            self.default_timespan = timespan;
        }
        if let Some(mode) = override_value::<ColorMode>(&pairs, "mode") {
            self.color_mode = mode;
        }
        self
    }
}

fn parse_query(query: &str) -> Map<String, Value> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}

fn override_value<T: serde::de::DeserializeOwned>(pairs: &Map<String, Value>, key: &str) -> Option<T> {
    let raw = pairs.get(key)?;
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log_warn!(LogComponent::Application("Config"), "ignoring {}={}: {}", key, raw, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.default_asset.value, "bitcoin");
        assert_eq!(config.color_mode, ColorMode::Dark);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        assert!(matches!(DashboardConfig::from_json("[1]"), Err(AppError::Config(_))));
    }
}
