use crate::domain::market_data::{AssetSlug, TimeSeriesQuery};

pub const DEFAULT_BASE_URL: &str = "https://data.messari.io/api/v1";

/// URL builder for the Messari v1 REST API. The URLs double as cache keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessariEndpoints {
    base_url: String,
}

impl Default for MessariEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MessariEndpoints {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn assets_url(&self) -> String {
        format!("{}/assets", self.base_url)
    }

    pub fn metrics_url(&self, asset: &AssetSlug) -> String {
        format!("{}/assets/{}/metrics", self.base_url, asset.value())
    }

    pub fn time_series_url(&self, query: &TimeSeriesQuery) -> String {
        format!(
            "{}/assets/{}/metrics/price/time-series?{}",
            self.base_url,
            query.asset.value(),
            query.query_string()
        )
    }
}
