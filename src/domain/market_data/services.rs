use chrono::NaiveDate;

use super::entities::AssetMetrics;
use super::value_objects::{AssetSlug, DateRange, SeriesInterval, Timespan};

/// Parameters of one time-series request. Equal queries share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSeriesQuery {
    pub asset: AssetSlug,
    pub range: DateRange,
    pub interval: SeriesInterval,
}

impl TimeSeriesQuery {
    pub fn new(asset: AssetSlug, timespan: Timespan, today: NaiveDate) -> Self {
        Self { asset, range: timespan.date_range(today), interval: timespan.interval() }
    }

    /// `start=..&end=..&interval=..` in the order the endpoint documents them.
    pub fn query_string(&self) -> String {
        format!(
            "start={}&end={}&interval={}",
            self.range.start.format("%Y-%m-%d"),
            self.range.end.format("%Y-%m-%d"),
            self.interval.to_api_str()
        )
    }
}

/// Display-ready view of the metrics payload. `None` means "not resolved yet".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub price_usd: Option<f64>,
    pub change_24h_pct: Option<f64>,
    pub ath_price: Option<f64>,
    /// Negated `percent_down`, so a drawdown reads as a decrease.
    pub ath_change_pct: Option<f64>,
    pub days_since_ath: Option<u32>,
}

impl MetricsSummary {
    /// Summary for an optional payload; no payload resolves nothing.
    pub fn from_metrics(metrics: Option<&AssetMetrics>) -> Self {
        let Some(metrics) = metrics else {
            return Self::default();
        };
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            price_usd: finite(metrics.market_data.price_usd),
            change_24h_pct: finite(metrics.market_data.percent_change_usd_last_24_hours),
            ath_price: finite(metrics.all_time_high.price),
            ath_change_pct: finite(metrics.all_time_high.percent_down).map(|p| -p),
            days_since_ath: metrics.all_time_high.days_since,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.price_usd.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::entities::{AllTimeHigh, MarketData};

    #[test]
    fn query_string_uses_iso_dates() {
        let today = NaiveDate::from_ymd_opt(2021, 10, 12).unwrap();
        let query = TimeSeriesQuery::new(AssetSlug::from("bitcoin"), Timespan::OneYear, today);
        assert_eq!(query.query_string(), "start=2020-10-12&end=2021-10-12&interval=1d");
    }

    #[test]
    fn ath_drawdown_is_negated() {
        let metrics = AssetMetrics {
            market_data: MarketData { price_usd: Some(100.0), percent_change_usd_last_24_hours: None },
            all_time_high: AllTimeHigh { price: Some(200.0), percent_down: Some(50.0), days_since: Some(3) },
        };
        let summary = MetricsSummary::from_metrics(Some(&metrics));
        assert_eq!(summary.ath_change_pct, Some(-50.0));
        assert!(summary.is_resolved());
    }

    #[test]
    fn missing_metrics_resolve_nothing() {
        let summary = MetricsSummary::from_metrics(None);
        assert_eq!(summary, MetricsSummary::default());
        assert!(!summary.is_resolved());
    }
}
