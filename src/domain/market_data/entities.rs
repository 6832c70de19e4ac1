pub use super::value_objects::{AssetSlug, Price, Timestamp, Volume};
use serde::{Deserialize, Deserializer, Serialize};

/// Wire shape of one time-series point: `[timestamp, open, high, low, close, volume]`.
/// Messari sends `null` for gaps, so every price column is optional.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawSample(
    i64,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
);

/// Domain entity - one sampled price point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub open: Option<Price>,
    pub high: Option<Price>,
    pub low: Option<Price>,
    pub close: Option<Price>,
    pub volume: Option<Volume>,
}

impl<'de> Deserialize<'de> for Sample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawSample(ts, open, high, low, close, volume) = RawSample::deserialize(deserializer)?;
        Ok(Sample {
            timestamp: Timestamp::from_millis(ts),
            open: open.map(Price::from),
            high: high.map(Price::from),
            low: low.map(Price::from),
            close: close.map(Price::from),
            volume: volume.map(Volume::from),
        })
    }
}

impl Sample {
    /// Point with only the fields the chart reads.
    pub fn closing(timestamp: i64, close: f64) -> Self {
        Self {
            timestamp: Timestamp::from_millis(timestamp),
            open: None,
            high: None,
            low: None,
            close: Some(Price::from(close)),
            volume: None,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp.value()
    }

    /// Closing value; `0.0` for a gap (normalized series never contain one).
    pub fn close(&self) -> f64 {
        self.close.map(|p| p.value()).unwrap_or(0.0)
    }

    fn has_usable_close(&self) -> bool {
        self.close.map(|p| p.value().is_finite()).unwrap_or(false)
    }
}

/// Domain entity - time-ordered series with strictly increasing timestamps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    samples: Vec<Sample>,
}

impl PriceSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts by time, drops gaps, and keeps the last sample for a repeated timestamp.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut samples: Vec<Sample> = samples.into_iter().filter(Sample::has_usable_close).collect();
        // stable sort keeps arrival order among equal timestamps
        samples.sort_by_key(|s| s.timestamp);

        let mut out: Vec<Sample> = Vec::with_capacity(samples.len());
        for sample in samples {
            match out.last_mut() {
                Some(last) if last.timestamp == sample.timestamp => *last = sample,
                _ => out.push(sample),
            }
        }
        Self { samples: out }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// `(min, max)` timestamp, `None` for an empty series.
    pub fn time_extent(&self) -> Option<(i64, i64)> {
        Some((self.first()?.timestamp(), self.latest()?.timestamp()))
    }

    pub fn max_close(&self) -> Option<f64> {
        self.samples.iter().map(Sample::close).fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }
}

/// Entry of the asset list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub name: String,
    pub slug: String,
}

/// Selected asset as the picker holds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOption {
    pub label: String,
    pub value: String,
    pub id: String,
}

impl Default for AssetOption {
    fn default() -> Self {
        Self { label: "Bitcoin".to_string(), value: "bitcoin".to_string(), id: String::new() }
    }
}

impl From<&Asset> for AssetOption {
    fn from(asset: &Asset) -> Self {
        Self { label: asset.name.clone(), value: asset.slug.clone(), id: asset.id.clone() }
    }
}

impl AssetOption {
    pub fn slug(&self) -> AssetSlug {
        AssetSlug::from(self.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub percent_change_usd_last_24_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllTimeHigh {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub percent_down: Option<f64>,
    #[serde(default)]
    pub days_since: Option<u32>,
}

// `null` and a missing field both mean "nothing reported"
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Payload of `/assets/{slug}/metrics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_data: MarketData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_time_high: AllTimeHigh,
}

/// Payload of `/assets/{slug}/metrics/price/time-series`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub values: Option<Vec<Sample>>,
}

impl TimeSeries {
    pub fn into_series(self) -> PriceSeries {
        PriceSeries::from_samples(self.values.unwrap_or_default())
    }
}
