use chrono::{Datelike, Months, NaiveDate};
use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - USD price
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - traded volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - milliseconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Deref, Constructor, Serialize, Deserialize,
)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_millis(value: i64) -> Self {
        Self(value)
    }
}

/// Value Object - Messari asset slug (`bitcoin`, `ethereum`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct AssetSlug(String);

impl AssetSlug {
    pub fn new(slug: &str) -> Result<Self, String> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err("Asset slug cannot be empty".to_string());
        }
        Ok(Self(slug.to_lowercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetSlug {
    fn from(value: &str) -> Self {
        Self(value.trim().to_lowercase())
    }
}

/// Sampling interval accepted by the time-series endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum SeriesInterval {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    ThirtyMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,

    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    OneWeek,
}

impl SeriesInterval {
    pub fn to_api_str(&self) -> &str {
        self.as_ref()
    }
}

/// Inclusive calendar range sent as `start`/`end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Constructor, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// User-selectable duration preset
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum Timespan {
    #[strum(serialize = "1M")]
    #[serde(rename = "1M")]
    OneMonth,

    #[strum(serialize = "3M")]
    #[serde(rename = "3M")]
    ThreeMonths,

    #[default]
    #[strum(serialize = "YTD")]
    #[serde(rename = "YTD")]
    YearToDate,

    #[strum(serialize = "1Y")]
    #[serde(rename = "1Y")]
    OneYear,
}

impl Timespan {
    pub const ALL: [Timespan; 4] =
        [Timespan::OneMonth, Timespan::ThreeMonths, Timespan::YearToDate, Timespan::OneYear];

    /// Concrete range ending on `today` (UTC calendar day).
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            Timespan::OneMonth => months_before(today, 1),
            Timespan::ThreeMonths => months_before(today, 3),
            Timespan::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
            Timespan::OneYear => months_before(today, 12),
        };
        DateRange::new(start, today)
    }

    pub fn interval(&self) -> SeriesInterval {
        match self {
            Timespan::OneMonth => SeriesInterval::OneHour,
            Timespan::ThreeMonths | Timespan::YearToDate | Timespan::OneYear => {
                SeriesInterval::OneDay
            }
        }
    }
}

// Month arithmetic clamps to the last valid day (Mar 31 - 1M = Feb 28/29).
fn months_before(day: NaiveDate, months: u32) -> NaiveDate {
    day.checked_sub_months(Months::new(months)).unwrap_or(day)
}
