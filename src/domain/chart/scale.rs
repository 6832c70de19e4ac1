//! Continuous scales mapping data space onto pixel space.
//!
//! Both scales follow d3 conventions: a domain `[d0, d1]` is mapped linearly
//! onto a range `[r0, r1]`; a zero-width domain maps every value onto the
//! middle of the range and inverts to the domain start. Nothing here panics on
//! empty or degenerate input.

use chrono::{DateTime, Datelike, Months, NaiveDate};

use super::value_objects::Dimensions;
use crate::domain::market_data::PriceSeries;

const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
/// 1970-01-04T00:00Z, the first Sunday after the epoch.
const FIRST_SUNDAY_MS: f64 = 3.0 * DAY_MS;

/// Fallback domain for an empty series.
pub const FALLBACK_DOMAIN: (f64, f64) = (0.0, 1.0);

/// Series whose maximum close is below this get no headroom above the line.
pub const HEADROOM_THRESHOLD: f64 = 50.0;

fn interpolate(value: f64, (d0, d1): (f64, f64), (r0, r1): (f64, f64)) -> f64 {
    let span = d1 - d0;
    if span == 0.0 || !span.is_finite() {
        return (r0 + r1) / 2.0;
    }
    r0 + (value - d0) / span * (r1 - r0)
}

fn uninterpolate(px: f64, (d0, d1): (f64, f64), (r0, r1): (f64, f64)) -> f64 {
    let span = r1 - r0;
    if span == 0.0 || !span.is_finite() {
        return d0;
    }
    d0 + (px - r0) / span * (d1 - d0)
}

/// `(i1, i2, inc)` as in d3-array's `tickSpec`; a negative `inc` is the
/// reciprocal of a sub-unit step.
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

/// Price magnitude → vertical pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, value: f64) -> f64 {
        interpolate(value, self.domain, self.range)
    }

    pub fn invert(&self, px: f64) -> f64 {
        uninterpolate(px, self.domain, self.range)
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let Some((_, _, step)) = tick_spec(start, stop, count as f64) else {
                break;
            };
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            previous = Some(step);
        }

        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Round values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let Some((i1, i2, inc)) = tick_spec(start, stop, count as f64) else {
            return Vec::new();
        };
        if i2 < i1 {
            return Vec::new();
        }
        let n = (i2 - i1) as usize + 1;
        let mut ticks: Vec<f64> = (0..n)
            .map(|i| {
                let k = i1 + i as f64;
                if inc < 0.0 { k / -inc } else { k * inc }
            })
            .collect();
        if reversed {
            ticks.reverse();
        }
        ticks
    }
}

/// Calendar time (epoch millis) → horizontal pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Candidate tick spacings, finest first.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimeStep {
    Fixed(f64),
    Months(u32),
}

const TIME_STEPS: [TimeStep; 11] = [
    TimeStep::Fixed(HOUR_MS),
    TimeStep::Fixed(3.0 * HOUR_MS),
    TimeStep::Fixed(6.0 * HOUR_MS),
    TimeStep::Fixed(12.0 * HOUR_MS),
    TimeStep::Fixed(DAY_MS),
    TimeStep::Fixed(2.0 * DAY_MS),
    TimeStep::Fixed(WEEK_MS),
    TimeStep::Fixed(2.0 * WEEK_MS),
    TimeStep::Months(1),
    TimeStep::Months(3),
    TimeStep::Months(12),
];

impl TimeStep {
    fn approx_ms(&self) -> f64 {
        match self {
            TimeStep::Fixed(ms) => *ms,
            TimeStep::Months(n) => *n as f64 * 30.0 * DAY_MS,
        }
    }
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, timestamp_ms: f64) -> f64 {
        interpolate(timestamp_ms, self.domain, self.range)
    }

    pub fn invert(&self, px: f64) -> f64 {
        uninterpolate(px, self.domain, self.range)
    }

    /// UTC-aligned tick timestamps, at most about `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let span = stop - start;
        let step = TIME_STEPS
            .iter()
            .copied()
            .find(|s| span / s.approx_ms() <= count as f64)
            .unwrap_or(TimeStep::Months(12));

        match step {
            TimeStep::Fixed(ms) => {
                let mut ticks = Vec::new();
                // weekly steps start on Sunday 00:00 UTC, shorter ones on the epoch grid
                let anchor = if ms >= WEEK_MS { FIRST_SUNDAY_MS } else { 0.0 };
                let mut t = anchor + ((start - anchor) / ms).ceil() * ms;
                while t <= stop {
                    ticks.push(t);
                    t += ms;
                }
                ticks
            }
            TimeStep::Months(every) => month_ticks(start, stop, every),
        }
    }
}

fn month_ticks(start: f64, stop: f64, every: u32) -> Vec<f64> {
    let Some(first) = DateTime::from_timestamp_millis(start as i64) else {
        return Vec::new();
    };
    let first = first.date_naive();
    let Some(mut month) = NaiveDate::from_ymd_opt(first.year(), first.month(), 1) else {
        return Vec::new();
    };
    // align to quarter / year boundaries
    while month.month0() % every != 0 {
        month = match month.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => return Vec::new(),
        };
    }

    let mut ticks = Vec::new();
    loop {
        let Some(ms) = month.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis() as f64)
        else {
            break;
        };
        if ms > stop {
            break;
        }
        if ms >= start {
            ticks.push(ms);
        }
        month = match month.checked_add_months(Months::new(every)) {
            Some(next) => next,
            None => break,
        };
    }
    ticks
}

/// Both scales for one series at one size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub time: TimeScale,
    pub value: LinearScale,
}

impl ChartScales {
    pub fn new(series: &PriceSeries, dims: &Dimensions) -> Self {
        let margin = dims.margin;
        let time_domain = series
            .time_extent()
            .map(|(t0, t1)| (t0 as f64, t1 as f64))
            .unwrap_or(FALLBACK_DOMAIN);
        let time = TimeScale::new(time_domain, (margin.left, margin.left + dims.inner_width()));

        let max_close = series.max_close().unwrap_or(0.0);
        let top = if max_close < HEADROOM_THRESHOLD {
            max_close
        } else {
            max_close + dims.inner_height() / 3.0
        };
        let value_domain = if top > 0.0 && top.is_finite() { (0.0, top) } else { FALLBACK_DOMAIN };
        let value = LinearScale::new(value_domain, (margin.top + dims.inner_height(), margin.top))
            .nice(10);

        Self { time, value }
    }

    /// Pixel position of a sample's close.
    pub fn point(&self, timestamp_ms: i64, close: f64) -> (f64, f64) {
        (self.time.scale(timestamp_ms as f64), self.value.scale(close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::value_objects::Margin;
    use crate::domain::market_data::Sample;

    #[test]
    fn nice_rounds_outward() {
        let scale = LinearScale::new((0.0, 0.96), (100.0, 0.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 1.0));
        let scale = LinearScale::new((0.0, 61_234.0), (100.0, 0.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 65_000.0));
    }

    #[test]
    fn linear_ticks_match_d3() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 6);
        assert!((ticks[3] - 0.6).abs() < 1e-12);
        assert_eq!(LinearScale::new((0.0, 100.0), (0.0, 1.0)).ticks(10)[1], 10.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let scale = TimeScale::new((5.0, 5.0), (0.0, 200.0));
        assert_eq!(scale.scale(5.0), 100.0);
        assert_eq!(scale.invert(37.0), 5.0);
    }

    #[test]
    fn value_axis_is_inverted_with_headroom() {
        let series = PriceSeries::from_samples(vec![Sample::closing(0, 100.0), Sample::closing(1, 300.0)]);
        let dims = Dimensions::new(400.0, 300.0).with_margin(Margin::uniform(0.0));
        let scales = ChartScales::new(&series, &dims);
        // 300 + 300/3 = 400, already round
        assert_eq!(scales.value.domain(), (0.0, 400.0));
        assert_eq!(scales.value.scale(0.0), 300.0);
        assert_eq!(scales.value.scale(400.0), 0.0);
    }

    #[test]
    fn small_prices_get_no_headroom() {
        let series = PriceSeries::from_samples(vec![Sample::closing(0, 0.5), Sample::closing(1, 0.96)]);
        let scales = ChartScales::new(&series, &Dimensions::new(100.0, 100.0));
        assert_eq!(scales.value.domain(), (0.0, 1.0));
    }

    #[test]
    fn empty_series_uses_fallback_domains() {
        let scales = ChartScales::new(&PriceSeries::empty(), &Dimensions::new(100.0, 50.0));
        assert_eq!(scales.time.domain(), FALLBACK_DOMAIN);
        assert_eq!(scales.value.domain(), FALLBACK_DOMAIN);
    }

    #[test]
    fn weekly_ticks_land_on_sundays() {
        // 2021-09-13 (Monday) .. 2021-10-12
        let scale = TimeScale::new((1_631_491_200_000.0, 1_634_000_000_000.0), (0.0, 100.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 4);
        for t in ticks {
            let at = DateTime::from_timestamp_millis(t as i64).unwrap();
            assert_eq!(at.weekday(), chrono::Weekday::Sun);
            assert_eq!(at.timestamp_millis() % DAY_MS as i64, 0);
        }
    }

    #[test]
    fn quarter_ticks_land_on_quarter_starts() {
        // 2021-01-15 .. 2021-12-15
        let scale = TimeScale::new((1_610_668_800_000.0, 1_639_526_400_000.0), (0.0, 100.0));
        let ticks = scale.ticks(5);
        let months: Vec<u32> = ticks
            .iter()
            .map(|t| DateTime::from_timestamp_millis(*t as i64).unwrap().month())
            .collect();
        assert_eq!(months, vec![4, 7, 10]);
    }

    #[test]
    fn daily_ticks_are_midnight_aligned() {
        let start = 1_633_046_400_000.0 + 5.0 * HOUR_MS;
        let scale = TimeScale::new((start, start + 5.0 * DAY_MS), (0.0, 100.0));
        let ticks = scale.ticks(5);
        assert_eq!(ticks.len(), 5);
        assert!(ticks.iter().all(|t| t % DAY_MS == 0.0));
    }
}
