use asset_dashboard::domain::chart::{LinearScale, TimeScale, nearest_sample};
use asset_dashboard::domain::market_data::{PriceSeries, Sample};
use quickcheck_macros::quickcheck;

const WIDTH: f64 = 800.0;
const START_MS: i64 = 1_633_046_400_000;

/// Strictly increasing timestamps built from positive gaps.
fn series_from_gaps(gaps: &[u16]) -> PriceSeries {
    let mut t = START_MS;
    let mut samples = vec![Sample::closing(t, 1.0)];
    for (i, gap) in gaps.iter().take(60).enumerate() {
        t += *gap as i64 + 1;
        samples.push(Sample::closing(t, 2.0 + i as f64));
    }
    PriceSeries::from_samples(samples)
}

fn time_scale(series: &PriceSeries) -> TimeScale {
    let (t0, t1) = series.time_extent().expect("non-empty");
    TimeScale::new((t0 as f64, t1 as f64), (0.0, WIDTH))
}

#[quickcheck]
fn exact_pixel_returns_that_sample(gaps: Vec<u16>) -> bool {
    let series = series_from_gaps(&gaps);
    let scale = time_scale(&series);
    series.samples().iter().all(|sample| {
        let x = scale.scale(sample.timestamp() as f64);
        nearest_sample(series.samples(), &scale, x).map(|s| s.timestamp()) == Some(sample.timestamp())
    })
}

#[quickcheck]
fn between_samples_picks_the_closer_one(gaps: Vec<u16>, frac: u8) -> bool {
    let series = series_from_gaps(&gaps);
    let scale = time_scale(&series);
    // keep clear of the midpoint, ties are covered separately
    let frac = (frac % 100) as f64 / 100.0;
    if (frac - 0.5).abs() < 0.05 {
        return true;
    }
    series.samples().windows(2).all(|pair| {
        let (a, b) = (pair[0].timestamp() as f64, pair[1].timestamp() as f64);
        let x = scale.scale(a + (b - a) * frac);
        let expected = if frac < 0.5 { pair[0] } else { pair[1] };
        nearest_sample(series.samples(), &scale, x).map(|s| s.timestamp()) == Some(expected.timestamp())
    })
}

#[test]
fn exact_midpoint_goes_to_earlier_sample() {
    let series = PriceSeries::from_samples(vec![
        Sample::closing(0, 1.0),
        Sample::closing(256, 2.0),
        Sample::closing(512, 3.0),
        Sample::closing(1_024, 4.0),
    ]);
    // 1 px per 2 ms keeps every midpoint on an exact pixel
    let scale = TimeScale::new((0.0, 1_024.0), (0.0, 512.0));
    let at = |x: f64| nearest_sample(series.samples(), &scale, x).map(|s| s.timestamp());
    assert_eq!(at(64.0), Some(0));
    assert_eq!(at(192.0), Some(256));
    assert_eq!(at(384.0), Some(512));
    assert_eq!(at(384.5), Some(1_024));
}

#[quickcheck]
fn time_scale_is_monotonic(a: i32, b: i32) -> bool {
    let scale = TimeScale::new((START_MS as f64, START_MS as f64 + 86_400_000.0), (40.0, WIDTH - 40.0));
    let (a, b) = (START_MS as f64 + a as f64, START_MS as f64 + b as f64);
    (a <= b) == (scale.scale(a) <= scale.scale(b))
}

#[quickcheck]
fn value_scale_is_monotonic_and_flipped(a: u32, b: u32) -> bool {
    // pixel rows grow downwards, so a larger price sits higher on screen
    let scale = LinearScale::new((0.0, 65_000.0), (400.0, 20.0)).nice(10);
    let (a, b) = (a as f64 / 1_000.0, b as f64 / 1_000.0);
    (a <= b) == (scale.scale(a) >= scale.scale(b))
}

#[test]
fn empty_series_has_no_nearest_sample() {
    let scale = TimeScale::new((0.0, 1.0), (0.0, WIDTH));
    assert!(nearest_sample(&[], &scale, 12.0).is_none());
}
