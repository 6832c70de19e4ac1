use super::scale::TimeScale;
use crate::domain::market_data::Sample;

/// Sample closest in time to the pixel column `x`.
///
/// The column is inverted to a timestamp, the series is bisected for its
/// insertion point and the nearer of the two neighbours wins. A tie goes to
/// the earlier sample; columns outside the plotted range clamp to the first
/// or last sample. `series` must be sorted by strictly increasing timestamp.
pub fn nearest_sample<'a>(series: &'a [Sample], time: &TimeScale, x: f64) -> Option<&'a Sample> {
    let first = series.first()?;
    let x0 = time.invert(x);
    if !x0.is_finite() {
        return Some(first);
    }

    // bisect-left, searching from index 1
    let index = 1 + series[1..].partition_point(|s| (s.timestamp() as f64) < x0);
    let d0 = &series[index - 1];
    match series.get(index) {
        Some(d1) if x0 - d0.timestamp() as f64 > d1.timestamp() as f64 - x0 => Some(d1),
        _ => Some(d0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<Sample> {
        vec![Sample::closing(0, 1.0), Sample::closing(10, 2.0), Sample::closing(30, 3.0)]
    }

    fn scale() -> TimeScale {
        // one pixel per millisecond
        TimeScale::new((0.0, 30.0), (0.0, 30.0))
    }

    #[test]
    fn picks_nearer_neighbour() {
        let s = series();
        assert_eq!(nearest_sample(&s, &scale(), 4.0).unwrap().timestamp(), 0);
        assert_eq!(nearest_sample(&s, &scale(), 6.0).unwrap().timestamp(), 10);
        assert_eq!(nearest_sample(&s, &scale(), 21.0).unwrap().timestamp(), 30);
    }

    #[test]
    fn tie_goes_to_earlier_sample() {
        let s = series();
        assert_eq!(nearest_sample(&s, &scale(), 5.0).unwrap().timestamp(), 0);
        assert_eq!(nearest_sample(&s, &scale(), 20.0).unwrap().timestamp(), 10);
    }

    #[test]
    fn outside_range_clamps() {
        let s = series();
        assert_eq!(nearest_sample(&s, &scale(), -100.0).unwrap().timestamp(), 0);
        assert_eq!(nearest_sample(&s, &scale(), 1e6).unwrap().timestamp(), 30);
    }

    #[test]
    fn empty_and_single() {
        assert!(nearest_sample(&[], &scale(), 3.0).is_none());
        let one = [Sample::closing(7, 1.0)];
        let degenerate = TimeScale::new((7.0, 7.0), (0.0, 100.0));
        assert_eq!(nearest_sample(&one, &degenerate, 99.0).unwrap().timestamp(), 7);
    }
}
