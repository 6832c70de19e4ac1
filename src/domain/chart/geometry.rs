//! Drawable geometry for the area chart: closed area path, grid lines.
//!
//! Paths are emitted as SVG path data with coordinates rounded to 1/100 px.

use std::fmt::Write;

use super::scale::ChartScales;
use super::value_objects::Dimensions;
use crate::domain::market_data::PriceSeries;

pub const GRID_ROW_COUNT: usize = 10;
pub const GRID_COLUMN_COUNT: usize = 10;

fn fmt_px(v: f64) -> f64 {
    // + 0.0 folds -0 into 0
    (v * 100.0).round() / 100.0 + 0.0
}

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at the middle point of three (monotone cubic interpolation).
fn slope3(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (p1.1 - p0.1) / h0;
    let s1 = (p2.1 - p1.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

/// One-sided tangent at an end point given the neighbour's tangent.
fn slope2(p0: (f64, f64), p1: (f64, f64), t: f64) -> f64 {
    let h = p1.0 - p0.0;
    if h == 0.0 { t } else { (3.0 * (p1.1 - p0.1) / h - t) / 2.0 }
}

/// SVG path data for a monotone-in-x curve through `points`.
pub fn monotone_x_line(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    let Some(&(x0, y0)) = points.first() else {
        return d;
    };
    let _ = write!(d, "M{},{}", fmt_px(x0), fmt_px(y0));

    match points.len() {
        1 => return d,
        2 => {
            let (x1, y1) = points[1];
            let _ = write!(d, "L{},{}", fmt_px(x1), fmt_px(y1));
            return d;
        }
        _ => {}
    }

    let n = points.len();
    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = slope2(points[0], points[1], tangents[1]);
    tangents[n - 1] = slope2(points[n - 2], points[n - 1], tangents[n - 2]);

    for i in 0..n - 1 {
        let (xa, ya) = points[i];
        let (xb, yb) = points[i + 1];
        let dx = (xb - xa) / 3.0;
        let _ = write!(
            d,
            "C{},{},{},{},{},{}",
            fmt_px(xa + dx),
            fmt_px(ya + dx * tangents[i]),
            fmt_px(xb - dx),
            fmt_px(yb - dx * tangents[i + 1]),
            fmt_px(xb),
            fmt_px(yb)
        );
    }
    d
}

/// Curve through `points` closed down to the horizontal `baseline`.
pub fn closed_area(points: &[(f64, f64)], baseline: f64) -> String {
    let (Some(&(first_x, _)), Some(&(last_x, _))) = (points.first(), points.last()) else {
        return String::new();
    };
    let mut d = monotone_x_line(points);
    let _ = write!(
        d,
        "L{},{}L{},{}Z",
        fmt_px(last_x),
        fmt_px(baseline),
        fmt_px(first_x),
        fmt_px(baseline)
    );
    d
}

/// Everything the renderer draws for one series at one size
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub dims: Dimensions,
    pub scales: ChartScales,
    pub area_path: String,
    /// Vertical pixel of each horizontal grid line.
    pub grid_rows: Vec<f64>,
    /// Horizontal pixel of each vertical grid line.
    pub grid_columns: Vec<f64>,
}

impl ChartGeometry {
    pub fn new(series: &PriceSeries, dims: Dimensions) -> Self {
        let scales = ChartScales::new(series, &dims);
        let points: Vec<(f64, f64)> =
            series.samples().iter().map(|s| scales.point(s.timestamp(), s.close())).collect();
        // the area closes on the bottom edge of the value range
        let baseline = scales.value.range().0;

        let grid_rows = if series.is_empty() {
            Vec::new()
        } else {
            scales.value.ticks(GRID_ROW_COUNT).into_iter().map(|v| scales.value.scale(v)).collect()
        };
        let grid_columns = if series.is_empty() {
            Vec::new()
        } else {
            scales.time.ticks(GRID_COLUMN_COUNT).into_iter().map(|t| scales.time.scale(t)).collect()
        };

        Self { dims, scales, area_path: closed_area(&points, baseline), grid_rows, grid_columns }
    }

    pub fn plot_top(&self) -> f64 {
        self.dims.margin.top
    }

    pub fn plot_bottom(&self) -> f64 {
        self.dims.margin.top + self.dims.inner_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotone_curve_keeps_peak_flat() {
        let d = monotone_x_line(&[(0.0, 60.0), (30.0, 0.0), (60.0, 60.0)]);
        assert_eq!(d, "M0,60C10,30,20,0,30,0C40,0,50,30,60,60");
    }

    #[test]
    fn empty_points_give_empty_path() {
        assert_eq!(closed_area(&[], 10.0), "");
    }

    #[test]
    fn single_point_area_is_a_vertical_segment() {
        assert_eq!(closed_area(&[(5.0, 2.0)], 10.0), "M5,2L5,10L5,10Z");
    }

    #[test]
    fn empty_series_draws_no_grid() {
        let geometry = ChartGeometry::new(&PriceSeries::empty(), Dimensions::new(200.0, 100.0));
        assert!(geometry.area_path.is_empty());
        assert!(geometry.grid_rows.is_empty());
        assert!(geometry.grid_columns.is_empty());
    }
}
