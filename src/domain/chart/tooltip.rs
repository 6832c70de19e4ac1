use super::locator::nearest_sample;
use super::scale::ChartScales;
use crate::domain::market_data::Sample;

/// Tooltip anchored to one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub sample: Sample,
    /// Raw pointer column.
    pub left: f64,
    /// Vertical pixel of the sample's close.
    pub top: f64,
}

/// Hover state of the chart's interaction layer.
///
/// Has no lifecycle of its own: every pointer event recomputes it from the
/// pointer position and the loaded series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TooltipState {
    #[default]
    Idle,
    Hovering(Tooltip),
}

impl TooltipState {
    /// Pointer entered or moved over the plot.
    pub fn pointer_move(series: &[Sample], scales: &ChartScales, x: f64) -> Self {
        match nearest_sample(series, &scales.time, x) {
            Some(sample) => TooltipState::Hovering(Tooltip {
                sample: *sample,
                left: x,
                top: scales.value.scale(sample.close()),
            }),
            None => TooltipState::Idle,
        }
    }

    pub fn pointer_leave() -> Self {
        TooltipState::Idle
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        match self {
            TooltipState::Hovering(tooltip) => Some(tooltip),
            TooltipState::Idle => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, TooltipState::Hovering(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::value_objects::Dimensions;
    use crate::domain::market_data::PriceSeries;

    #[test]
    fn move_then_leave() {
        let series = PriceSeries::from_samples(vec![Sample::closing(0, 10.0), Sample::closing(100, 20.0)]);
        let scales = ChartScales::new(&series, &Dimensions::new(100.0, 40.0));

        let state = TooltipState::pointer_move(series.samples(), &scales, 90.0);
        let tooltip = state.tooltip().expect("hovering");
        assert_eq!(tooltip.sample.timestamp(), 100);
        assert_eq!(tooltip.left, 90.0);
        assert_eq!(tooltip.top, scales.value.scale(20.0));

        assert!(!TooltipState::pointer_leave().is_visible());
    }

    #[test]
    fn empty_series_stays_idle() {
        let series = PriceSeries::empty();
        let scales = ChartScales::new(&series, &Dimensions::new(100.0, 40.0));
        assert_eq!(TooltipState::pointer_move(series.samples(), &scales, 50.0), TooltipState::Idle);
    }
}
