pub mod asset_select;
pub mod chart;
pub mod controls;
pub mod stats;

pub use asset_select::AssetSelect;
pub use chart::PriceChart;
pub use controls::{ColorModeToggle, TimespanPicker};
pub use stats::{StatArrow, StatCard, StatGroup};
