//! Chart aggregate: scales, geometry and the hover tooltip.

pub mod geometry;
pub mod locator;
pub mod scale;
pub mod tooltip;
pub mod value_objects;

pub use geometry::*;
pub use locator::*;
pub use scale::*;
pub use tooltip::*;
pub use value_objects::*;
