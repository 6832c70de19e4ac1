pub mod dashboard;
pub mod queries;

pub use dashboard::*;
pub use queries::*;
