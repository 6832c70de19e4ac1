//! Market data aggregate: wire payloads, the sampled price series and request parameters.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
