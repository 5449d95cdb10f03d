pub mod config;
pub mod error;
mod export;
pub mod geometry_utilities;
pub mod path;

pub use config::SamplingConfig;
pub use error::PathError;
pub use path::{BezierPath, PointType};
