#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("point index {index} is out of range for a path with {len} points")]
    InvalidIndex { index: usize, len: usize },
    #[error("segment index {index} is out of range for a path with {count} segments")]
    InvalidSegment { index: usize, count: usize },
    #[error("point {index} is a control point, expected an anchor")]
    NotAnAnchor { index: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
