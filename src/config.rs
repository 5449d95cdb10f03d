use crate::error::PathError;

/// Parameters for arc-length resampling.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplingConfig {
    /// Distance between consecutive output points.
    pub spacing: f32,
    /// Subdivision density. Each segment is walked in `ceil(estimated_length * resolution * 10)` steps.
    /// Resampling fails when a segment would need more than
    /// [`MAX_SEGMENT_DIVISIONS`](crate::path::MAX_SEGMENT_DIVISIONS) steps.
    pub resolution: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            spacing: 0.1,
            resolution: 1.0,
        }
    }
}

impl SamplingConfig {
    pub fn new(spacing: f32, resolution: f32) -> SamplingConfig {
        SamplingConfig { spacing, resolution }
    }

    pub fn validate(&self) -> Result<(), PathError> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(PathError::InvalidArgument("spacing must be finite and greater than zero"));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(PathError::InvalidArgument("resolution must be finite and greater than zero"));
        }
        Ok(())
    }
}
