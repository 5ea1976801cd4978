//! Shared types for the edgeflow pipeline crate.

use serde::{Deserialize, Serialize};

use crate::gradient::GradientSample;
use crate::threshold;

pub use edgeflow_stream::{FrameGeometry, GeometryError};

/// Re-export `GrayImage` so downstream crates can reference frame data
/// without depending on `image` directly.
pub use image::GrayImage;

/// Configuration for the streaming edge pipeline.
///
/// The frame geometry is fixed for the lifetime of a pipeline; only the
/// threshold register is runtime-writable (see
/// [`EdgePipeline::set_threshold`](crate::EdgePipeline::set_threshold)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Edge decision threshold.
    pub threshold: u8,
}

impl EdgeConfig {
    /// Default edge decision threshold.
    pub const DEFAULT_THRESHOLD: u8 = threshold::DEFAULT_THRESHOLD;

    /// Configuration for a frame size, with the default threshold.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// The same configuration with a different threshold.
    #[must_use]
    pub const fn with_threshold(self, threshold: u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            threshold,
        }
    }

    /// Validated frame geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if either dimension is zero.
    pub const fn geometry(&self) -> Result<FrameGeometry, GeometryError> {
        FrameGeometry::new(self.width, self.height)
    }
}

/// Errors that can occur while running the edge pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The configured frame geometry is invalid.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Driving a frame through the pipeline failed.
    #[error(transparent)]
    Drive(#[from] edgeflow_stream::DriveError),

    /// A stage returned a frame that does not match the source dimensions.
    #[error("assembled frame did not match the source dimensions")]
    FrameAssembly,
}

/// Every stage's full-frame output, preserved for inspection.
///
/// Produced by [`detect_edges_staged`](crate::detect_edges_staged); the
/// bench CLI writes each field as an image so every step of the chain can
/// be previewed.
#[derive(Debug, Clone)]
pub struct StagedResult {
    /// Stage 1: Gaussian-smoothed frame.
    pub smoothed: GrayImage,
    /// Stage 2: gradient magnitude and direction per pixel, raster order.
    pub gradient: Vec<GradientSample>,
    /// Stage 3: non-maximum-suppressed magnitudes.
    pub suppressed: GrayImage,
    /// Stage 4: binary edge map (255 for edges, 0 for background).
    pub edges: GrayImage,
    /// Frame geometry shared by all stages.
    pub geometry: FrameGeometry,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = EdgeConfig::new(64, 48);
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 48);
        assert_eq!(config.threshold, EdgeConfig::DEFAULT_THRESHOLD);
    }

    #[test]
    fn with_threshold_replaces_only_the_threshold() {
        let config = EdgeConfig::new(10, 10).with_threshold(200);
        assert_eq!(config.threshold, 200);
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 10);
    }

    #[test]
    fn geometry_validation_propagates() {
        assert!(EdgeConfig::new(0, 10).geometry().is_err());
        assert!(EdgeConfig::new(10, 10).geometry().is_ok());
    }

    #[test]
    fn config_serde_round_trip() {
        let config = EdgeConfig::new(128, 96).with_threshold(77);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EdgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn error_display_strings() {
        let err = PipelineError::FrameAssembly;
        assert_eq!(
            err.to_string(),
            "assembled frame did not match the source dimensions",
        );
        let err: PipelineError = GeometryError::ZeroWidth.into();
        assert_eq!(err.to_string(), "frame width must be nonzero");
    }
}
