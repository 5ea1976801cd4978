//! Frame geometry, fixed at configuration time.

use serde::{Deserialize, Serialize};

/// Width and height of the raster frame every stage is configured for.
///
/// The streaming engine assumes a known, fixed geometry; frames are
/// delimited on the wire only by `frame_start` markers and accepted-sample
/// counts, never by inspecting the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameGeometry {
    /// Validate and build a frame geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if either dimension is zero.
    pub const fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 {
            return Err(GeometryError::ZeroWidth);
        }
        if height == 0 {
            return Err(GeometryError::ZeroHeight);
        }
        Ok(Self { width, height })
    }

    /// Total pixels per frame.
    ///
    /// Position and pending counters throughout the engine are sized from
    /// this value, not from a line width; an undersized counter silently
    /// wraps and corrupts frame boundaries on large frames.
    #[must_use]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Invalid frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// The frame width was zero.
    #[error("frame width must be nonzero")]
    ZeroWidth,
    /// The frame height was zero.
    #[error("frame height must be nonzero")]
    ZeroHeight,
}
