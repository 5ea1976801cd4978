//! Sobel gradient core: signed 3x3 sums, Manhattan magnitude, and 8-way
//! direction classification.
//!
//! Magnitude uses `|Gx| + |Gy|` rather than the Euclidean norm, and the
//! direction decision uses only shifts and adds; there is no multiply,
//! divide, or square root anywhere in this stage.

use edgeflow_stream::WindowKernel;
use serde::{Deserialize, Serialize};

/// Horizontal Sobel kernel (responds to vertical edges).
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical Sobel kernel (responds to horizontal edges).
pub const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Largest magnitude a gradient sample carries.
///
/// The Manhattan sum can reach 2040 and the packed field is 12 bits wide,
/// but magnitudes saturate at 255: suppression and thresholding both work
/// in 8 bits, so anything larger could never change a decision.
pub const MAGNITUDE_MAX: u16 = 255;

/// 8-way gradient direction sector, 3 bits on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction(u8);

impl Direction {
    /// Wrap a sector index; only the low three bits are meaningful.
    #[must_use]
    pub const fn new(sector: u8) -> Self {
        Self(sector & 0x07)
    }

    /// Sector index, 0-7. Sector 0 is a gradient pointing east, sectors
    /// advance counterclockwise in 45-degree steps.
    #[must_use]
    pub const fn sector(self) -> u8 {
        self.0
    }
}

/// One gradient-stage output sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientSample {
    /// `|Gx| + |Gy|`, clamped at [`MAGNITUDE_MAX`].
    pub magnitude: u16,
    /// Direction sector the gradient angle falls in.
    pub direction: Direction,
}

impl GradientSample {
    /// Pack as the 16-bit wire format: bits `[14:12]` hold the direction,
    /// `[11:0]` the magnitude.
    #[must_use]
    pub const fn pack(self) -> u16 {
        ((self.direction.sector() as u16) << 12) | (self.magnitude & 0x0FFF)
    }

    /// Unpack from the 16-bit wire format.
    #[must_use]
    pub const fn unpack(raw: u16) -> Self {
        Self {
            magnitude: raw & 0x0FFF,
            direction: Direction::new(((raw >> 12) & 0x07) as u8),
        }
    }
}

/// Classify the gradient angle into a sector using only shifts and adds.
///
/// `low ~ 0.375 * |Gx|` and `high ~ 2.375 * |Gx|` bracket tan(22.5 deg)
/// and tan(67.5 deg).
const fn classify(gx: i32, gy: i32) -> Direction {
    let ax = gx.unsigned_abs();
    let ay = gy.unsigned_abs();
    let low = (ax >> 2) + (ax >> 3);
    let high = (ax << 1) + (ax >> 2) + (ax >> 3);
    let sector = if gx > 0 {
        if gy >= 0 {
            if ay <= low {
                0
            } else if ay < high {
                1
            } else {
                2
            }
        } else if ay <= low {
            0
        } else if ay < high {
            7
        } else {
            6
        }
    } else if gx < 0 {
        if gy >= 0 {
            if ay <= low {
                4
            } else if ay < high {
                3
            } else {
                2
            }
        } else if ay <= low {
            4
        } else if ay < high {
            5
        } else {
            6
        }
    } else if gy > 0 {
        2
    } else if gy < 0 {
        6
    } else {
        0
    };
    Direction::new(sector)
}

/// Sobel gradient compute core.
#[derive(Debug, Clone, Copy, Default)]
pub struct SobelKernel;

impl WindowKernel<3> for SobelKernel {
    type Input = u8;
    type Output = GradientSample;

    fn apply(&self, window: &[[u8; 3]; 3]) -> GradientSample {
        let mut gx = 0i32;
        let mut gy = 0i32;
        for row in 0..3 {
            for col in 0..3 {
                let sample = i32::from(window[row][col]);
                gx += sample * SOBEL_X[row][col];
                gy += sample * SOBEL_Y[row][col];
            }
        }
        let manhattan = gx.unsigned_abs() + gy.unsigned_abs();
        let magnitude =
            u16::try_from(manhattan.min(u32::from(MAGNITUDE_MAX))).unwrap_or(MAGNITUDE_MAX);
        GradientSample {
            magnitude,
            direction: classify(gx, gy),
        }
    }
}
