//! Non-maximum suppression core: edge thinning along the gradient.
//!
//! Each 3x3 magnitude window is compared against the two neighbors
//! selected by the center sample's direction; only local maxima survive,
//! thinning ridges to a single pixel perpendicular to the edge.

use edgeflow_stream::WindowKernel;

use crate::gradient::{Direction, GradientSample};

/// The two window positions compared against the center for a direction
/// sector, as `(row, column)` indices into the 3x3 window.
///
/// | sector | neighbor pair |
/// |--------|---------------|
/// | 0, 7   | west, east    |
/// | 1, 2   | north-east, south-west |
/// | 3, 4   | north, south  |
/// | 5, 6   | north-west, south-east |
#[must_use]
pub const fn neighbor_pair(direction: Direction) -> [(usize, usize); 2] {
    match direction.sector() {
        0 | 7 => [(1, 0), (1, 2)],
        1 | 2 => [(0, 2), (2, 0)],
        3 | 4 => [(0, 1), (2, 1)],
        _ => [(0, 0), (2, 2)],
    }
}

/// Suppression compute core.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressKernel;

impl WindowKernel<3> for SuppressKernel {
    type Input = GradientSample;
    type Output = u8;

    fn apply(&self, window: &[[GradientSample; 3]; 3]) -> u8 {
        let center = window[1][1];
        let [(row_a, col_a), (row_b, col_b)] = neighbor_pair(center.direction);
        let first = window[row_a][col_a].magnitude;
        let second = window[row_b][col_b].magnitude;
        // `>=` on both sides keeps plateaus; strict comparison would
        // erase an extended ridge entirely.
        if center.magnitude >= first && center.magnitude >= second {
            u8::try_from(center.magnitude.min(255)).unwrap_or(u8::MAX)
        } else {
            0
        }
    }
}
