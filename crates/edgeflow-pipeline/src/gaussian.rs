//! Gaussian smoothing core: a fixed 5x5 integer kernel.
//!
//! Smooths the incoming pixel stream to suppress noise before gradient
//! computation. The kernel approximates a Gaussian with sigma ~ 1.0 and
//! has a total weight of exactly 256, so normalization is a right shift
//! with round-to-nearest; no saturation is needed.

use edgeflow_stream::WindowKernel;

/// The 5x5 smoothing kernel, symmetric, total weight 256.
pub const KERNEL: [[u32; 5]; 5] = [
    [1, 4, 6, 4, 1],
    [4, 16, 24, 16, 4],
    [6, 24, 36, 24, 6],
    [4, 16, 24, 16, 4],
    [1, 4, 6, 4, 1],
];

/// Total kernel weight; normalization divides by this via a shift.
pub const KERNEL_WEIGHT: u32 = 256;

// The shift-based normalization is only exact for this weight.
const _: () = {
    let mut row = 0;
    let mut total = 0;
    while row < 5 {
        let mut col = 0;
        while col < 5 {
            total += KERNEL[row][col];
            col += 1;
        }
        row += 1;
    }
    assert!(total == KERNEL_WEIGHT);
};

/// Gaussian smoothing compute core.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianKernel;

impl WindowKernel<5> for GaussianKernel {
    type Input = u8;
    type Output = u8;

    fn apply(&self, window: &[[u8; 5]; 5]) -> u8 {
        let mut sum = 0u32;
        for (kernel_row, window_row) in KERNEL.iter().zip(window) {
            for (weight, sample) in kernel_row.iter().zip(window_row) {
                sum += weight * u32::from(*sample);
            }
        }
        // Round to nearest, divide by the kernel weight. The result
        // cannot exceed 255 because the weights sum to exactly 256.
        u8::try_from((sum + KERNEL_WEIGHT / 2) >> 8).unwrap_or(u8::MAX)
    }
}
