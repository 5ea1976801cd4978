//! Clamp-to-edge boundary replication.
//!
//! Window taps that fall outside the frame are remapped to the nearest
//! in-frame row or column before any sample is read; no data is copied.
//! The same function serves both axes, so corner taps pick up both
//! remappings. Output frame size is consequently unchanged by windowing.

/// Index of the tap at signed `offset` from `center`, clamped to
/// `[0, extent)`.
///
/// `center` is the true row/column index of the window center and must lie
/// inside the frame; `extent` is the frame height or width respectively.
#[must_use]
pub fn clamped_tap(center: u32, offset: i32, extent: u32) -> u32 {
    let last = extent - 1;
    let magnitude = offset.unsigned_abs();
    if offset < 0 {
        center.saturating_sub(magnitude).min(last)
    } else {
        center.saturating_add(magnitude).min(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_taps_pass_through() {
        assert_eq!(clamped_tap(5, -2, 10), 3);
        assert_eq!(clamped_tap(5, 0, 10), 5);
        assert_eq!(clamped_tap(5, 2, 10), 7);
    }

    #[test]
    fn left_edge_replicates_first_index() {
        assert_eq!(clamped_tap(0, -1, 10), 0);
        assert_eq!(clamped_tap(0, -2, 10), 0);
        assert_eq!(clamped_tap(1, -2, 10), 0);
    }

    #[test]
    fn right_edge_replicates_last_index() {
        assert_eq!(clamped_tap(9, 1, 10), 9);
        assert_eq!(clamped_tap(9, 2, 10), 9);
        assert_eq!(clamped_tap(8, 2, 10), 9);
    }

    #[test]
    fn single_element_extent_always_maps_to_zero() {
        assert_eq!(clamped_tap(0, -2, 1), 0);
        assert_eq!(clamped_tap(0, 2, 1), 0);
    }
}
