//! Frame-level drive loop.
//!
//! Feeds a full raster frame into any [`StreamStage`] (a single stage or
//! an assembled chain), one token per tick, under an arbitrary consumer
//! readiness pattern, and collects exactly one output token per input
//! pixel. This is the software rendition of the testbench driver loop:
//! offer a sample, step the clock once, capture whatever came out.

use crate::geometry::FrameGeometry;
use crate::stage::StreamStage;
use crate::token::Token;

/// Errors from driving a frame through a stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    /// The sample slice does not match the configured frame geometry.
    #[error("sample count {actual} does not match the {width}x{height} frame ({expected} pixels)")]
    SampleCount {
        /// Samples supplied.
        actual: usize,
        /// Samples the geometry calls for.
        expected: u64,
        /// Configured frame width.
        width: u32,
        /// Configured frame height.
        height: u32,
    },
    /// The stage stopped making progress.
    ///
    /// Either the readiness pattern stalled the consumer for longer than
    /// the guard tolerates, or the stage has a control fault. Progress is
    /// defined as accepting an input or emitting an output.
    #[error("no progress for {ticks} consecutive ticks")]
    Stalled {
        /// Consecutive ticks without progress when the guard tripped.
        ticks: u64,
    },
}

/// Drive one full frame through `stage`, returning its output tokens in
/// emission order.
///
/// `sink_ready` is consulted once per tick with the tick index and models
/// the final consumer's readiness; it must return `true` with bounded gaps
/// for the frame to complete. Input tokens carry `frame_start` on the
/// first pixel and `line_end` on each row's last pixel.
///
/// # Errors
///
/// Returns [`DriveError::SampleCount`] when `samples` does not hold
/// exactly one value per pixel, and [`DriveError::Stalled`] when no
/// progress is made for an extended run of ticks.
pub fn drive_frame<S: StreamStage>(
    stage: &mut S,
    geometry: FrameGeometry,
    samples: &[S::Input],
    mut sink_ready: impl FnMut(u64) -> bool,
) -> Result<Vec<Token<S::Output>>, DriveError> {
    if samples.len() as u64 != geometry.pixel_count() {
        return Err(DriveError::SampleCount {
            actual: samples.len(),
            expected: geometry.pixel_count(),
            width: geometry.width,
            height: geometry.height,
        });
    }

    let width = geometry.width as usize;
    let stall_limit = 4 * u64::from(geometry.width) + 65_536;

    let mut outputs = Vec::with_capacity(samples.len());
    let mut cursor = 0usize;
    let mut tick = 0u64;
    let mut idle_ticks = 0u64;

    while outputs.len() < samples.len() {
        let ready = sink_ready(tick);
        let offer = (cursor < samples.len()).then(|| Token {
            data: samples[cursor],
            frame_start: cursor == 0,
            line_end: (cursor + 1) % width == 0,
        });

        let accept = offer.is_some() && stage.input_ready(ready);
        let output = stage.tick(if accept { offer } else { None }, ready);
        if accept {
            cursor += 1;
        }

        if accept || output.is_some() {
            idle_ticks = 0;
        } else {
            idle_ticks += 1;
            if idle_ticks > stall_limit {
                return Err(DriveError::Stalled { ticks: idle_ticks });
            }
        }
        if let Some(token) = output {
            outputs.push(token);
        }
        tick += 1;
    }

    Ok(outputs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A do-nothing stage that forwards tokens untouched.
    struct Passthrough;

    impl StreamStage for Passthrough {
        type Input = u8;
        type Output = u8;

        fn input_ready(&self, downstream_ready: bool) -> bool {
            downstream_ready
        }

        fn tick(
            &mut self,
            input: Option<Token<u8>>,
            _downstream_ready: bool,
        ) -> Option<Token<u8>> {
            input
        }

        fn in_flight(&self) -> bool {
            false
        }

        fn reset(&mut self) {}
    }

    /// A stage that never produces anything, for the stall guard.
    struct BlackHole;

    impl StreamStage for BlackHole {
        type Input = u8;
        type Output = u8;

        fn input_ready(&self, _downstream_ready: bool) -> bool {
            false
        }

        fn tick(
            &mut self,
            _input: Option<Token<u8>>,
            _downstream_ready: bool,
        ) -> Option<Token<u8>> {
            None
        }

        fn in_flight(&self) -> bool {
            true
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn sample_count_is_checked() {
        let geometry = FrameGeometry::new(4, 4).unwrap();
        let result = drive_frame(&mut Passthrough, geometry, &[0u8; 15], |_| true);
        assert!(matches!(
            result,
            Err(DriveError::SampleCount {
                actual: 15,
                expected: 16,
                ..
            }),
        ));
    }

    #[test]
    fn passthrough_preserves_order_and_markers() {
        let geometry = FrameGeometry::new(3, 2).unwrap();
        let samples: Vec<u8> = (10..16).collect();
        let outputs = drive_frame(&mut Passthrough, geometry, &samples, |_| true).unwrap();

        let values: Vec<u8> = outputs.iter().map(|t| t.data).collect();
        assert_eq!(values, samples);
        assert!(outputs[0].frame_start);
        assert!(outputs[2].line_end);
        assert!(outputs[5].line_end);
        assert!(!outputs[1].line_end);
    }

    #[test]
    fn stall_guard_trips_on_a_dead_stage() {
        let geometry = FrameGeometry::new(4, 4).unwrap();
        let result = drive_frame(&mut BlackHole, geometry, &[0u8; 16], |_| true);
        assert!(matches!(result, Err(DriveError::Stalled { .. })));
    }
}
