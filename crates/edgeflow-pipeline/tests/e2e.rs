//! End-to-end scenarios for the assembled streaming pipeline.
//!
//! The streamed results are checked against an independent reference
//! model: a plain nested-loop convolution with clamp-to-edge windows,
//! applying the same compute cores. Any divergence in sequencing,
//! padding, draining, or backpressure handling shows up as a pixel
//! mismatch.

#![allow(clippy::unwrap_used)]

use edgeflow_pipeline::gaussian::GaussianKernel;
use edgeflow_pipeline::gradient::SobelKernel;
use edgeflow_pipeline::suppress::SuppressKernel;
use edgeflow_pipeline::{EdgeConfig, EdgePipeline, GradientSample, detect_edges_staged};
use edgeflow_stream::{FrameGeometry, WindowKernel, clamped_tap};

// ---------------------------------------------------------------------------
// Reference model
// ---------------------------------------------------------------------------

/// Apply one compute core over every pixel with clamp-to-edge windows.
fn reference_stage<C: WindowKernel<K>, const K: usize>(
    kernel: &C,
    geometry: FrameGeometry,
    input: &[C::Input],
) -> Vec<C::Output> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let half = (K as i32 - 1) / 2;
    let mut output = Vec::with_capacity(input.len());
    for row in 0..geometry.height {
        for col in 0..geometry.width {
            let mut window = [[C::Input::default(); K]; K];
            for (wr, window_row) in window.iter_mut().enumerate() {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let src_row = clamped_tap(row, wr as i32 - half, geometry.height);
                for (wc, tap) in window_row.iter_mut().enumerate() {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    let src_col = clamped_tap(col, wc as i32 - half, geometry.width);
                    *tap = input[(src_row * geometry.width + src_col) as usize];
                }
            }
            output.push(kernel.apply(&window));
        }
    }
    output
}

/// The full reference chain: smooth, gradient, suppress, threshold.
fn reference_edges(geometry: FrameGeometry, frame: &[u8], threshold: u8) -> Vec<bool> {
    let smoothed = reference_stage(&GaussianKernel, geometry, frame);
    let gradient = reference_stage(&SobelKernel, geometry, &smoothed);
    let suppressed = reference_stage(&SuppressKernel, geometry, &gradient);
    suppressed.iter().map(|&m| m >= threshold).collect()
}

fn test_frame(geometry: FrameGeometry) -> Vec<u8> {
    (0..geometry.pixel_count())
        .map(|i| ((i * 211 + 17) % 256) as u8)
        .collect()
}

fn gray(geometry: FrameGeometry, bytes: &[u8]) -> edgeflow_pipeline::GrayImage {
    edgeflow_pipeline::GrayImage::from_raw(geometry.width, geometry.height, bytes.to_vec())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Bit-exactness against the reference model
// ---------------------------------------------------------------------------

#[test]
fn streamed_chain_matches_reference_model() {
    for (width, height) in [(7, 7), (13, 9), (5, 16), (23, 4)] {
        let geometry = FrameGeometry::new(width, height).unwrap();
        let frame = test_frame(geometry);

        let mut pipeline = EdgePipeline::new(&EdgeConfig::new(width, height)).unwrap();
        let streamed = pipeline.run_frame(&frame).unwrap();

        let reference = reference_edges(geometry, &frame, EdgeConfig::DEFAULT_THRESHOLD);
        assert_eq!(streamed, reference, "mismatch on {width}x{height}");
    }
}

#[test]
fn staged_stages_match_reference_model() {
    let geometry = FrameGeometry::new(11, 8).unwrap();
    let frame = test_frame(geometry);
    let staged = detect_edges_staged(&gray(geometry, &frame), 50).unwrap();

    let smoothed = reference_stage(&GaussianKernel, geometry, &frame);
    assert_eq!(staged.smoothed.as_raw(), &smoothed);

    let gradient: Vec<GradientSample> = reference_stage(&SobelKernel, geometry, &smoothed);
    assert_eq!(staged.gradient, gradient);

    let suppressed = reference_stage(&SuppressKernel, geometry, &gradient);
    assert_eq!(staged.suppressed.as_raw(), &suppressed);
}

// ---------------------------------------------------------------------------
// Backpressure invariance
// ---------------------------------------------------------------------------

#[test]
fn consumer_stall_patterns_never_change_the_decisions() {
    let geometry = FrameGeometry::new(10, 10).unwrap();
    let frame = test_frame(geometry);
    let config = EdgeConfig::new(10, 10);

    let mut pipeline = EdgePipeline::new(&config).unwrap();
    let reference = pipeline.run_frame(&frame).unwrap();

    let patterns: [(&str, fn(u64) -> bool); 4] = [
        ("every other tick", |t| t % 2 == 0),
        ("bursts of seven", |t| t % 10 < 7),
        ("long stalls", |t| t % 50 > 12),
        ("prime-ish jitter", |t| (t * t + 3 * t) % 5 != 0),
    ];
    for (name, pattern) in patterns {
        let mut pipeline = EdgePipeline::new(&config).unwrap();
        let stalled = pipeline.run_frame_with_stalls(&frame, pattern).unwrap();
        assert_eq!(stalled, reference, "pattern '{name}' changed the output");
    }
}

#[test]
fn stall_exactly_at_row_boundaries_keeps_rows_aligned() {
    let geometry = FrameGeometry::new(8, 8).unwrap();
    let frame = test_frame(geometry);
    let config = EdgeConfig::new(8, 8);

    let mut pipeline = EdgePipeline::new(&config).unwrap();
    let reference = pipeline.run_frame(&frame).unwrap();

    // Hold the consumer for a few ticks at every multiple of the row
    // length; a row-buffer write decoupled from the compute enable shifts
    // whole rows here and nowhere else.
    let width = u64::from(geometry.width);
    let mut pipeline = EdgePipeline::new(&config).unwrap();
    let stalled = pipeline
        .run_frame_with_stalls(&frame, move |tick| tick % width != 0 || tick == 0)
        .unwrap();
    assert_eq!(stalled, reference);
}

// ---------------------------------------------------------------------------
// Spec scenarios: flat frame and single bright point
// ---------------------------------------------------------------------------

#[test]
fn all_zero_frame_is_zero_at_every_stage() {
    let geometry = FrameGeometry::new(5, 5).unwrap();
    let frame = vec![0u8; 25];
    let staged = detect_edges_staged(&gray(geometry, &frame), 50).unwrap();

    assert!(staged.smoothed.as_raw().iter().all(|&v| v == 0));
    assert!(staged.gradient.iter().all(|g| g.magnitude == 0));
    assert!(staged.suppressed.as_raw().iter().all(|&v| v == 0));
    assert!(staged.edges.as_raw().iter().all(|&v| v == 0));
}

#[test]
fn single_bright_point_smooths_into_a_bounded_blob() {
    let geometry = FrameGeometry::new(7, 7).unwrap();
    let mut frame = vec![0u8; 49];
    frame[3 * 7 + 3] = 255;
    let staged = detect_edges_staged(&gray(geometry, &frame), 50).unwrap();

    let smoothed = |r: i32, c: i32| staged.smoothed.as_raw()[(r * 7 + c) as usize];

    // The kernel center weight is 36/256.
    assert_eq!(smoothed(3, 3), 36);
    // Immediate neighbors pick up the 24/256 and 16/256 weights.
    assert_eq!(smoothed(3, 2), 24);
    assert_eq!(smoothed(2, 2), 16);
    // Chebyshev distance 2 still sees the kernel skirt...
    assert_eq!(smoothed(3, 1), 6);
    assert_eq!(smoothed(1, 1), 1);
    // ...and distance 3 or more sees nothing.
    for r in 0..7i32 {
        for c in 0..7i32 {
            if (r - 3).abs().max((c - 3).abs()) >= 3 {
                assert_eq!(smoothed(r, c), 0, "expected zero at ({r}, {c})");
            }
        }
    }
}

#[test]
fn single_bright_point_produces_ring_then_thinned_edges() {
    let geometry = FrameGeometry::new(7, 7).unwrap();
    let mut frame = vec![0u8; 49];
    frame[3 * 7 + 3] = 255;
    let staged = detect_edges_staged(&gray(geometry, &frame), 50).unwrap();

    let magnitude =
        |r: u32, c: u32| staged.gradient[(r * 7 + c) as usize].magnitude;

    // Dead center the window is symmetric: zero gradient.
    assert_eq!(magnitude(3, 3), 0);
    // A ring of nonzero magnitude surrounds the blob.
    for (r, c) in [(3, 2), (3, 4), (2, 3), (4, 3), (2, 2), (4, 4)] {
        assert!(magnitude(r, c) > 0, "expected gradient at ({r}, {c})");
    }

    // Suppression keeps a subset of the gradient's nonzero pixels.
    let gradient_nonzero = staged.gradient.iter().filter(|g| g.magnitude > 0).count();
    let suppressed_nonzero = staged
        .suppressed
        .as_raw()
        .iter()
        .filter(|&&v| v > 0)
        .count();
    assert!(suppressed_nonzero > 0, "suppression erased everything");
    assert!(
        suppressed_nonzero < gradient_nonzero,
        "suppression thinned nothing ({suppressed_nonzero} of {gradient_nonzero})",
    );

    // The edge map is exactly the suppressed pixels above threshold.
    for (i, &v) in staged.suppressed.as_raw().iter().enumerate() {
        let expected = u8::from(v >= 50) * 255;
        assert_eq!(staged.edges.as_raw()[i], expected, "pixel {i}");
    }
}

// ---------------------------------------------------------------------------
// Dimension preservation
// ---------------------------------------------------------------------------

#[test]
fn output_count_matches_input_for_odd_shapes() {
    for (width, height) in [(1, 1), (1, 9), (9, 1), (2, 2), (3, 31), (31, 3)] {
        let geometry = FrameGeometry::new(width, height).unwrap();
        let frame = test_frame(geometry);
        let mut pipeline = EdgePipeline::new(&EdgeConfig::new(width, height)).unwrap();
        let decisions = pipeline.run_frame(&frame).unwrap();
        assert_eq!(
            decisions.len() as u64,
            geometry.pixel_count(),
            "wrong output count for {width}x{height}",
        );

        // And the values still match the reference model.
        let reference = reference_edges(geometry, &frame, EdgeConfig::DEFAULT_THRESHOLD);
        assert_eq!(decisions, reference, "mismatch on {width}x{height}");
    }
}
