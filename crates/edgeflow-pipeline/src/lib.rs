//! edgeflow-pipeline: streaming Canny edge detection.
//!
//! Converts an 8-bit grayscale raster stream into a 1-bit edge map
//! through four lock-step stages:
//! Gaussian smoothing (5x5) -> Sobel gradient (3x3) -> non-maximum
//! suppression (3x3) -> threshold.
//!
//! Every pixel is processed exactly once, in scan order, with only a
//! handful of buffered rows per stage and pull-based backpressure between
//! stages; the output sequence is bit-identical under any consumer stall
//! pattern. The streaming machinery itself lives in `edgeflow-stream`;
//! this crate supplies the fixed-function compute cores and the assembled
//! chain, plus frame-level entry points over [`GrayImage`].

pub mod diagnostics;
pub mod gaussian;
pub mod gradient;
pub mod pipeline;
pub mod suppress;
pub mod threshold;
pub mod types;

use edgeflow_stream::{StreamStage, WindowStage, drive_frame};

use crate::gaussian::GaussianKernel;
use crate::gradient::SobelKernel;
use crate::suppress::SuppressKernel;
use crate::threshold::ThresholdStage;

pub use crate::diagnostics::PipelineDiagnostics;
pub use crate::gradient::{Direction, GradientSample};
pub use crate::pipeline::EdgePipeline;
pub use crate::types::{EdgeConfig, FrameGeometry, GrayImage, PipelineError, StagedResult};

/// Run the full streaming pipeline over a grayscale image, returning the
/// binary edge map (255 for edge pixels, 0 for background).
///
/// Output dimensions always equal input dimensions; boundary windows use
/// clamp-to-edge replication rather than cropping.
///
/// # Errors
///
/// Returns [`PipelineError::Geometry`] for an empty image.
pub fn detect_edges(image: &GrayImage, threshold: u8) -> Result<GrayImage, PipelineError> {
    let config = EdgeConfig::new(image.width(), image.height()).with_threshold(threshold);
    let mut pipeline = EdgePipeline::new(&config)?;
    let decisions = pipeline.run_frame(image.as_raw())?;
    let bytes: Vec<u8> = decisions
        .iter()
        .map(|&edge| if edge { 255 } else { 0 })
        .collect();
    gray_from_vec(image.width(), image.height(), bytes)
}

/// Run the pipeline stage by stage, preserving every intermediate frame.
///
/// Each stage streams over the previous stage's full output. The pixel
/// values are identical to [`detect_edges`]; only the interleaving of
/// work differs, which is the point: it makes every step previewable.
///
/// # Errors
///
/// Returns [`PipelineError::Geometry`] for an empty image.
pub fn detect_edges_staged(image: &GrayImage, threshold: u8) -> Result<StagedResult, PipelineError> {
    let geometry = FrameGeometry::new(image.width(), image.height())?;

    let mut smoothing = WindowStage::<GaussianKernel, 5>::new(geometry, GaussianKernel);
    let smoothed = run_stage(&mut smoothing, geometry, image.as_raw())?;

    let mut gradient_stage = WindowStage::<SobelKernel, 3>::new(geometry, SobelKernel);
    let gradient = run_stage(&mut gradient_stage, geometry, &smoothed)?;

    let mut suppression = WindowStage::<SuppressKernel, 3>::new(geometry, SuppressKernel);
    let suppressed = run_stage(&mut suppression, geometry, &gradient)?;

    let mut threshold_stage = ThresholdStage::new(threshold);
    let decisions = run_stage(&mut threshold_stage, geometry, &suppressed)?;
    let edges: Vec<u8> = decisions
        .iter()
        .map(|&edge| if edge { 255 } else { 0 })
        .collect();

    Ok(StagedResult {
        smoothed: gray_from_vec(geometry.width, geometry.height, smoothed)?,
        gradient,
        suppressed: gray_from_vec(geometry.width, geometry.height, suppressed)?,
        edges: gray_from_vec(geometry.width, geometry.height, edges)?,
        geometry,
    })
}

/// Stream one full frame through a single stage with an always-ready
/// consumer, returning the payloads in emission order.
fn run_stage<S: StreamStage>(
    stage: &mut S,
    geometry: FrameGeometry,
    input: &[S::Input],
) -> Result<Vec<S::Output>, PipelineError> {
    let tokens = drive_frame(stage, geometry, input, |_| true)?;
    Ok(tokens.into_iter().map(|token| token.data).collect())
}

fn gray_from_vec(width: u32, height: u32, bytes: Vec<u8>) -> Result<GrayImage, PipelineError> {
    GrayImage::from_raw(width, height, bytes).ok_or(PipelineError::FrameAssembly)
}
