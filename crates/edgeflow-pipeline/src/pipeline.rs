//! The assembled four-stage edge pipeline.

use edgeflow_stream::{FrameGeometry, StreamStage, Token, WindowStage, drive_frame};

use crate::diagnostics::PipelineDiagnostics;
use crate::gaussian::GaussianKernel;
use crate::gradient::SobelKernel;
use crate::suppress::SuppressKernel;
use crate::threshold::ThresholdStage;
use crate::types::{EdgeConfig, PipelineError};

/// Smoothing, gradient, suppression, and threshold chained in lockstep.
///
/// All stages advance on a single global tick. Data flows forward at most
/// one token per stage boundary per tick; readiness propagates backward,
/// so a stalled consumer holds the entire upstream chain without dropping
/// or reordering a sample. The chain itself is a [`StreamStage`], so it
/// can be driven token by token or a frame at a time.
pub struct EdgePipeline {
    geometry: FrameGeometry,
    smoothing: WindowStage<GaussianKernel, 5>,
    gradient: WindowStage<SobelKernel, 3>,
    suppression: WindowStage<SuppressKernel, 3>,
    threshold: ThresholdStage,
}

impl EdgePipeline {
    /// Build a pipeline for the configured frame geometry and threshold.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Geometry`] when the configured dimensions
    /// are invalid.
    pub fn new(config: &EdgeConfig) -> Result<Self, PipelineError> {
        let geometry = config.geometry()?;
        Ok(Self {
            geometry,
            smoothing: WindowStage::new(geometry, GaussianKernel),
            gradient: WindowStage::new(geometry, SobelKernel),
            suppression: WindowStage::new(geometry, SuppressKernel),
            threshold: ThresholdStage::new(config.threshold),
        })
    }

    /// Configured frame geometry.
    #[must_use]
    pub const fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Current threshold register value.
    #[must_use]
    pub const fn threshold(&self) -> u8 {
        self.threshold.value()
    }

    /// Write the threshold register; effective from the next decision.
    pub const fn set_threshold(&mut self, value: u8) {
        self.threshold.set_value(value);
    }

    /// Read-only status flag: true while a frame is in flight anywhere in
    /// the chain.
    #[must_use]
    pub fn frame_in_flight(&self) -> bool {
        self.smoothing.in_flight()
            || self.gradient.in_flight()
            || self.suppression.in_flight()
            || self.threshold.in_flight()
    }

    /// Instrumentation snapshot, accumulated since the last reset.
    #[must_use]
    pub fn diagnostics(&self) -> PipelineDiagnostics {
        PipelineDiagnostics {
            width: self.geometry.width,
            height: self.geometry.height,
            threshold: self.threshold.value(),
            smoothing: *self.smoothing.counters(),
            gradient: *self.gradient.counters(),
            suppression: *self.suppression.counters(),
            thresholding: *self.threshold.counters(),
        }
    }

    /// Feed one frame through with an always-ready consumer, collecting
    /// one edge decision per pixel in raster order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Drive`] when `samples` does not hold one
    /// value per configured pixel.
    pub fn run_frame(&mut self, samples: &[u8]) -> Result<Vec<bool>, PipelineError> {
        self.run_frame_with_stalls(samples, |_| true)
    }

    /// Feed one frame through under an arbitrary consumer readiness
    /// pattern.
    ///
    /// The decisions are identical for every pattern; only the number of
    /// idle ticks changes.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Drive`] when `samples` does not hold one
    /// value per configured pixel, or when `sink_ready` starves the
    /// pipeline indefinitely.
    pub fn run_frame_with_stalls(
        &mut self,
        samples: &[u8],
        sink_ready: impl FnMut(u64) -> bool,
    ) -> Result<Vec<bool>, PipelineError> {
        let geometry = self.geometry;
        let tokens = drive_frame(self, geometry, samples, sink_ready)?;
        Ok(tokens.into_iter().map(|token| token.data).collect())
    }
}

impl StreamStage for EdgePipeline {
    type Input = u8;
    type Output = bool;

    fn input_ready(&self, downstream_ready: bool) -> bool {
        let threshold_ready = self.threshold.input_ready(downstream_ready);
        let suppression_ready = self.suppression.input_ready(threshold_ready);
        let gradient_ready = self.gradient.input_ready(suppression_ready);
        self.smoothing.input_ready(gradient_ready)
    }

    fn tick(
        &mut self,
        input: Option<Token<u8>>,
        downstream_ready: bool,
    ) -> Option<Token<bool>> {
        // Readiness propagates backward through the chain, then data
        // flows forward within the same tick.
        let threshold_ready = self.threshold.input_ready(downstream_ready);
        let suppression_ready = self.suppression.input_ready(threshold_ready);
        let gradient_ready = self.gradient.input_ready(suppression_ready);

        let smoothed = self.smoothing.tick(input, gradient_ready);
        let gradients = self.gradient.tick(smoothed, suppression_ready);
        let suppressed = self.suppression.tick(gradients, threshold_ready);
        self.threshold.tick(suppressed, downstream_ready)
    }

    fn in_flight(&self) -> bool {
        self.frame_in_flight()
    }

    fn reset(&mut self) {
        self.smoothing.reset();
        self.gradient.reset();
        self.suppression.reset();
        self.threshold.reset();
    }
}
