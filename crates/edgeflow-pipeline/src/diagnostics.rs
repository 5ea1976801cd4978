//! Pipeline diagnostics: per-stage counters collected on every run.
//!
//! These diagnostics are permanent instrumentation intended for
//! verification and tuning. Every [`EdgePipeline`](crate::EdgePipeline)
//! accumulates them as it runs; the bench CLI serializes a snapshot as
//! JSON.

use std::fmt::Write as _;

use edgeflow_stream::StageCounters;
use serde::{Deserialize, Serialize};

/// Snapshot of pipeline instrumentation.
///
/// For a cleanly completed frame every stage reports the same accepted
/// and emitted sample counts (one per pixel); differing counts mean a
/// frame is still in flight or was abandoned mid-stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Configured frame width in pixels.
    pub width: u32,
    /// Configured frame height in pixels.
    pub height: u32,
    /// Threshold register value at collection time.
    pub threshold: u8,
    /// Gaussian smoothing stage counters.
    pub smoothing: StageCounters,
    /// Sobel gradient stage counters.
    pub gradient: StageCounters,
    /// Non-maximum suppression stage counters.
    pub suppression: StageCounters,
    /// Threshold stage counters.
    pub thresholding: StageCounters,
}

impl PipelineDiagnostics {
    /// Render a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "frame: {}x{}  threshold: {}",
            self.width, self.height, self.threshold,
        );
        let _ = writeln!(
            out,
            "{:<14} {:>10} {:>10} {:>9} {:>9} {:>9} {:>7} {:>9}",
            "stage", "accepted", "emitted", "stalled", "starved", "injected", "frames", "abandoned",
        );
        for (name, counters) in [
            ("smoothing", &self.smoothing),
            ("gradient", &self.gradient),
            ("suppression", &self.suppression),
            ("thresholding", &self.thresholding),
        ] {
            let _ = writeln!(
                out,
                "{:<14} {:>10} {:>10} {:>9} {:>9} {:>9} {:>7} {:>9}",
                name,
                counters.samples_accepted,
                counters.samples_emitted,
                counters.stalled_ticks,
                counters.starved_ticks,
                counters.injected_ticks,
                counters.frames_completed,
                counters.frames_abandoned,
            );
        }
        out
    }
}
