//! Per-stage instrumentation counters.
//!
//! These counters are permanent instrumentation, collected on every run and
//! surfaced through the pipeline diagnostics; they never influence the data
//! path.

use serde::{Deserialize, Serialize};

/// Counters maintained by every stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounters {
    /// Real input samples accepted.
    pub samples_accepted: u64,
    /// Output samples emitted.
    pub samples_emitted: u64,
    /// Ticks held because the consumer was not ready for a scheduled output.
    pub stalled_ticks: u64,
    /// Ticks held because a real sample was needed and none was offered.
    pub starved_ticks: u64,
    /// Pad/drain ticks that advanced the compute path on synthetic samples.
    pub injected_ticks: u64,
    /// Frames fully emitted and drained.
    pub frames_completed: u64,
    /// Frames abandoned by a mid-frame frame-start marker.
    pub frames_abandoned: u64,
}
