//! edgeflow-stream: the streaming dataflow engine behind edgeflow (sans-IO).
//!
//! Implements windowed convolution over an unbounded raster stream using
//! only a handful of buffered rows:
//!
//! - [`Token`]: one tick's data plus frame-start/line-end markers; at most
//!   one token crosses a stage boundary per tick.
//! - [`RowBuffer`]/[`RowWindow`]: single-row delay lines and the K-row
//!   window generator built from them.
//! - [`clamped_tap`]: clamp-to-edge boundary replication by index
//!   remapping.
//! - [`Sequencer`]: the per-stage fill/pad/active/drain control machine.
//! - [`SidebandAligner`]: the marker FIFO matching data-path latency.
//! - [`WindowStage`]: the generic windowed stage tying it all together
//!   under a single per-tick enable.
//! - [`drive_frame`]: the frame-level drive loop used by callers and
//!   tests.
//!
//! This crate has **no I/O dependencies** -- it moves samples between
//! in-memory stages. Image decoding and the concrete Canny compute cores
//! live in `edgeflow-pipeline`.

pub mod aligner;
pub mod boundary;
pub mod counters;
pub mod drive;
pub mod geometry;
pub mod row;
pub mod sequencer;
pub mod stage;
pub mod token;

pub use aligner::SidebandAligner;
pub use boundary::clamped_tap;
pub use counters::StageCounters;
pub use drive::{DriveError, drive_frame};
pub use geometry::{FrameGeometry, GeometryError};
pub use row::{RowBuffer, RowWindow};
pub use sequencer::{Phase, Sequencer};
pub use stage::{StreamStage, WindowKernel, WindowStage};
pub use token::{Sideband, Token};
