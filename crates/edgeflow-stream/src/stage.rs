//! The generic windowed streaming stage.
//!
//! [`WindowStage`] ties the engine together: a [`Sequencer`] decides what
//! each tick is (real sample, pad, drain), a [`RowWindow`] and a K-deep
//! column register reconstruct the K x K neighborhood, boundary replication
//! remaps out-of-frame taps, a [`WindowKernel`] computes the output value,
//! and a [`SidebandAligner`] reattaches the markers of the raster position
//! the output was computed from.
//!
//! A single enable decision per tick gates the row-buffer writes, the
//! column register shift, the sequencer step, and the kernel application.
//! They advance together or not at all; there is no second,
//! almost-identical enable anywhere to drift out of step.

use crate::aligner::SidebandAligner;
use crate::boundary::clamped_tap;
use crate::counters::StageCounters;
use crate::geometry::FrameGeometry;
use crate::row::RowWindow;
use crate::sequencer::{Phase, Sequencer};
use crate::token::Token;

/// One stage of a lock-step token pipeline.
///
/// All stages share the same per-tick contract:
///
/// - `input` must be `Some` only on a tick where
///   [`input_ready`](Self::input_ready) returned `true` for the same
///   `downstream_ready`; the token is then consumed.
/// - The returned token, if any, was accepted by the consumer this tick
///   (stages never emit into an unready consumer).
pub trait StreamStage {
    /// Payload accepted from the upstream producer.
    type Input: Copy;
    /// Payload offered to the downstream consumer.
    type Output: Copy;

    /// Whether the stage will consume a real input token this tick, given
    /// the readiness of its own consumer.
    fn input_ready(&self, downstream_ready: bool) -> bool;

    /// Advance one global tick.
    fn tick(
        &mut self,
        input: Option<Token<Self::Input>>,
        downstream_ready: bool,
    ) -> Option<Token<Self::Output>>;

    /// True while accepted samples are still in flight.
    fn in_flight(&self) -> bool;

    /// Return to the post-reset state: buffers, position state, and
    /// counters all cleared.
    fn reset(&mut self);
}

/// A fixed-function compute core applied to each K x K window.
///
/// Window rows are ordered top to bottom (oldest raster row first) and
/// columns left to right, after boundary replication; the center tap is
/// `window[K / 2][K / 2]`.
pub trait WindowKernel<const K: usize> {
    /// Sample type consumed from the window.
    type Input: Copy + Default;
    /// Value produced per window.
    type Output: Copy;

    /// Compute the output for one window.
    fn apply(&self, window: &[[Self::Input; K]; K]) -> Self::Output;
}

/// A windowed stage: row buffering, sequencing, boundary replication, and
/// one compute kernel, advancing in lockstep.
pub struct WindowStage<C: WindowKernel<K>, const K: usize> {
    kernel: C,
    geometry: FrameGeometry,
    sequencer: Sequencer,
    rows: RowWindow<C::Input, K>,
    /// The last K pushed column vectors, oldest first; each vector holds
    /// the K row taps for one column, oldest row first.
    columns: [[C::Input; K]; K],
    aligner: SidebandAligner,
    counters: StageCounters,
}

impl<C: WindowKernel<K>, const K: usize> WindowStage<C, K> {
    /// Window half-size. The initializer also rejects even or degenerate
    /// window sizes at compile time.
    pub const HALF: u32 = {
        assert!(K % 2 == 1 && K >= 3, "window size must be odd and at least 3");
        (K as u32 - 1) / 2
    };

    /// Create a stage for the given frame geometry.
    #[must_use]
    pub fn new(geometry: FrameGeometry, kernel: C) -> Self {
        Self {
            sequencer: Sequencer::new(geometry, Self::HALF),
            rows: RowWindow::new(geometry.width),
            columns: [[C::Input::default(); K]; K],
            aligner: SidebandAligner::new(),
            counters: StageCounters::default(),
            geometry,
            kernel,
        }
    }

    /// Instrumentation counters accumulated since the last reset.
    #[must_use]
    pub const fn counters(&self) -> &StageCounters {
        &self.counters
    }

    /// Abandon the in-flight frame: position and pending state are
    /// discarded so the sample being accepted can start a fresh frame.
    /// Row-buffer contents are left alone; the new frame's fill rows
    /// shadow them before any window can select them.
    fn abandon_frame(&mut self) {
        self.sequencer.reset();
        self.aligner.clear();
        self.counters.frames_abandoned += 1;
    }

    fn push_column(&mut self, column: [C::Input; K]) {
        self.columns.rotate_left(1);
        self.columns[K - 1] = column;
    }

    /// Materialize the boundary-replicated window centered on the emitted
    /// raster position.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn gather_window(&self, row: u32, col: u32) -> [[C::Input; K]; K] {
        let mut window = [[C::Input::default(); K]; K];
        // The newest pushed row; the column vectors hold rows
        // `newest_row - K + 1 ..= newest_row`.
        let newest_row = self.sequencer.push_row();
        for (wr, window_row) in window.iter_mut().enumerate() {
            let src_row = clamped_tap(row, wr as i32 - Self::HALF as i32, self.geometry.height);
            let row_slot = (src_row + K as u32 - 1 - newest_row) as usize;
            for (wc, tap) in window_row.iter_mut().enumerate() {
                let src_col = clamped_tap(col, wc as i32 - Self::HALF as i32, self.geometry.width);
                let col_slot = (src_col + Self::HALF - col) as usize;
                *tap = self.columns[col_slot][row_slot];
            }
        }
        window
    }
}

impl<C: WindowKernel<K>, const K: usize> StreamStage for WindowStage<C, K> {
    type Input = C::Input;
    type Output = C::Output;

    fn input_ready(&self, downstream_ready: bool) -> bool {
        if self.sequencer.is_idle() {
            // The first sample of a stream is always welcome; the fill
            // phase it starts cannot emit.
            return true;
        }
        self.sequencer.wants_real_input()
            && (downstream_ready || self.sequencer.emission().is_none())
    }

    fn tick(
        &mut self,
        input: Option<Token<Self::Input>>,
        downstream_ready: bool,
    ) -> Option<Token<Self::Output>> {
        if self.sequencer.is_idle() {
            input?;
            self.sequencer.start();
        }

        // A scheduled emission the consumer cannot take holds the whole
        // stage: nothing is consumed, nothing advances.
        if self.sequencer.emission().is_some() && !downstream_ready {
            self.counters.stalled_ticks += 1;
            return None;
        }

        let sample = if self.sequencer.wants_real_input() {
            let Some(token) = input else {
                self.counters.starved_ticks += 1;
                return None;
            };
            if token.frame_start && !self.sequencer.at_frame_start() {
                // A new frame arrived before the old one finished: drop
                // the undrained remainder and restart position tracking.
                self.abandon_frame();
                self.sequencer.start();
            }
            self.aligner.push(token.sideband());
            self.counters.samples_accepted += 1;
            token.data
        } else {
            self.counters.injected_ticks += 1;
            C::Input::default()
        };

        // The single enable point: row buffers, column register, and
        // compute all move here, under one condition.
        if self.sequencer.writes_row() {
            let column = self.rows.push(sample);
            self.push_column(column);
        } else {
            self.push_column([C::Input::default(); K]);
        }

        let output = self.sequencer.emission().map(|(row, col)| {
            let window = self.gather_window(row, col);
            let value = self.kernel.apply(&window);
            self.counters.samples_emitted += 1;
            let sideband = self.aligner.pop().unwrap_or_default();
            sideband.attach(value)
        });

        if output.is_some() && self.aligner.is_empty() && self.sequencer.past_last_input_row() {
            // The pending count reached zero: the drain is complete, down
            // to the exact sample.
            self.counters.frames_completed += 1;
            self.sequencer.finish_frame();
        } else {
            self.sequencer.advance();
        }

        output
    }

    fn in_flight(&self) -> bool {
        !self.sequencer.is_idle()
    }

    fn reset(&mut self) {
        self.sequencer.reset();
        self.rows.reset();
        self.columns = [[C::Input::default(); K]; K];
        self.aligner.clear();
        self.counters = StageCounters::default();
    }
}

/// Expose the phase for assertions in integration tests.
impl<C: WindowKernel<K>, const K: usize> WindowStage<C, K> {
    /// Current sequencer phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.sequencer.phase()
    }
}
