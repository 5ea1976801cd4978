//! Per-stage control sequencing: fill, pad, active, and drain phases.
//!
//! The sequencer decides, tick by tick, whether the current sample is real
//! input, a synthetic left/right padding column, or a drain sample, and at
//! which raster position an output (if any) is emitted. It never touches
//! data; the windowed stage advances its row buffers, column register, and
//! compute core in lockstep with the single enable decision derived from
//! this state.
//!
//! Per-row schedule for a window of half-size `H` over a `W`-wide frame:
//! the first `H` pushed rows are pure fill (`W` real ticks, no output);
//! every later row runs `LeftPad x H`, then `W` active ticks, then
//! `RightPad x H`. Rows pushed past the frame height are synthetic drain
//! rows that flush the samples still in flight.

use crate::geometry::FrameGeometry;

/// Control phase of a windowed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No frame in flight.
    Idle,
    /// Buffering the first rows of a frame; windows cannot form yet.
    Fill,
    /// Injecting the synthetic columns before a row's first real sample.
    LeftPad,
    /// Passing real samples through, one per tick.
    Active,
    /// Injecting the synthetic columns after a row's last real sample.
    RightPad,
    /// Input exhausted; synthetic rows flush the remaining in-flight
    /// samples.
    Drain,
}

/// Sequencer state for one windowed stage.
///
/// Owns the phase and the position counters; mutated only by its stage.
/// Position arithmetic uses the full-frame pixel count where needed, never
/// just a line width.
#[derive(Debug, Clone)]
pub struct Sequencer {
    geometry: FrameGeometry,
    half: u32,
    phase: Phase,
    /// Raster row index the current row of pushes belongs to. Rows at or
    /// past the frame height are synthetic drain rows.
    push_row: u32,
    /// Position within the current phase segment.
    col: u32,
}

impl Sequencer {
    /// Create an idle sequencer for a window of half-size `half`.
    #[must_use]
    pub const fn new(geometry: FrameGeometry, half: u32) -> Self {
        Self {
            geometry,
            half,
            phase: Phase::Idle,
            push_row: 0,
            col: 0,
        }
    }

    /// Current control phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Row index the currently pushed samples belong to.
    #[must_use]
    pub const fn push_row(&self) -> u32 {
        self.push_row
    }

    /// True before the first sample of a frame has been accepted.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// True at the position where a frame's first sample is accepted.
    #[must_use]
    pub const fn at_frame_start(&self) -> bool {
        matches!(self.phase, Phase::Fill) && self.push_row == 0 && self.col == 0
    }

    /// True once every real input row has been accepted (drain region).
    #[must_use]
    pub const fn past_last_input_row(&self) -> bool {
        self.push_row >= self.geometry.height
    }

    /// Whether the current tick consumes a real input sample.
    #[must_use]
    pub const fn wants_real_input(&self) -> bool {
        matches!(self.phase, Phase::Fill | Phase::Active)
    }

    /// Whether the current tick occupies a real column slot, advancing the
    /// row-buffer write pointers along with the rest of the stage.
    #[must_use]
    pub const fn writes_row(&self) -> bool {
        matches!(self.phase, Phase::Fill | Phase::Active | Phase::Drain)
    }

    /// The output raster position emitted by the current tick, if any.
    #[must_use]
    pub const fn emission(&self) -> Option<(u32, u32)> {
        if self.push_row < self.half {
            return None;
        }
        let out_row = self.push_row - self.half;
        if out_row >= self.geometry.height {
            return None;
        }
        match self.phase {
            Phase::Active | Phase::Drain => {
                if self.col >= self.half {
                    Some((out_row, self.col - self.half))
                } else {
                    None
                }
            }
            Phase::RightPad => {
                if self.geometry.width + self.col >= self.half {
                    Some((out_row, self.geometry.width + self.col - self.half))
                } else {
                    None
                }
            }
            Phase::Idle | Phase::Fill | Phase::LeftPad => None,
        }
    }

    /// Begin a new frame. The first accepted sample belongs to the tick
    /// this is called on.
    pub const fn start(&mut self) {
        self.push_row = 0;
        self.col = 0;
        self.phase = Phase::Fill;
    }

    /// Return to idle, dropping all position state.
    pub const fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.push_row = 0;
        self.col = 0;
    }

    /// Conclude the frame once its last output has been emitted.
    pub const fn finish_frame(&mut self) {
        self.reset();
    }

    /// Advance one enabled tick.
    pub fn advance(&mut self) {
        let width = self.geometry.width;
        match self.phase {
            Phase::Idle => {}
            Phase::Fill => {
                self.col += 1;
                if self.col == width {
                    self.next_row();
                }
            }
            Phase::LeftPad => {
                self.col += 1;
                if self.col == self.half {
                    self.col = 0;
                    self.phase = self.active_or_drain();
                }
            }
            Phase::Active | Phase::Drain => {
                self.col += 1;
                if self.col == width {
                    if self.push_row < self.half {
                        // A row before the first emission has no pads.
                        self.next_row();
                    } else {
                        self.col = 0;
                        self.phase = Phase::RightPad;
                    }
                }
            }
            Phase::RightPad => {
                self.col += 1;
                if self.col == self.half {
                    self.next_row();
                }
            }
        }
    }

    const fn active_or_drain(&self) -> Phase {
        if self.push_row < self.geometry.height {
            Phase::Active
        } else {
            Phase::Drain
        }
    }

    fn next_row(&mut self) {
        self.col = 0;
        self.push_row += 1;
        // Scheduled end of the last drain row; normally the stage ends the
        // frame on the same tick via `finish_frame` when the sideband FIFO
        // empties, so this is the structural backstop.
        if self.push_row == self.geometry.height + self.half {
            self.phase = Phase::Idle;
        } else if self.push_row < self.half {
            self.phase = self.active_or_drain_fill();
        } else {
            self.phase = Phase::LeftPad;
        }
    }

    const fn active_or_drain_fill(&self) -> Phase {
        if self.push_row < self.geometry.height {
            Phase::Fill
        } else {
            Phase::Drain
        }
    }
}
