//! Threshold core: the final 1-bit edge decision.

use edgeflow_stream::{StageCounters, StreamStage, Token};

/// Default decision threshold.
pub const DEFAULT_THRESHOLD: u8 = 50;

/// The threshold stage: a single comparator against a runtime-writable
/// 8-bit register.
///
/// Stateless on the data path and zero latency: a token in is a token
/// out on the same tick, markers untouched, so no sideband alignment is
/// needed.
#[derive(Debug, Clone)]
pub struct ThresholdStage {
    value: u8,
    counters: StageCounters,
}

impl ThresholdStage {
    /// Create the stage with an initial register value.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self {
            value,
            counters: StageCounters::default(),
        }
    }

    /// Current register value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Write the register; effective from the next accepted sample.
    pub const fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Instrumentation counters accumulated since the last reset.
    #[must_use]
    pub const fn counters(&self) -> &StageCounters {
        &self.counters
    }
}

impl Default for ThresholdStage {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl StreamStage for ThresholdStage {
    type Input = u8;
    type Output = bool;

    fn input_ready(&self, downstream_ready: bool) -> bool {
        downstream_ready
    }

    fn tick(
        &mut self,
        input: Option<Token<Self::Input>>,
        downstream_ready: bool,
    ) -> Option<Token<Self::Output>> {
        if !downstream_ready {
            return None;
        }
        let token = input?;
        self.counters.samples_accepted += 1;
        self.counters.samples_emitted += 1;
        let threshold = self.value;
        Some(token.map(|magnitude| magnitude >= threshold))
    }

    fn in_flight(&self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.counters = StageCounters::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn comparison_is_inclusive() {
        let mut stage = ThresholdStage::new(100);
        let at = stage.tick(Some(Token::new(100)), true).unwrap();
        let below = stage.tick(Some(Token::new(99)), true).unwrap();
        let above = stage.tick(Some(Token::new(101)), true).unwrap();
        assert!(at.data);
        assert!(!below.data);
        assert!(above.data);
    }

    #[test]
    fn default_threshold_is_fifty() {
        let stage = ThresholdStage::default();
        assert_eq!(stage.value(), DEFAULT_THRESHOLD);
        assert_eq!(stage.value(), 50);
    }

    #[test]
    fn register_write_takes_effect_immediately() {
        let mut stage = ThresholdStage::default();
        assert!(!stage.tick(Some(Token::new(10)), true).unwrap().data);
        stage.set_value(10);
        assert!(stage.tick(Some(Token::new(10)), true).unwrap().data);
    }

    #[test]
    fn markers_pass_through_unchanged() {
        let mut stage = ThresholdStage::default();
        let token = Token {
            data: 200u8,
            frame_start: true,
            line_end: true,
        };
        let output = stage.tick(Some(token), true).unwrap();
        assert!(output.frame_start);
        assert!(output.line_end);
        assert!(output.data);
    }

    #[test]
    fn not_ready_consumer_holds_the_stage() {
        let mut stage = ThresholdStage::default();
        assert!(!stage.input_ready(false));
        assert!(stage.tick(None, false).is_none());
        assert_eq!(stage.counters().samples_accepted, 0);
    }

    #[test]
    fn counters_track_throughput() {
        let mut stage = ThresholdStage::default();
        for value in 0..10u8 {
            stage.tick(Some(Token::new(value)), true);
        }
        assert_eq!(stage.counters().samples_accepted, 10);
        assert_eq!(stage.counters().samples_emitted, 10);
    }
}
