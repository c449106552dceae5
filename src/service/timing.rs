//! Wall-clock timing for pipeline phases.

use std::time::Instant;

use crate::domain::models::{Phase, PhaseTiming};

/// Run timer for measuring the whole analysis plus each phase.
pub struct PhaseTimer {
    start: Instant,
    phase_start: Instant,
    timings: Vec<PhaseTiming>,
}

impl PhaseTimer {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            phase_start: now,
            timings: Vec::new(),
        }
    }

    /// Close the current phase and start timing the next one.
    pub fn lap(&mut self, phase: Phase) {
        let now = Instant::now();
        let duration_ms = now.duration_since(self.phase_start).as_secs_f64() * 1000.0;
        tracing::debug!("[PIPELINE] {} took {:.2}ms", phase, duration_ms);
        self.timings.push(PhaseTiming { phase, duration_ms });
        self.phase_start = now;
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    pub fn into_timings(self) -> Vec<PhaseTiming> {
        self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_laps_record_phases_in_order() {
        let mut timer = PhaseTimer::start();
        timer.lap(Phase::Extraction);
        timer.lap(Phase::Scoring);
        let timings = timer.into_timings();
        let phases: Vec<Phase> = timings.iter().map(|t| t.phase).collect();
        assert_eq!(phases, vec![Phase::Extraction, Phase::Scoring]);
        assert!(timings.iter().all(|t| t.duration_ms >= 0.0));
    }
}
