//! Flip session controller
//!
//! Owns the bottle, the counters, the random source and the frame scheduler for
//! one game session. At most one frame request is outstanding at a time: starting
//! or resetting a flip always cancels the previous request, and a frame delivered
//! with any other handle is dropped.

use serde::{Deserialize, Serialize};

use crate::sim::{
    BottleState, FallSide, FlipPhase, FrameHandle, FrameScheduler, Landing, ManualScheduler,
    RandomSource, SessionCounters, step,
};
use crate::tuning::{FlipTuning, TuningError};

/// Snapshot of a session for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub wins: u32,
    pub tries: u32,
    pub bottle: BottleState,
}

impl SessionSummary {
    /// Fraction of tries that landed upright (0 when nothing was tried)
    pub fn win_rate(&self) -> f32 {
        if self.tries == 0 {
            0.0
        } else {
            self.wins as f32 / self.tries as f32
        }
    }
}

pub struct FlipEngine<R, S> {
    tuning: FlipTuning,
    state: BottleState,
    counters: SessionCounters,
    rng: R,
    scheduler: S,
    /// The only frame this engine will accept
    pending: Option<FrameHandle>,
    /// Timestamp (ms) of the last processed frame, only set while in flight
    last_timestamp: Option<f64>,
    /// Whether a win by the current flight is credited. Cleared when the
    /// counters are reset mid-flight, so wins never exceed tries.
    flight_counted: bool,
}

impl<R: RandomSource, S: FrameScheduler> FlipEngine<R, S> {
    /// Create an idle session with the default tuning
    pub fn new(rng: R, scheduler: S) -> Self {
        let tuning = FlipTuning::default();
        Self {
            state: BottleState::at_rest(&tuning),
            tuning,
            counters: SessionCounters::default(),
            rng,
            scheduler,
            pending: None,
            last_timestamp: None,
            flight_counted: false,
        }
    }

    /// Create an idle session with custom tuning
    pub fn with_tuning(tuning: FlipTuning, rng: R, scheduler: S) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut engine = Self::new(rng, scheduler);
        engine.state = BottleState::at_rest(&tuning);
        engine.tuning = tuning;
        Ok(engine)
    }

    pub fn state(&self) -> &BottleState {
        &self.state
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn tuning(&self) -> &FlipTuning {
        &self.tuning
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Frame the engine is currently waiting for
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            wins: self.counters.wins,
            tries: self.counters.tries,
            bottle: self.state,
        }
    }

    /// Launch a new flip from any phase. A flight already in the air is abandoned
    /// without an outcome.
    pub fn start_flip(&mut self) {
        if self.state.phase == FlipPhase::InFlight {
            log::debug!("Abandoning flight in progress");
        }
        self.cancel_pending();
        self.last_timestamp = None;
        self.counters.record_try();
        self.flight_counted = true;

        let vertical_velocity = self.rng.range(
            self.tuning.initial_y_velocity_min,
            self.tuning.initial_y_velocity_max,
        );
        let angular_velocity = self.rng.range(
            self.tuning.initial_angular_velocity_min,
            self.tuning.initial_angular_velocity_max,
        );
        self.state = BottleState::launched(&self.tuning, vertical_velocity, angular_velocity);

        log::info!(
            "Flip #{} launched: {:.0} px/s up, {:.0} deg/s spin",
            self.counters.tries,
            vertical_velocity,
            angular_velocity
        );

        self.schedule_next();
    }

    /// Put the bottle back at rest. Counters are kept.
    pub fn reset_flip(&mut self) {
        self.cancel_pending();
        self.last_timestamp = None;
        self.state = BottleState::at_rest(&self.tuning);
    }

    /// Zero wins and tries. The bottle is left where it is; a flight already in
    /// the air keeps flying but its try was wiped, so its win is not credited.
    pub fn reset_counters(&mut self) {
        self.counters.reset();
        self.flight_counted = false;
        log::info!("Counters reset");
    }

    /// Frame clock callback.
    ///
    /// `timestamp` is in milliseconds and must not decrease within a flight. The first
    /// frame of a flight only records the time; each later frame integrates the time
    /// elapsed since the previous one.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) -> Option<Landing> {
        if self.pending != Some(handle) {
            log::debug!("Dropping stale frame {:?}", handle);
            return None;
        }
        self.pending = None;

        if self.state.phase != FlipPhase::InFlight {
            self.last_timestamp = None;
            return None;
        }

        let Some(last) = self.last_timestamp.replace(timestamp) else {
            self.schedule_next();
            return None;
        };

        let dt = ((timestamp - last) / 1000.0) as f32;
        let landing = self.integrate(dt);
        if self.state.phase == FlipPhase::InFlight {
            self.schedule_next();
        }
        landing
    }

    /// Step the flight by `dt` seconds without going through the frame clock
    pub fn advance(&mut self, dt: f32) -> Option<Landing> {
        let landing = self.integrate(dt);
        if landing.is_some() {
            self.cancel_pending();
        }
        landing
    }

    fn integrate(&mut self, dt: f32) -> Option<Landing> {
        let landing = step(&mut self.state, &self.tuning, &mut self.rng, dt)?;

        self.last_timestamp = None;
        let counted = std::mem::take(&mut self.flight_counted);
        match landing {
            Landing::Success if counted => {
                self.counters.record_win();
                log::info!(
                    "Flip #{} landed upright ({} wins)",
                    self.counters.tries,
                    self.counters.wins
                );
            }
            Landing::Success => {
                log::info!("Flip landed upright after a counter reset, win not counted")
            }
            Landing::Fail { side } => log::info!(
                "Flip #{} toppled to the {}",
                self.counters.tries,
                match side {
                    FallSide::Left => "left",
                    FallSide::Right => "right",
                }
            ),
        }
        Some(landing)
    }

    fn schedule_next(&mut self) {
        self.pending = Some(self.scheduler.request_frame());
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<R: RandomSource> FlipEngine<R, ManualScheduler> {
    /// Deliver synthetic frames `frame_ms` apart until the flight resolves.
    ///
    /// Picks up from the last delivered frame, so a flight can be driven in
    /// several calls. Returns `None` if nothing is in flight or `max_frames` run
    /// out first.
    pub fn run_to_landing(&mut self, frame_ms: f64, max_frames: u32) -> Option<Landing> {
        let mut now = self.last_timestamp.map_or(0.0, |last| last + frame_ms);
        for _ in 0..max_frames {
            let handle = self.scheduler.fire()?;
            if let Some(landing) = self.on_frame(handle, now) {
                return Some(landing);
            }
            now += frame_ms;
        }
        log::warn!("Flight still airborne after {max_frames} frames");
        None
    }
}
