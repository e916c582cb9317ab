//! Flight state and session counters

use serde::{Deserialize, Serialize};

use crate::consts::FAIL_ROTATION;
use crate::tuning::FlipTuning;

/// Current phase of a flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlipPhase {
    /// Bottle at rest, waiting for a flip
    #[default]
    Idle,
    /// Bottle airborne, integrated every frame
    InFlight,
    /// Landed upright
    LandedSuccess,
    /// Toppled onto its side
    LandedFail,
}

impl FlipPhase {
    pub fn is_landed(&self) -> bool {
        matches!(self, FlipPhase::LandedSuccess | FlipPhase::LandedFail)
    }
}

/// Side a toppled bottle falls to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallSide {
    /// Rotated -90°
    Left,
    /// Rotated +90°
    Right,
}

impl FallSide {
    /// Resting rotation in degrees
    pub fn rotation(&self) -> f32 {
        match self {
            FallSide::Left => -FAIL_ROTATION,
            FallSide::Right => FAIL_ROTATION,
        }
    }
}

/// How a flight resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Landing {
    Success,
    Fail { side: FallSide },
}

/// The bottle's simulated state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BottleState {
    /// Base height above the bottom of the play area (px)
    pub height: f32,
    /// Rotation in degrees, not normalized
    pub rotation: f32,
    /// px/s, positive is up
    pub vertical_velocity: f32,
    /// deg/s
    pub angular_velocity: f32,
    pub phase: FlipPhase,
}

impl BottleState {
    /// Canonical rest state: standing on the landing surface, motionless
    pub fn at_rest(tuning: &FlipTuning) -> Self {
        Self {
            height: tuning.landing_y_offset,
            rotation: 0.0,
            vertical_velocity: 0.0,
            angular_velocity: 0.0,
            phase: FlipPhase::Idle,
        }
    }

    /// Launch from rest with the given initial velocities
    pub fn launched(tuning: &FlipTuning, vertical_velocity: f32, angular_velocity: f32) -> Self {
        Self {
            vertical_velocity,
            angular_velocity,
            phase: FlipPhase::InFlight,
            ..Self::at_rest(tuning)
        }
    }

    /// Freeze the bottle on the landing surface with the given outcome
    pub fn settle(&mut self, tuning: &FlipTuning, landing: Landing) {
        self.height = tuning.landing_y_offset;
        self.vertical_velocity = 0.0;
        self.angular_velocity = 0.0;

        match landing {
            Landing::Success => {
                self.phase = FlipPhase::LandedSuccess;
                self.rotation = 0.0;
            }
            Landing::Fail { side } => {
                self.phase = FlipPhase::LandedFail;
                self.rotation = side.rotation();
                self.height = tuning.fail_rest_height();
            }
        }
    }
}

/// Wins and tries for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    pub wins: u32,
    pub tries: u32,
}

impl SessionCounters {
    pub fn record_try(&mut self) {
        self.tries = self.tries.saturating_add(1);
    }

    pub fn record_win(&mut self) {
        self.wins = self.wins.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
