//! Bottle Flip - flip a bottle, hope it lands upright
//!
//! Core modules:
//! - `sim`: Flight simulation (state, integration, landing, randomness, frame scheduling)
//! - `engine`: Owns one session and exposes the flip/reset commands
//! - `tuning`: Physics constants grouped as validated, serializable data
//! - `hud`: Text shown by the front end

pub mod engine;
pub mod hud;
pub mod sim;
pub mod tuning;

pub use engine::{FlipEngine, SessionSummary};
pub use tuning::{FlipTuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (px)
    pub const GAME_AREA_WIDTH: f32 = 360.0;
    pub const GAME_AREA_HEIGHT: f32 = 600.0;

    /// Bottle visual dimensions (px)
    pub const BOTTLE_WIDTH: f32 = 55.0;
    pub const BOTTLE_HEIGHT: f32 = 150.0;

    /// Height of the landing surface above the bottom of the play area (px)
    pub const LANDING_Y_OFFSET: f32 = 50.0;

    /// Downward acceleration (px/s²)
    pub const GRAVITY: f32 = 2800.0;
    /// Initial upward speed range (px/s)
    pub const INITIAL_Y_VELOCITY_MIN: f32 = 750.0;
    pub const INITIAL_Y_VELOCITY_MAX: f32 = 950.0;
    /// Initial spin range (deg/s), roughly one full turn per flight after damping
    pub const INITIAL_ANGULAR_VELOCITY_MIN: f32 = 580.0;
    pub const INITIAL_ANGULAR_VELOCITY_MAX: f32 = 740.0;

    /// Fraction of angular velocity lost per second to air resistance
    pub const ANGULAR_DAMPING_FACTOR: f32 = 0.3;

    /// Fixed odds of an upright landing, independent of the trajectory
    pub const SUCCESS_PROBABILITY: f32 = 0.20;

    /// Resting rotation of a toppled bottle (degrees)
    pub const FAIL_ROTATION: f32 = 90.0;

    /// Nominal frame length for synthetic clocks (60 Hz, ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
