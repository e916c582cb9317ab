//! Flight simulation module
//!
//! All flip physics lives here. This module must stay platform-free:
//! - Time arrives as a measured `dt`, never read from a clock
//! - Randomness only through `RandomSource`
//! - Frames only through `FrameScheduler`
//! - No rendering or DOM dependencies

pub mod random;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use state::{BottleState, FallSide, FlipPhase, Landing, SessionCounters};
pub use tick::step;
