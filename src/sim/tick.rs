//! Per-frame flight update
//!
//! Advances an airborne bottle by one variable timestep and resolves the landing.

use super::random::RandomSource;
use super::state::{BottleState, FallSide, FlipPhase, Landing};
use crate::consts::SUCCESS_PROBABILITY;
use crate::tuning::FlipTuning;

/// Advance the bottle by `dt` seconds.
///
/// Does nothing unless the bottle is in flight. Returns the landing when this step
/// brings the bottle down; the state is frozen from then on. Crediting a win is
/// left to the caller, which knows whether the flight still belongs to the
/// current session.
pub fn step(
    state: &mut BottleState,
    tuning: &FlipTuning,
    rng: &mut impl RandomSource,
    dt: f32,
) -> Option<Landing> {
    if state.phase != FlipPhase::InFlight {
        return None;
    }
    // A zero, negative or NaN step carries no elapsed time
    if !(dt.is_finite() && dt > 0.0) {
        log::trace!("Ignoring degenerate timestep {dt}");
        return None;
    }

    // Velocity first, then position with the new velocity
    state.vertical_velocity -= tuning.gravity * dt;
    state.height += state.vertical_velocity * dt;

    // Clamped so a long frame can stop the spin but never reverse it
    let damping = (1.0 - tuning.angular_damping_factor * dt).max(0.0);
    state.angular_velocity *= damping;
    state.rotation += state.angular_velocity * dt;

    if state.height > tuning.landing_y_offset {
        return None;
    }

    let landing = resolve_landing(rng);
    state.settle(tuning, landing);
    Some(landing)
}

/// Fixed-odds outcome, drawn independently of the trajectory
fn resolve_landing(rng: &mut impl RandomSource) -> Landing {
    if rng.chance(SUCCESS_PROBABILITY) {
        Landing::Success
    } else {
        let side = if rng.chance(0.5) {
            FallSide::Right
        } else {
            FallSide::Left
        };
        Landing::Fail { side }
    }
}
