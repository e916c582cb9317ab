//! End-to-end flip sessions driven by a synthetic clock

use bottle_flip::FlipEngine;
use bottle_flip::sim::{
    BottleState, FlipPhase, Landing, ManualScheduler, RandomSource, ScriptedRandom, SeededRandom,
};

/// Fixed 16 ms frames, as a 60 Hz display would deliver them
const FRAME_MS: f64 = 16.0;

/// Random draws that launch at 800 px/s and 660 deg/s with the default tuning
const LAUNCH_800_660: [f32; 2] = [0.25, 0.5];

fn engine_with(draws: &[f32]) -> FlipEngine<ScriptedRandom, ManualScheduler> {
    FlipEngine::new(ScriptedRandom::new(draws), ManualScheduler::new())
}

/// Deliver frames until the engine stops asking for them
fn drive<R: RandomSource>(engine: &mut FlipEngine<R, ManualScheduler>) -> Option<Landing> {
    let mut now = 0.0;
    let mut landing = None;
    let mut frames = 0;
    while let Some(handle) = engine.scheduler_mut().fire() {
        if let Some(l) = engine.on_frame(handle, now) {
            assert!(landing.is_none(), "flight resolved twice");
            landing = Some(l);
        }
        now += FRAME_MS;
        frames += 1;
        assert!(frames < 10_000, "frame chain never ended");
    }
    landing
}

#[test]
fn outcome_draw_above_odds_topples_the_bottle() {
    for side_draw in [0.2, 0.8] {
        let mut draws = LAUNCH_800_660.to_vec();
        draws.extend([0.5, side_draw]);
        let mut engine = engine_with(&draws);

        engine.start_flip();
        assert_eq!(engine.state().vertical_velocity, 800.0);
        assert_eq!(engine.state().angular_velocity, 660.0);

        let landing = drive(&mut engine);
        assert!(matches!(landing, Some(Landing::Fail { .. })));

        let state = engine.state();
        assert_eq!(state.phase, FlipPhase::LandedFail);
        assert!(state.rotation == 90.0 || state.rotation == -90.0);
        assert_eq!(state.height, engine.tuning().fail_rest_height());
        assert_eq!(engine.counters().wins, 0);
        assert_eq!(engine.counters().tries, 1);
    }
}

#[test]
fn outcome_draw_below_odds_lands_upright() {
    let mut draws = LAUNCH_800_660.to_vec();
    draws.push(0.1);
    let mut engine = engine_with(&draws);
    let wins_before = engine.counters().wins;

    engine.start_flip();
    assert_eq!(drive(&mut engine), Some(Landing::Success));

    let state = engine.state();
    assert_eq!(state.phase, FlipPhase::LandedSuccess);
    assert_eq!(state.rotation, 0.0);
    assert_eq!(state.height, engine.tuning().landing_y_offset);
    assert_eq!(engine.counters().wins, wins_before + 1);
}

#[test]
fn reset_counters_leaves_trajectory_alone() {
    let mut engine = FlipEngine::new(SeededRandom::new(7), ManualScheduler::new());
    for _ in 0..5 {
        engine.start_flip();
        drive(&mut engine);
    }
    assert_eq!(engine.counters().tries, 5);
    let landed = *engine.state();

    engine.reset_counters();
    assert_eq!(engine.counters().wins, 0);
    assert_eq!(engine.counters().tries, 0);
    assert_eq!(*engine.state(), landed);
}

#[test]
fn start_from_every_phase_counts_one_try() {
    let mut engine = FlipEngine::new(SeededRandom::new(11), ManualScheduler::new());

    // Idle
    engine.start_flip();
    assert_eq!(engine.counters().tries, 1);

    // In flight
    let handle = engine.scheduler_mut().fire().unwrap();
    engine.on_frame(handle, 0.0);
    engine.start_flip();
    assert_eq!(engine.counters().tries, 2);

    // Landed
    drive(&mut engine);
    assert!(engine.state().phase.is_landed());
    engine.start_flip();
    assert_eq!(engine.counters().tries, 3);
    assert!(engine.counters().wins <= engine.counters().tries);
}

#[test]
fn frames_after_landing_change_nothing() {
    let mut draws = LAUNCH_800_660.to_vec();
    draws.extend([0.9, 0.9]);
    let mut engine = engine_with(&draws);
    engine.start_flip();
    drive(&mut engine);
    let landed = *engine.state();
    let counters = *engine.counters();

    for _ in 0..20 {
        assert_eq!(engine.advance(0.016), None);
    }
    assert_eq!(*engine.state(), landed);
    assert_eq!(*engine.counters(), counters);
}

#[test]
fn long_frame_after_backgrounding_still_lands_cleanly() {
    let mut draws = LAUNCH_800_660.to_vec();
    draws.push(0.05);
    let mut engine = engine_with(&draws);
    engine.start_flip();

    let handle = engine.scheduler_mut().fire().unwrap();
    engine.on_frame(handle, 0.0);
    let handle = engine.scheduler_mut().fire().unwrap();
    // Tab hidden for ten seconds
    assert_eq!(engine.on_frame(handle, 10_000.0), Some(Landing::Success));
    assert_eq!(engine.state().rotation, 0.0);
    assert_eq!(engine.scheduler().pending(), None);
}

#[test]
fn reset_returns_to_rest_from_anywhere() {
    let mut engine = FlipEngine::new(SeededRandom::new(3), ManualScheduler::new());
    let rest = BottleState::at_rest(engine.tuning());

    engine.reset_flip();
    assert_eq!(*engine.state(), rest);

    engine.start_flip();
    engine.advance(0.1);
    engine.reset_flip();
    assert_eq!(*engine.state(), rest);
    assert_eq!(engine.scheduler().pending(), None);

    engine.start_flip();
    drive(&mut engine);
    engine.reset_flip();
    engine.reset_flip();
    assert_eq!(*engine.state(), rest);
}

#[test]
fn reset_counters_mid_flight_keeps_wins_within_tries() {
    let mut draws = LAUNCH_800_660.to_vec();
    draws.push(0.1);
    let mut engine = engine_with(&draws);

    engine.start_flip();
    let handle = engine.scheduler_mut().fire().unwrap();
    engine.on_frame(handle, 0.0);
    engine.reset_counters();

    assert_eq!(drive(&mut engine), Some(Landing::Success));
    assert_eq!(engine.state().phase, FlipPhase::LandedSuccess);
    assert_eq!(engine.state().rotation, 0.0);
    assert_eq!(engine.counters().wins, 0);
    assert_eq!(engine.counters().tries, 0);
}
