//! Bottle Flip entry point
//!
//! On the web this wires the engine to `requestAnimationFrame` and the page's
//! buttons. Natively it runs a batch of seeded flips headless and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;

    use bottle_flip::FlipEngine;
    use bottle_flip::hud::{self, ShareOutcome};
    use bottle_flip::sim::{FrameHandle, FrameScheduler, SeededRandom};

    // Web Share API with a clipboard fallback. Resolves to a ShareOutcome code.
    #[wasm_bindgen(inline_js = "
        export async function share_score(title, text) {
            if (typeof navigator.share === 'function') {
                try {
                    await navigator.share({ title: title, text: text });
                    return 'shared';
                } catch (e) {
                    console.warn('Share API error:', e);
                    return 'share_failed';
                }
            }
            try {
                await navigator.clipboard.writeText(text);
                return 'copied';
            } catch (e) {
                console.error('Failed to copy to clipboard:', e);
                return 'copy_failed';
            }
        }
    ")]
    extern "C" {
        fn share_score(title: &str, text: &str) -> js_sys::Promise;
    }

    type FrameCallback = Closure<dyn FnMut(f64)>;

    /// `requestAnimationFrame` behind the engine's scheduler interface
    struct RafScheduler {
        game: Weak<RefCell<Game>>,
        next_id: u32,
        /// Our handle, the browser's request id and the callback for the
        /// outstanding frame. Dropping the callback releases it on the JS side.
        active: Option<(FrameHandle, i32, FrameCallback)>,
        /// Callback of the frame that last fired. It may still be running when
        /// the next frame is requested, so it lives until the request after that.
        spent: Option<FrameCallback>,
    }

    impl RafScheduler {
        fn new(game: Weak<RefCell<Game>>) -> Self {
            Self {
                game,
                next_id: 0,
                active: None,
                spent: None,
            }
        }
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self) -> FrameHandle {
            self.next_id = self.next_id.wrapping_add(1);
            let handle = FrameHandle(self.next_id);
            self.spent = self.active.take().map(|(_, _, callback)| callback);

            let Some(window) = web_sys::window() else {
                log::error!("No window, frame {:?} will never fire", handle);
                return handle;
            };

            let game = self.game.clone();
            let callback: FrameCallback = Closure::new(move |time: f64| {
                if let Some(game) = game.upgrade() {
                    animation_frame(&game, handle, time);
                }
            });

            match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                Ok(id) => self.active = Some((handle, id, callback)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            let is_active = self.active.as_ref().is_some_and(|(active, _, _)| *active == handle);
            if !is_active {
                return;
            }
            if let Some((_, id, _callback)) = self.active.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        engine: FlipEngine<SeededRandom, RafScheduler>,
        /// Pending timeout that clears the share feedback
        feedback_timer: Option<i32>,
    }

    fn animation_frame(game: &Rc<RefCell<Game>>, handle: FrameHandle, time: f64) {
        let mut g = game.borrow_mut();
        g.engine.on_frame(handle, time);
        update_hud(&g);
    }

    /// Update HUD elements in DOM
    fn update_hud(game: &Game) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let state = game.engine.state();
        let counters = game.engine.counters();

        if let Some(el) = document.get_element_by_id("bottle") {
            let _ = el.set_attribute("style", &hud::bottle_style(state.height, state.rotation));
        }

        if let Some(el) = document.get_element_by_id("status") {
            el.set_text_content(Some(&hud::status_message(state.phase, counters.wins)));
        }

        if let Some(el) = document.get_element_by_id("wins") {
            el.set_text_content(Some(&counters.wins.to_string()));
        }

        if let Some(el) = document.get_element_by_id("tries") {
            el.set_text_content(Some(&counters.tries.to_string()));
        }

        if let Some(el) = document.get_element_by_id("flip-btn") {
            el.set_text_content(Some(hud::flip_button_label(state.phase)));
        }

        if let Some(el) = document.get_element_by_id("share-btn") {
            if hud::share_enabled(state.phase) {
                let _ = el.remove_attribute("disabled");
            } else {
                let _ = el.set_attribute("disabled", "");
            }
        }
    }

    fn show_share_feedback(game: &Rc<RefCell<Game>>, outcome: ShareOutcome) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        if let Some(el) = document.get_element_by_id("share-feedback") {
            el.set_text_content(Some(outcome.feedback()));
            let _ = el.set_attribute("class", "");
        }

        // Restart the clear timer so a newer message gets its full time on screen
        let mut g = game.borrow_mut();
        if let Some(timer) = g.feedback_timer.take() {
            window.clear_timeout_with_handle(timer);
        }
        let weak = Rc::downgrade(game);
        let clear = Closure::once_into_js(move || {
            if let Some(game) = weak.upgrade() {
                game.borrow_mut().feedback_timer = None;
            }
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("share-feedback"))
            {
                el.set_text_content(None);
                let _ = el.set_attribute("class", "hidden");
            }
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            clear.unchecked_ref(),
            hud::SHARE_FEEDBACK_MS,
        ) {
            Ok(timer) => g.feedback_timer = Some(timer),
            Err(e) => log::warn!("Could not schedule feedback clear: {:?}", e),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Bottle Flip starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new_cyclic(|weak| {
            RefCell::new(Game {
                engine: FlipEngine::new(SeededRandom::new(seed), RafScheduler::new(weak.clone())),
                feedback_timer: None,
            })
        });
        log::info!("Game initialized with seed: {}", seed);

        setup_flip_button(game.clone());
        setup_reset_counters_button(game.clone());
        setup_share_button(game.clone());

        update_hud(&game.borrow());
        log::info!("Bottle Flip running!");
    }

    fn setup_flip_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("flip-btn") else {
            log::warn!("No #flip-btn element");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let landed = game.borrow().engine.state().phase.is_landed();
            if !landed {
                let mut g = game.borrow_mut();
                g.engine.start_flip();
                update_hud(&g);
                return;
            }

            // Show the bottle standing again for a moment before the next launch
            {
                let mut g = game.borrow_mut();
                g.engine.reset_flip();
                update_hud(&g);
            }
            let game = game.clone();
            let relaunch = Closure::once_into_js(move || {
                let mut g = game.borrow_mut();
                g.engine.start_flip();
                update_hud(&g);
            });
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    relaunch.unchecked_ref(),
                    hud::RELAUNCH_DELAY_MS,
                ) {
                    log::warn!("Could not schedule relaunch: {:?}", e);
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reset_counters_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("reset-counters-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.engine.reset_counters();
                update_hud(&g);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_share_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let (text, enabled) = {
                    let g = game.borrow();
                    let counters = g.engine.counters();
                    (
                        hud::share_text(counters.wins, counters.tries),
                        hud::share_enabled(g.engine.state().phase),
                    )
                };
                if !enabled {
                    return;
                }

                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let outcome = match JsFuture::from(share_score(hud::SHARE_TITLE, &text)).await
                    {
                        Ok(code) => code
                            .as_string()
                            .and_then(|code| ShareOutcome::from_code(&code))
                            .unwrap_or(ShareOutcome::ShareFailed),
                        Err(e) => {
                            log::warn!("Share failed: {:?}", e);
                            ShareOutcome::ShareFailed
                        }
                    };
                    if outcome.is_failure() {
                        log::warn!("{}", outcome.feedback());
                    } else {
                        log::info!("{}", outcome.feedback());
                    }
                    show_share_feedback(&game, outcome);
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bottle_flip::consts::FRAME_MS;
    use bottle_flip::hud;
    use bottle_flip::sim::{ManualScheduler, SeededRandom};
    use bottle_flip::{FlipEngine, FlipTuning, TuningError};
    use thiserror::Error;

    /// Give up on a flight after a minute of simulated frames
    const MAX_FLIGHT_FRAMES: u32 = 60 * 60;

    #[derive(Error, Debug)]
    pub enum RunError {
        #[error("Invalid {name}: {value:?}")]
        BadArgument { name: &'static str, value: String },

        #[error("Could not read tuning file {path}: {source}")]
        TuningFile {
            path: String,
            source: std::io::Error,
        },

        #[error(transparent)]
        Tuning(#[from] TuningError),

        #[error("Could not encode summary: {0}")]
        Json(#[from] serde_json::Error),
    }

    /// `bottle-flip [FLIPS] [SEED]`
    pub fn run() -> Result<(), RunError> {
        let mut args = std::env::args().skip(1);
        let flips = match args.next() {
            Some(value) => value.parse::<u32>().map_err(|_| RunError::BadArgument {
                name: "flip count",
                value,
            })?,
            None => 10,
        };
        let seed = match args.next() {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| RunError::BadArgument { name: "seed", value })?,
            None => std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        };

        let tuning = match std::env::var("BOTTLE_FLIP_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| RunError::TuningFile { path: path.clone(), source })?;
                log::info!("Loaded tuning from {}", path);
                FlipTuning::from_json(&json)?
            }
            Err(_) => FlipTuning::default(),
        };

        log::info!("Bottle Flip (native) starting: {} flips, seed {}", flips, seed);

        let mut engine =
            FlipEngine::with_tuning(tuning, SeededRandom::new(seed), ManualScheduler::new())?;
        for _ in 0..flips {
            engine.start_flip();
            if engine.run_to_landing(FRAME_MS, MAX_FLIGHT_FRAMES).is_none() {
                engine.reset_flip();
                continue;
            }
            let state = engine.state();
            log::info!("{}", hud::status_message(state.phase, engine.counters().wins));
        }

        let summary = engine.summary();
        log::info!(
            "{} wins in {} tries ({:.0}%)",
            summary.wins,
            summary.tries,
            summary.win_rate() * 100.0
        );

        if std::env::var("BOTTLE_FLIP_JSON").is_ok_and(|v| v == "1") {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
