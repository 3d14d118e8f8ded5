//! Crab Crossing entry point
//!
//! The browser build wires the simulation to a canvas, keyboard and Web Audio.
//! The native build is a headless runner for autopilot sessions and lane
//! generation.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use crab_crossing::Settings;
    use crab_crossing::audio::{self, AudioCue, AudioManager, AudioSink};
    use crab_crossing::autopilot::Autopilot;
    use crab_crossing::renderer::{self, RenderState, client_to_screen};
    use crab_crossing::sim::{Direction, GameState, InputEvent, handle_input, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        /// Demo mode: the bot feeds inputs each frame
        autopilot: Option<Autopilot>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                render_state: None,
                audio: AudioManager::new(&settings),
                autopilot: settings.autopilot.then(Autopilot::default),
                settings,
            }
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot = match self.autopilot {
                Some(_) => None,
                None => Some(Autopilot::default()),
            };
            self.settings.autopilot = self.autopilot.is_some();
            self.settings.save();
            log::info!("Autopilot: {}", self.autopilot.is_some());
        }

        /// One simulation tick per animation frame
        fn update(&mut self) {
            if let Some(pilot) = self.autopilot {
                if let Some(input) = pilot.next_input(&self.state) {
                    handle_input(&mut self.state, input);
                }
            }
            tick(&mut self.state);

            let events = self.state.drain_events();
            for event in &events {
                log::debug!("{event:?}");
            }
            audio::dispatch(&mut self.audio, &events);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let scene = renderer::render(&self.state);
            match render_state.render_scene(&scene) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.player.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-autopilot") {
                let class = if self.autopilot.is_some() {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Caption and final score; the retry button itself is drawn on the canvas
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.is_over() {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.player.score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() -> anyhow::Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).context("initialising logger")?;

        log::info!("Crab Crossing starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no #canvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Settings::load())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("creating canvas surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("requesting GPU adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_focus_mute(game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Crab Crossing running with seed {seed}");
        Ok(())
    }

    fn direction_for(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;

        // Key down: arrows move, I toggles the autopilot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let key = event.key();
                if let Some(direction) = direction_for(&key) {
                    event.prevent_default();
                    handle_input(&mut g.state, InputEvent::Press(direction));
                } else if key.eq_ignore_ascii_case("i") {
                    g.toggle_autopilot();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: releasing a move key unlocks the next hop
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if direction_for(&event.key()).is_some() {
                    handle_input(&mut game.borrow_mut().state, InputEvent::Release);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click: map CSS pixels into the logical playfield
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let size = (
                    canvas_clone.client_width() as f32,
                    canvas_clone.client_height() as f32,
                );
                let (x, y) = client_to_screen(size, event.offset_x() as f32, event.offset_y() as f32);
                let mut g = game.borrow_mut();
                g.audio.resume();
                handle_input(&mut g.state, InputEvent::Click { x, y });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    /// Silence audio while the window is in the background
    fn setup_focus_mute(game: Rc<RefCell<Game>>) -> anyhow::Result<()> {
        let window = web_sys::window().context("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                if g.settings.mute_on_blur {
                    let muted = Settings {
                        muted: true,
                        ..g.settings.clone()
                    };
                    g.audio.apply_settings(&muted);
                    log::info!("Audio muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                if g.settings.mute_on_blur {
                    g.audio.apply_settings(&g.settings);
                    if !g.state.is_over() {
                        g.audio.play(AudioCue::StartAmbient);
                    }
                }
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:#}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    native::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use clap::{Parser, Subcommand};
    use serde::Serialize;

    use crab_crossing::autopilot::Autopilot;
    use crab_crossing::consts::GRID;
    use crab_crossing::sim::{Contact, GameState, LaneCategory, handle_input, tick};
    use crab_crossing::{SpriteSheet, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "crab-crossing")]
    #[command(about = "Headless runner for the Crab Crossing simulation")]
    struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand, Debug)]
    enum Commands {
        /// Play one autopilot session and print a run summary
        Run {
            #[arg(long, default_value_t = 1)]
            seed: u64,
            #[arg(long, default_value_t = 18_000)]
            max_ticks: u64,
            /// JSON file with balance overrides
            #[arg(long)]
            tuning: Option<PathBuf>,
            /// Autopilot look-ahead in ticks
            #[arg(long, default_value_t = 8)]
            horizon: u32,
            /// Print the summary as JSON
            #[arg(long)]
            json: bool,
        },
        /// Print the lane sequence generated for a seed, bottom first
        Lanes {
            #[arg(long, default_value_t = 1)]
            seed: u64,
            #[arg(long, default_value_t = 30)]
            count: usize,
            /// JSON file with balance overrides
            #[arg(long)]
            tuning: Option<PathBuf>,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    enum DeathCause {
        HitByCar,
        Drowned,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        score: u32,
        ticks: u64,
        lanes_generated: u64,
        game_over: bool,
        cause: Option<DeathCause>,
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            Commands::Run {
                seed,
                max_ticks,
                tuning,
                horizon,
                json,
            } => {
                let state = new_session(seed, tuning.as_deref())?;
                let summary = play(state, Autopilot::with_horizon(horizon), max_ticks);
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    print_summary(&summary);
                }
            }
            Commands::Lanes {
                seed,
                count,
                tuning,
            } => {
                let state = new_session(seed, tuning.as_deref())?;
                print_lanes(state, count);
            }
        }
        Ok(())
    }

    fn new_session(seed: u64, tuning: Option<&Path>) -> Result<GameState> {
        let tuning = match tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        GameState::try_with_config(seed, tuning, SpriteSheet::default())
    }

    /// Drive a session with the autopilot until it ends or runs out of ticks
    fn play(mut state: GameState, pilot: Autopilot, max_ticks: u64) -> RunSummary {
        let mut cause = None;
        while !state.is_over() && state.time_ticks < max_ticks {
            if let Some(input) = pilot.next_input(&state) {
                handle_input(&mut state, input);
            }
            if tick(&mut state) == Contact::Fatal {
                cause = state
                    .track
                    .lane_at(state.player.pos.y)
                    .map(|lane| match lane.category {
                        LaneCategory::Road => DeathCause::HitByCar,
                        _ => DeathCause::Drowned,
                    });
            }
            for event in state.drain_events() {
                log::debug!("{event:?}");
            }
        }

        RunSummary {
            seed: state.seed,
            score: state.player.score,
            ticks: state.time_ticks,
            lanes_generated: state.lanes_generated,
            game_over: state.is_over(),
            cause,
        }
    }

    fn print_summary(summary: &RunSummary) {
        println!("seed={}", summary.seed);
        println!("score={}", summary.score);
        println!("ticks={}", summary.ticks);
        println!("lanes_generated={}", summary.lanes_generated);
        println!("game_over={}", summary.game_over);
        match summary.cause {
            Some(cause) => println!("cause={cause:?}"),
            None => println!("cause=none"),
        }
    }

    /// Print the initial track, then keep scrolling until `count` lanes are shown
    fn print_lanes(mut state: GameState, count: usize) {
        let mut lanes: Vec<String> = state.track.iter().rev().map(describe).collect();
        let mut camera_y = state.camera.y;
        while lanes.len() < count {
            camera_y -= GRID;
            if let Some(lane) =
                state
                    .track
                    .maybe_extend(camera_y, &state.sprites, &state.tuning, &mut state.rng)
            {
                lanes.push(describe(lane));
            }
        }
        for line in lanes.iter().take(count) {
            println!("{line}");
        }
    }

    fn describe(lane: &crab_crossing::sim::Lane) -> String {
        let speed = lane.obstacles.first().map_or(0.0, |o| o.speed());
        format!(
            "y={:>6} {:<5} texture={} obstacles={} speed={:+.3}",
            lane.y,
            format!("{:?}", lane.category),
            lane.texture,
            lane.obstacles.len(),
            speed
        )
    }
}
