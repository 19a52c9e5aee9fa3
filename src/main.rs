//! Blaster Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent};

    use blaster_breakout::audio::AudioManager;
    use blaster_breakout::consts::*;
    use blaster_breakout::renderer::{RenderState, frame_vertices};
    use blaster_breakout::sim::{GameEvent, TickInput};
    use blaster_breakout::{Command, Difficulty, GameSession, Settings, Tuning};

    /// Longest frame gap fed to the clock, so a background tab does not
    /// fire every pending timer at once
    const MAX_FRAME_MS: f64 = 100.0;

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: TickInput,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, tuning: Tuning) -> Self {
            let audio = AudioManager::new(settings.effective_volume());
            Self {
                session: GameSession::new(seed, settings, tuning),
                render_state: None,
                audio,
                input: TickInput::default(),
                last_time: 0.0,
            }
        }

        /// Run one simulation tick for this animation frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).clamp(0.0, MAX_FRAME_MS)
            } else {
                FRAME_MS
            };
            self.last_time = time;

            let input = self.input.clone();
            // Pointer moves apply once, like the events that produced them
            self.input.pointer_x = None;

            let events = self.session.frame(&input, dt);
            self.play(&events, time);
            self.audio.update(time);
        }

        fn command(&mut self, command: Command) {
            let events = self.session.handle_command(command);
            if command == Command::ToggleSound {
                self.audio.set_volume(self.session.settings().effective_volume());
            }
            // Same clock as the animation frames that poll the laser loop
            let now = self.last_time;
            self.play(&events, now);
        }

        fn play(&mut self, events: &[GameEvent], now: f64) {
            if !events.is_empty() {
                self.audio.handle_events(events, now);
            }
        }

        fn render(&mut self) {
            let vertices = frame_vertices(self.session.state());
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    // Reconfigure the surface
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn update_hud(&self, document: &Document) {
            let state = self.session.state();

            set_text(document, "score", &format!("Score: {}", state.score));
            set_text(document, "lives", &format!("Lives: {}", state.lives));
            set_indicator(document, "blasterIndicator", state.blaster_label());
            set_indicator(document, "paddleSizeIndicator", state.size_label());

            // Letters over falling tiles, positioned in playfield percentages
            if let Some(el) = document.get_element_by_id("powerupLetters") {
                let html: String = state
                    .powerups
                    .iter()
                    .map(|p| {
                        format!(
                            "<span class=\"powerup-letter\" style=\"left:{:.2}%;top:{:.2}%\">{}</span>",
                            (p.rect.x + p.rect.w / 2.0) / PLAYFIELD_WIDTH * 100.0,
                            (p.rect.y + p.rect.h / 2.0) / PLAYFIELD_HEIGHT * 100.0,
                            p.kind.letter()
                        )
                    })
                    .collect();
                el.set_inner_html(&html);
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                match self.session.overlay() {
                    Some(overlay) => {
                        let color = format!("#{:06X}", overlay.title_color);
                        let mut html = format!(
                            "<h2 style=\"color:{}\">{}</h2>",
                            color, overlay.title
                        );
                        for line in &overlay.lines {
                            html.push_str(&format!("<p>{}</p>", line));
                        }
                        el.set_inner_html(&html);
                        let _ = el.class_list().remove_1("hidden");
                    }
                    None => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }
        }

        /// Menu texts that only change on commands
        fn update_menu(&self, document: &Document) {
            set_text(document, "difficultyInfo", &self.session.difficulty_info());
            set_text(document, "soundToggle", self.session.settings().sound_label());
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_indicator(document: &Document, id: &str, label: Option<&str>) {
        if let Some(el) = document.get_element_by_id(id) {
            match label {
                Some(text) => {
                    el.set_text_content(Some(text));
                    let _ = el.class_list().remove_1("hidden");
                }
                None => {
                    let _ = el.class_list().add_1("hidden");
                }
            }
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Blaster Breakout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Optional balance table embedded in the page
        let tuning_json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        let tuning = Tuning::load_or_default(tuning_json.as_deref());
        // Optional starting preferences, same convention
        let settings_json = document
            .get_element_by_id("settings")
            .and_then(|el| el.text_content());
        let settings = Settings::load_or_default(settings_json.as_deref());

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, tuning)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_menu(&document, game.clone());

        game.borrow().update_menu(&document);
        request_animation_frame(game);

        log::info!("Blaster Breakout running!");
        Ok(())
    }

    /// Client x to playfield x. The canvas is styled at the playfield aspect.
    fn client_to_playfield(canvas: &HtmlCanvasElement, client_x: f64) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return 0.0;
        }
        ((client_x - rect.left()) / rect.width()) as f32 * PLAYFIELD_WIDTH
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard: arrows or A/D
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" | "Right" | "d" | "D" => g.input.right = pressed,
                    "ArrowLeft" | "Left" | "a" | "A" => g.input.left = pressed,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let x = client_to_playfield(&canvas_clone, event.client_x() as f64);
                game.borrow_mut().input.pointer_x = Some(x);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    if g.session.is_running() {
                        event.prevent_default();
                    }
                    let x = client_to_playfield(&canvas_clone, touch.client_x() as f64);
                    g.input.pointer_x = Some(x);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_menu(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("startButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().command(Command::StartRun);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = document
            .get_element_by_id("difficulty")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(game.borrow().session.settings().difficulty.as_str());
            let game = game.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(difficulty) = Difficulty::from_str(&select_clone.value()) else {
                    log::warn!("Unknown difficulty: {}", select_clone.value());
                    return;
                };
                let mut g = game.borrow_mut();
                g.command(Command::SetDifficulty(difficulty));
                // A refused change snaps the selector back
                select_clone.set_value(g.session.settings().difficulty.as_str());
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    g.update_menu(&document);
                }
            });
            let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("soundToggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.command(Command::ToggleSound);
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    g.update_menu(&document);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: an autopilot plays one run and the outcome is logged.
///
/// Usage: `blaster-breakout [seed] [difficulty] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use blaster_breakout::consts::*;
    use blaster_breakout::sim::{GameEvent, TickInput};
    use blaster_breakout::{Command, Difficulty, GameSession, Settings, Tuning};

    /// Ten minutes of simulated play
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    env_logger::init();
    log::info!("Blaster Breakout (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or_default();
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read {}: {}", path, e);
            None
        }
    });
    let tuning = Tuning::load_or_default(tuning_json.as_deref());

    let mut session = GameSession::new(seed, Settings::default(), tuning);
    session.handle_command(Command::SetDifficulty(difficulty));
    println!("{}", session.difficulty_info());
    session.handle_command(Command::StartRun);

    let mut collected = 0;
    let mut volleys = 0;
    let mut frames = 0;
    while session.is_running() && frames < MAX_FRAMES {
        let state = session.state();
        // Aim off-centre, drifting over time, so the ball keeps changing angle
        let wobble = (state.time_ticks as f32 * 0.05).sin() * state.paddle.width() * 0.35;
        let input = TickInput {
            pointer_x: Some((state.ball.pos.x + wobble).clamp(1.0, PLAYFIELD_WIDTH - 1.0)),
            ..Default::default()
        };

        for event in session.frame(&input, FRAME_MS) {
            match event {
                GameEvent::PowerupCollected { .. } => collected += 1,
                GameEvent::LasersFired { .. } => volleys += 1,
                _ => {}
            }
        }
        frames += 1;
    }

    let state = session.state();
    println!(
        "{:?} after {} frames: score {}, lives {}, blocks left {}, power-ups {}, volleys {}",
        state.phase,
        frames,
        state.score,
        state.lives,
        state.visible_blocks(),
        collected,
        volleys
    );
}
