//! Handheld Breakout entry point
//!
//! On the web this wires the page (canvas, scroll, pointer, keys, buttons,
//! visibility) to the simulation and the WebGPU presenter. Natively it runs
//! a headless autopilot session and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use thiserror::Error;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use handheld_breakout::camera::{CameraRig, HandheldPose};
    use handheld_breakout::consts::*;
    use handheld_breakout::platform::input::{self, Key};
    use handheld_breakout::platform::{FrameScheduler, SchedulerState, SiteContext};
    use handheld_breakout::renderer::{Canvas, Presenter, RendererError, draw_game};
    use handheld_breakout::sim::{GameState, advance};
    use handheld_breakout::{Mode, Settings};

    /// Elements a drag must not start on
    const INTERACTIVE: &str = "button, a, input, select, textarea";

    #[derive(Debug, Error)]
    pub enum StartupError {
        #[error("no global window")]
        NoWindow,
        #[error("no document")]
        NoDocument,
        #[error("missing #{0} element")]
        MissingElement(&'static str),
        #[error("#canvas is not a canvas element")]
        NotACanvas,
        #[error("could not create surface: {0}")]
        Surface(#[from] wgpu::CreateSurfaceError),
        #[error("no suitable GPU adapter: {0}")]
        Adapter(#[from] wgpu::RequestAdapterError),
        #[error(transparent)]
        Renderer(#[from] RendererError),
    }

    /// Everything the page callbacks share
    struct App {
        game: GameState,
        ctx: SiteContext,
        rig: CameraRig,
        pose: HandheldPose,
        scheduler: FrameScheduler,
        screen: Canvas,
        presenter: Presenter,
        rng: Pcg32,
        settings: Settings,
        /// An animation-frame callback is pending
        loop_armed: bool,
    }

    impl App {
        /// One animation frame: step, draw, move the camera, present.
        /// Returns whether the loop should continue.
        fn frame(&mut self, time: f64) -> bool {
            self.loop_armed = false;
            let Some(tick) = self.scheduler.frame(time) else {
                return self.scheduler.should_rearm();
            };

            advance(&mut self.game, &mut self.rng);
            draw_game(&mut self.screen, &self.game, &self.settings);

            let mode = self.ctx.mode();
            let progress = self.ctx.scroll.progress;
            self.rig.update(mode, progress, self.ctx.pointer.normalized());
            self.pose
                .update(mode, tick.elapsed, progress, self.settings.reduced_motion);

            let aspect = self.presenter.aspect();
            let view_proj = self.rig.view_proj(aspect);
            match self
                .presenter
                .render(&self.screen, view_proj, self.pose.model())
            {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.presenter.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, stopping");
                    self.scheduler.stop();
                }
                Err(e) => log::warn!("Frame skipped: {:?}", e),
            }

            self.scheduler.should_rearm()
        }
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger already set: {e}").into());
        }

        log::info!("Handheld Breakout starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::MissingElement("canvas"))?
            .dyn_into()
            .map_err(|_| StartupError::NotACanvas)?;
        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let presenter = Presenter::new(
            surface,
            &adapter,
            width,
            height,
            FIELD_WIDTH as u32,
            FIELD_HEIGHT as u32,
        )
        .await?;

        let mut ctx = SiteContext::new();
        subscribe_page_chrome(&mut ctx, &document);

        let app = Rc::new(RefCell::new(App {
            game: GameState::new(),
            ctx,
            rig: CameraRig::new(settings.camera),
            pose: HandheldPose::new(),
            scheduler: FrameScheduler::new(),
            screen: Canvas::new(FIELD_WIDTH as u32, FIELD_HEIGHT as u32),
            presenter,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            loop_armed: false,
        }));

        setup_key_handlers(app.clone());
        setup_pointer_handlers(app.clone());
        setup_page_telemetry(app.clone(), canvas);
        setup_buttons(app.clone());
        setup_visibility(app.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(app);

        log::info!("Handheld Breakout running!");
        Ok(())
    }

    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let w = (canvas.client_width() as f64 * dpr) as u32;
        let h = (canvas.client_height() as f64 * dpr) as u32;
        (w.max(1), h.max(1))
    }

    /// Scroll lock, `data-playing` and the exit button follow the mode
    fn subscribe_page_chrome(ctx: &mut SiteContext, document: &web_sys::Document) {
        let document = document.clone();
        ctx.subscribe(move |mode| {
            let active = mode == Mode::Active;
            if let Some(body) = document.body() {
                let _ = body
                    .style()
                    .set_property("overflow", if active { "hidden" } else { "" });
                let _ = body
                    .dataset()
                    .set("playing", if active { "true" } else { "false" });
            }
            if let Some(exit) = document.get_element_by_id("exit-btn") {
                let _ = exit.set_attribute("class", if active { "" } else { "hidden" });
            }
        });
    }

    fn setup_key_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::parse(&event.key()) else {
                    return;
                };
                let mut a = app.borrow_mut();
                let App { game, ctx, .. } = &mut *a;
                input::key_down(key, game, ctx);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::parse(&event.key()) {
                    input::key_up(key, &mut app.borrow_mut().game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn started_on_interactive(event: &web_sys::Event) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(INTERACTIVE).ok().flatten())
            .is_some()
    }

    /// Window-level drag handlers so the handheld can be spun from anywhere
    fn setup_pointer_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let on_interactive = started_on_interactive(&event);
                let at = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let mut a = app.borrow_mut();
                let App { pose, ctx, .. } = &mut *a;
                input::pointer_down(pose, ctx, at, on_interactive);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: pointer telemetry for the camera, plus drag
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let at = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let viewport = viewport_size();
                let mut a = app.borrow_mut();
                let App { pose, ctx, .. } = &mut *a;
                ctx.set_pointer(at, viewport);
                input::pointer_move(pose, ctx, at);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let on_interactive = started_on_interactive(&event);
                if let Some(touch) = event.touches().get(0) {
                    let at = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let mut a = app.borrow_mut();
                    let App { pose, ctx, .. } = &mut *a;
                    input::pointer_down(pose, ctx, at, on_interactive);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let at = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let mut a = app.borrow_mut();
                    let App { pose, ctx, .. } = &mut *a;
                    input::pointer_move(pose, ctx, at);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release
        for name in ["mouseup", "touchend"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                input::pointer_up(&mut app.borrow_mut().pose);
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn viewport_size() -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::ONE;
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        Vec2::new(w as f32, h as f32)
    }

    fn read_scroll(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let y = window.scroll_y().unwrap_or(0.0) as f32;
        let page = window
            .document()
            .and_then(|d| d.document_element())
            .map(|el| el.scroll_height() as f32)
            .unwrap_or(0.0);
        let range = page - viewport_size().y;
        app.borrow_mut().ctx.set_scroll(y, range);
    }

    /// Scroll progress for the camera path, and canvas resizing
    fn setup_page_telemetry(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let Some(window) = web_sys::window() else {
            return;
        };
        read_scroll(&app);

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                read_scroll(&app);
            });
            let _ = window
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (w, h) = canvas_pixel_size(&window, &canvas);
                canvas.set_width(w);
                canvas.set_height(h);
                app.borrow_mut().presenter.resize(w, h);
                read_scroll(&app);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("play-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().ctx.start_playing();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #play-btn on this page");
        }

        if let Some(btn) = document.get_element_by_id("exit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                let App { game, ctx, .. } = &mut *a;
                ctx.stop_playing(game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Suspend the frame loop while the tab is hidden
    fn setup_visibility(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
            let rearm = {
                let mut a = app.borrow_mut();
                let was_suspended = a.scheduler.state() == SchedulerState::Suspended;
                a.scheduler.set_visible(visible);
                visible && was_suspended && !a.loop_armed
            };
            if rearm {
                request_animation_frame(app.clone());
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        app.borrow_mut().loop_armed = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let rearm = app.borrow_mut().frame(time);
        if rearm {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Ticks simulated by the headless session when no count is given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u64 = 3600;
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0x5eed;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use handheld_breakout::Settings;
    use handheld_breakout::consts::*;
    use handheld_breakout::renderer::{Canvas, draw_game, hint_visible};
    use handheld_breakout::sim::{GameState, advance};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Handheld Breakout (native) starting headless autopilot session");

    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring tick count {:?}, using {}", arg, DEFAULT_TICKS);
            DEFAULT_TICKS
        }),
        None => DEFAULT_TICKS,
    };
    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(DEFAULT_SEED);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut game = GameState::new();

    let mut bricks_broken = 0u64;
    let mut best_level = game.level;
    for _ in 0..ticks {
        let score_before = game.score;
        advance(&mut game, &mut rng);
        if game.score > score_before {
            bricks_broken += (game.score - score_before) / BRICK_POINTS;
        }
        best_level = best_level.max(game.level);
    }

    let mut screen = Canvas::new(FIELD_WIDTH as u32, FIELD_HEIGHT as u32);
    draw_game(&mut screen, &game, &settings);

    log::info!(
        "{} ticks (seed {:#x}): score {}, level {} (best {}), lives {}, {} bricks broken",
        ticks,
        seed,
        game.score,
        game.level,
        best_level,
        game.lives,
        bricks_broken
    );
    log::info!(
        "Final frame: {} bytes, hint {}",
        screen.as_bytes().len(),
        if hint_visible(&game) { "shown" } else { "hidden" }
    );
}
