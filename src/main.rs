use std::any::Any;
use std::env;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use log::{error, info, warn};
use pollster::block_on;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{CursorIcon, Window, WindowId};

use crystal_portfolio::app::{
    print_final_state, print_summary, ScriptRunner, Step, SPLASH_MESSAGE,
};
use crystal_portfolio::{
    AboutAffordance, ContentStore, MouseButton, PortfolioApp, Renderer, SceneConfig, Target,
    Timings,
};

const USAGE: &str = "Usage: crystal-portfolio [--content <file.xml>] [--summary-only] \
                     [--activate <label> | --close | --wait <ms>]...";

/// Fixed particle seed so headless runs are reproducible.
const HEADLESS_SEED: u64 = 0x5eed;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run() -> Result<()> {
    let options = CliOptions::parse()?;
    let content = match &options.content {
        Some(path) => ContentStore::load(path)
            .with_context(|| format!("failed to load content from {}", path.display()))?,
        None => ContentStore::builtin().context("built-in content is invalid")?,
    };

    print_summary(&content, &mut io::stdout().lock())?;

    if options.summary_only || !options.steps.is_empty() {
        return run_headless(content, &options.steps);
    }

    match run_interactive(content.clone()) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.downcast_ref::<WindowInitError>().is_some() {
                eprintln!(
                    "{err}. Falling back to --summary-only mode (set DISPLAY or install X11 libs to enable rendering)."
                );
                run_headless(content, &[])
            } else {
                Err(err)
            }
        }
    }
}

fn run_headless(content: ContentStore, steps: &[Step]) -> Result<()> {
    let app = PortfolioApp::new(
        content,
        Timings::default(),
        SceneConfig::default(),
        AboutAffordance::Star,
        (1280, 720),
        HEADLESS_SEED,
    );
    let mut runner = ScriptRunner::new(app);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    runner.run(steps, &mut out).context("failed to write summary")?;
    print_final_state(runner.app(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_interactive(content: ContentStore) -> Result<()> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let event_loop = panic::catch_unwind(AssertUnwindSafe(EventLoop::new));
    panic::set_hook(default_hook);
    let event_loop = event_loop
        .map_err(|panic| WindowInitError::from_panic("event loop", panic))?
        .map_err(|err| WindowInitError::from_error("event loop", err))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = NativeApp {
        content: Some(content),
        session: None,
        started: Instant::now(),
        last_error: None,
    };
    event_loop
        .run_app(&mut handler)
        .map_err(|err| anyhow!("event loop failed: {err}"))?;

    if let Some(session) = &handler.session {
        print_final_state(&session.app, &mut io::stdout().lock())?;
    }
    match handler.last_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct NativeApp {
    content: Option<ContentStore>,
    session: Option<Session>,
    started: Instant,
    last_error: Option<anyhow::Error>,
}

struct Session {
    renderer: Renderer,
    app: PortfolioApp,
    window_title: String,
    pointer_cursor: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize {stage}: {message}")]
struct WindowInitError {
    stage: &'static str,
    message: String,
}

impl WindowInitError {
    fn from_panic(stage: &'static str, panic: Box<dyn Any + Send>) -> Self {
        Self {
            stage,
            message: panic_message(panic),
        }
    }

    fn from_error(stage: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    match panic.downcast::<String>() {
        Ok(msg) => *msg,
        Err(panic) => match panic.downcast::<&'static str>() {
            Ok(msg) => (*msg).to_string(),
            Err(_) => "unknown panic".into(),
        },
    }
}

impl NativeApp {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let content = self
            .content
            .take()
            .ok_or_else(|| anyhow!("window was already opened"))?;
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(SPLASH_MESSAGE)
                        .with_inner_size(LogicalSize::new(1280.0, 720.0)),
                )
                .map_err(|err| WindowInitError::from_error("window", err))?,
        );
        let size = window.inner_size();
        let app = PortfolioApp::new(
            content,
            Timings::default(),
            SceneConfig::default(),
            AboutAffordance::Star,
            (size.width, size.height),
            rand::random(),
        );
        let renderer = block_on(Renderer::new(Arc::clone(&window), app.scene().particles()))
            .map_err(|err| WindowInitError::from_error("renderer", format!("{err:#}")))?;
        info!("window opened at {}x{}", size.width, size.height);
        Ok(Session {
            renderer,
            app,
            window_title: SPLASH_MESSAGE.to_string(),
            pointer_cursor: false,
        })
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

impl ApplicationHandler for NativeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match self.open_window(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(err) => {
                self.last_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let now = self.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if window_id != session.renderer.window_id() {
            return;
        }
        if let Err(err) = session.handle_event(event, now, event_loop) {
            error!("{err:#}");
            self.last_error = Some(err);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &self.session {
            session.renderer.window().request_redraw();
        }
    }
}

impl Session {
    fn handle_event(
        &mut self,
        event: WindowEvent,
        now: Duration,
        event_loop: &ActiveEventLoop,
    ) -> Result<()> {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.app.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.renderer.window().inner_size();
                self.renderer.resize(size);
                self.app.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.app
                    .pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.app.pointer_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(button);
                match state {
                    ElementState::Pressed => {
                        if let Some(transition) = self.app.pointer_pressed(button, now) {
                            info!("{transition:?}");
                        }
                    }
                    ElementState::Released => self.app.pointer_released(button),
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    self.app.close();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(now)?,
            _ => {}
        }
        Ok(())
    }

    fn redraw(&mut self, now: Duration) -> Result<()> {
        let outcome = self.app.tick(now);
        if outcome.splash_finished {
            println!("{}: {}", self.app.title(), self.app.slogan());
        }
        if outcome.panel_changed {
            if let Some(panel) = self.app.panel() {
                print!("{panel}");
            }
        }
        self.sync_window();

        if let Err(err) = self.renderer.render(&self.app.frame()) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(anyhow!("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    info!("Surface timeout; retrying next frame");
                }
                wgpu::SurfaceError::Other => {
                    warn!("Surface reported an unknown error; retrying next frame");
                }
            }
        }
        Ok(())
    }

    fn sync_window(&mut self) {
        let title = if self.app.splash_visible() {
            SPLASH_MESSAGE.to_string()
        } else {
            format!("{} - {}", self.app.title(), self.app.state().phase())
        };
        if title != self.window_title {
            self.renderer.window().set_title(&title);
            self.window_title = title;
        }

        let pointer = self.app.wants_pointer_cursor();
        if pointer != self.pointer_cursor {
            let icon = if pointer {
                CursorIcon::Pointer
            } else {
                CursorIcon::Default
            };
            self.renderer.window().set_cursor(icon);
            self.pointer_cursor = pointer;
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    content: Option<PathBuf>,
    summary_only: bool,
    steps: Vec<Step>,
}

impl CliOptions {
    fn parse() -> Result<Self> {
        Self::from_args(env::args().skip(1))
    }

    fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--summary-only" => options.summary_only = true,
                "--content" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("--content expects a file path\n{USAGE}"))?;
                    options.content = Some(PathBuf::from(path));
                }
                "--activate" => {
                    let label = args
                        .next()
                        .ok_or_else(|| anyhow!("--activate expects a label\n{USAGE}"))?;
                    options.steps.push(Step::Activate(Target::new(label)));
                }
                "--close" => options.steps.push(Step::Close),
                "--wait" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--wait expects milliseconds\n{USAGE}"))?;
                    let millis: u64 = value
                        .parse()
                        .with_context(|| format!("invalid --wait value {value:?}"))?;
                    options.steps.push(Step::Wait(Duration::from_millis(millis)));
                }
                other => {
                    return Err(anyhow!("Unknown argument: {other}\n{USAGE}"));
                }
            }
        }
        Ok(options)
    }
}
