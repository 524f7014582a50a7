//! Platform-independent application shell shared by the native window, the
//! browser build and the headless summary mode.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use glam::Vec2;
use log::info;

use crate::content::ContentStore;
use crate::input::{InputState, MouseButton};
use crate::panel::{InfoPanelPresenter, PanelView};
use crate::scene::{AboutAffordance, FrameContext, SceneConfig, SceneController, SceneFrame};
use crate::target::Target;
use crate::timer::OneShotTimer;
use crate::ui_state::{Timings, Transition, UiState, UiStateMachine};

/// Tick length used when replaying a script without a real clock.
pub const SIMULATED_FRAME: Duration = Duration::from_millis(16);

pub const SPLASH_MESSAGE: &str = "Welcome to the era of AI experts";

/// Stylesheet for the browser overlay. Every layer is pinned to the viewport
/// above the canvas; labels are placed inside the fixed label layer.
pub const OVERLAY_CSS: &str = r#"
.splash { position: fixed; inset: 0; z-index: 30; display: flex; align-items: center;
  justify-content: center; background: #03040c; color: #e6f1ff;
  font: 600 2rem/1.3 sans-serif; letter-spacing: 0.08em; }
.hero { position: fixed; top: 2rem; left: 0; right: 0; z-index: 10; text-align: center;
  color: #e6f1ff; font-family: sans-serif; pointer-events: none; }
.hero-title { margin: 0; font-size: 2.6rem; letter-spacing: 0.12em; }
.hero-slogan { margin: 0.4rem 0 0; color: #64ffda; letter-spacing: 0.3em; }
.about-button { position: fixed; bottom: 2.5rem; left: 50%; transform: translateX(-50%);
  z-index: 10; padding: 0.6rem 1.6rem; border: 1px solid #64ffda; border-radius: 2rem;
  background: rgba(3, 4, 12, 0.6); color: #64ffda; cursor: pointer; }
.crystal-labels { position: fixed; inset: 0; z-index: 5; pointer-events: none;
  overflow: hidden; }
.crystal-label { position: absolute; transform: translate(-50%, -50%); white-space: nowrap;
  color: #e6f1ff; font: 500 1rem sans-serif; text-shadow: 0 0 8px #64ffda; }
.info-panel { position: fixed; top: 50%; left: 50%; transform: translate(-50%, -50%);
  z-index: 20; width: min(90vw, 760px); max-height: 80vh; overflow-y: auto;
  padding: 1.5rem 2rem; border: 1px solid rgba(100, 255, 218, 0.4); border-radius: 12px;
  background: rgba(6, 10, 24, 0.92); color: #ccd6f6; font-family: sans-serif; }
.close-button { position: absolute; top: 0.8rem; right: 1rem; border: none;
  background: none; color: #64ffda; font-size: 1.6rem; cursor: pointer; }
.content-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
  gap: 1rem; }
.card { padding: 1rem; border-radius: 8px; background: rgba(100, 255, 218, 0.06); }
.card-link { color: inherit; text-decoration: none; }
.tech-tags span { display: inline-block; margin: 0.2rem; padding: 0.2rem 0.6rem;
  border-radius: 1rem; background: rgba(100, 255, 218, 0.12); }
.tech-tags span.area { background: rgba(189, 147, 249, 0.18); }
"#;

/// What changed during one [`PortfolioApp::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub transition: Option<Transition>,
    pub splash_finished: bool,
    pub panel_changed: bool,
}

/// Owns the UI state machine, the animated scene and the current panel.
#[derive(Debug)]
pub struct PortfolioApp {
    content: ContentStore,
    machine: UiStateMachine,
    scene: SceneController,
    input: InputState,
    splash: OneShotTimer,
    splash_visible: bool,
    pointer_inside: bool,
    last_tick: Duration,
    panel: Option<PanelView>,
    panel_changed: bool,
}

impl PortfolioApp {
    pub fn new(
        content: ContentStore,
        timings: Timings,
        scene_config: SceneConfig,
        affordance: AboutAffordance,
        viewport: (u32, u32),
        seed: u64,
    ) -> Self {
        let mut input = InputState::new();
        input.set_viewport(viewport.0, viewport.1);
        let mut splash = OneShotTimer::new();
        splash.schedule(Duration::ZERO, timings.splash);
        let scene = SceneController::new(scene_config, affordance, aspect(viewport), seed);
        Self {
            content,
            machine: UiStateMachine::new(timings.warp),
            scene,
            input,
            splash,
            splash_visible: !timings.splash.is_zero(),
            pointer_inside: false,
            last_tick: Duration::ZERO,
            panel: None,
            panel_changed: false,
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn state(&self) -> &UiState {
        self.machine.state()
    }

    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn title(&self) -> &str {
        &self.content.name
    }

    pub fn slogan(&self) -> &str {
        &self.content.slogan
    }

    pub fn splash_visible(&self) -> bool {
        self.splash_visible
    }

    /// The About Me button is offered only while nothing is active.
    pub fn about_button_visible(&self) -> bool {
        !self.splash_visible && self.state().active_target().is_none()
    }

    /// Panel currently on screen.
    pub fn panel(&self) -> Option<&PanelView> {
        self.panel.as_ref()
    }

    pub fn activate(&mut self, label: Target, now: Duration) -> Transition {
        let transition = self.machine.activate(label, now);
        self.refresh_panel();
        transition
    }

    pub fn close(&mut self) -> Transition {
        let transition = self.machine.close();
        self.refresh_panel();
        transition
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.set_viewport(width, height);
        self.scene.resize(aspect((width, height)));
    }

    /// Records the pointer position in physical pixels and refreshes hover.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.input.set_pointer_position(position);
        self.pointer_inside = true;
        self.refresh_hover();
    }

    pub fn pointer_left(&mut self) {
        self.pointer_inside = false;
        self.scene.set_hovered(None);
    }

    /// Left click activates whatever is under the pointer; right click
    /// closes the open panel. Ignored while the splash screen is up.
    pub fn pointer_pressed(&mut self, button: MouseButton, now: Duration) -> Option<Transition> {
        self.input.set_button_down(button);
        if self.splash_visible {
            return None;
        }
        match button {
            MouseButton::LEFT => {
                let target = self.scene.pick(self.input.pointer_ndc())?;
                Some(self.activate(target, now))
            }
            MouseButton::RIGHT if self.state().active_target().is_some() => Some(self.close()),
            _ => None,
        }
    }

    pub fn pointer_released(&mut self, button: MouseButton) {
        self.input.set_button_up(button);
    }

    pub fn wants_pointer_cursor(&self) -> bool {
        !self.splash_visible && self.scene.wants_pointer_cursor()
    }

    /// Advances timers and animation to `now`, measured from app start.
    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let dt = now.saturating_sub(self.last_tick);
        self.last_tick = now;

        if self.splash.poll(now).is_some() && self.splash_visible {
            self.splash_visible = false;
            outcome.splash_finished = true;
            info!("splash finished after {} ms", now.as_millis());
        }

        outcome.transition = self.machine.advance(now);

        let pointer = if self.pointer_inside && !self.splash_visible {
            self.input.pointer_ndc()
        } else {
            Vec2::ZERO
        };
        let ctx = FrameContext {
            dt: dt.as_secs_f32(),
            elapsed: now.as_secs_f32(),
            pointer,
        };
        self.scene.update(self.machine.state(), &ctx);
        self.refresh_hover();

        self.refresh_panel();
        outcome.panel_changed = std::mem::take(&mut self.panel_changed);
        outcome
    }

    pub fn frame(&self) -> SceneFrame {
        self.scene.frame()
    }

    /// Earliest armed timer deadline, splash included.
    pub fn next_deadline(&self) -> Option<Duration> {
        [self.splash.deadline(), self.machine.pending_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn refresh_hover(&mut self) {
        let hovered = if self.pointer_inside && !self.splash_visible {
            self.scene.pick(self.input.pointer_ndc())
        } else {
            None
        };
        self.scene.set_hovered(hovered.as_ref());
    }

    /// Rebuilds the panel view; a change is reported by the next tick.
    fn refresh_panel(&mut self) {
        let view = InfoPanelPresenter::new(&self.content).present(self.state().visible_panel());
        if view == self.panel {
            return;
        }
        match &view {
            Some(view) => info!("panel opened: {}", view.title),
            None => info!("panel closed"),
        }
        self.panel = view;
        self.panel_changed = true;
    }
}

fn aspect((width, height): (u32, u32)) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// One scripted event for the headless summary mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Activate(Target),
    Close,
    Wait(Duration),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Activate(target) => write!(f, "activate \"{target}\""),
            Step::Close => f.write_str("close"),
            Step::Wait(duration) => write!(f, "wait {} ms", duration.as_millis()),
        }
    }
}

/// Drives a [`PortfolioApp`] on a simulated clock.
#[derive(Debug)]
pub struct ScriptRunner {
    app: PortfolioApp,
    now: Duration,
}

impl ScriptRunner {
    pub fn new(app: PortfolioApp) -> Self {
        Self {
            app,
            now: Duration::ZERO,
        }
    }

    pub fn app(&self) -> &PortfolioApp {
        &self.app
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Applies `step` and reports what happened to `out`.
    pub fn apply<W: Write>(&mut self, step: &Step, out: &mut W) -> io::Result<()> {
        match step {
            Step::Activate(target) => {
                self.app.activate(target.clone(), self.now);
            }
            Step::Close => {
                self.app.close();
            }
            Step::Wait(duration) => {
                let end = self.now.saturating_add(*duration);
                while self.now < end {
                    let frame = (self.now + SIMULATED_FRAME).min(end);
                    // Once nothing can fire before `end` the clock jumps there.
                    self.now = match self.app.next_deadline() {
                        Some(deadline) if deadline > self.now && deadline < end => {
                            frame.min(deadline)
                        }
                        Some(deadline) if deadline <= self.now => frame,
                        _ => end,
                    };
                    let outcome = self.app.tick(self.now);
                    if let Some(Transition::Settled(target)) = outcome.transition {
                        writeln!(
                            out,
                            "[{:>5} ms]   warp finished, panel {target} visible",
                            self.now.as_millis()
                        )?;
                    }
                }
            }
        }
        writeln!(
            out,
            "[{:>5} ms] {step} -> {}",
            self.now.as_millis(),
            self.app.state().phase()
        )
    }

    pub fn run<W: Write>(&mut self, steps: &[Step], out: &mut W) -> io::Result<()> {
        for step in steps {
            self.apply(step, out)?;
        }
        Ok(())
    }
}

/// Prints the site summary and the list of targets.
pub fn print_summary<W: Write>(content: &ContentStore, out: &mut W) -> io::Result<()> {
    writeln!(out, "Loaded portfolio for {}", content.name)?;
    writeln!(out, "{}", content.slogan)?;
    writeln!(out, "Targets:")?;
    for target in Target::ALL {
        writeln!(out, " - {target}")?;
    }
    Ok(())
}

/// Prints the final state and the visible panel.
pub fn print_final_state<W: Write>(app: &PortfolioApp, out: &mut W) -> io::Result<()> {
    writeln!(out, "Final state: {}", app.state().phase())?;
    match app.panel() {
        Some(panel) => write!(out, "{panel}"),
        None => writeln!(out, "No panel visible"),
    }
}
