#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::web::{EventLoopExtWebSys, WindowAttributesExtWebSys};
use winit::window::{CursorIcon, Window};

use crate::app::{OVERLAY_CSS, SPLASH_MESSAGE};
use crate::scene::SceneFrame;
use crate::{
    AboutAffordance, ContentStore, MouseButton, PortfolioApp, Renderer, SceneConfig, Target,
    Timings,
};

/// Requests raised by DOM controls, drained on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomCommand {
    About,
    Close,
}

type CommandQueue = Rc<RefCell<Vec<DomCommand>>>;

/// Starts the portfolio on the canvas with id `canvas_id`. `content_xml`
/// replaces the built-in content when given.
#[wasm_bindgen]
pub async fn run(canvas_id: String, content_xml: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let content = match content_xml {
        Some(xml) => ContentStore::from_xml(&xml),
        None => ContentStore::builtin(),
    }
    .map_err(|err| JsValue::from_str(&format!("failed to load content: {err}")))?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))?;
    let element = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?;
    let canvas: web_sys::HtmlCanvasElement = element
        .dyn_into()
        .map_err(|_| JsValue::from_str("element is not a canvas"))?;

    let event_loop = EventLoop::new()
        .map_err(|err| JsValue::from_str(&format!("failed to create event loop: {err}")))?;
    #[allow(deprecated)]
    let window = Arc::new(
        event_loop
            .create_window(
                Window::default_attributes()
                    .with_canvas(Some(canvas))
                    .with_title(&content.name)
                    .with_inner_size(LogicalSize::new(1280.0, 720.0)),
            )
            .map_err(|err| JsValue::from_str(&format!("window error: {err}")))?,
    );

    let size = window.inner_size();
    let app = PortfolioApp::new(
        content,
        Timings::default(),
        SceneConfig::default(),
        AboutAffordance::Button,
        (size.width, size.height),
        rand::random(),
    );
    let renderer = Renderer::new(Arc::clone(&window), app.scene().particles())
        .await
        .map_err(|err| JsValue::from_str(&format!("renderer error: {err}")))?;

    let commands: CommandQueue = Rc::default();
    let overlay = Overlay::build(&document, &app, &commands)?;
    log_to_console(&format!("Loaded portfolio for {}", app.title()));

    let mut state = WebAppState {
        renderer,
        app,
        overlay,
        commands,
        started: Instant::now(),
        pointer_cursor: false,
    };

    #[allow(deprecated)]
    event_loop.spawn(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);
        if let Err(err) = state.process_event(event, elwt) {
            log_to_console(&format!("Error: {err:?}"));
            elwt.exit();
        }
    });

    Ok(())
}

fn log_to_console(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

struct WebAppState {
    renderer: Renderer,
    app: PortfolioApp,
    overlay: Overlay,
    commands: CommandQueue,
    started: Instant,
    pointer_cursor: bool,
}

impl WebAppState {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn process_event(
        &mut self,
        event: Event<()>,
        elwt: &ActiveEventLoop,
    ) -> Result<(), JsValue> {
        match event {
            Event::WindowEvent { event, window_id } if window_id == self.renderer.window_id() => {
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
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
                                let now = self.now();
                                self.app.pointer_pressed(button, now);
                            }
                            ElementState::Released => self.app.pointer_released(button),
                        }
                    }
                    WindowEvent::RedrawRequested => self.redraw()?,
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.renderer.window().request_redraw();
            }
            _ => {}
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), JsValue> {
        let now = self.now();
        let queued: Vec<DomCommand> = self.commands.borrow_mut().drain(..).collect();
        for command in queued {
            match command {
                DomCommand::About => {
                    self.app.activate(Target::ABOUT_ME, now);
                }
                DomCommand::Close => {
                    self.app.close();
                }
            }
        }

        let outcome = self.app.tick(now);
        let frame = self.app.frame();
        if outcome.panel_changed {
            self.overlay.show_panel(self.app.panel().map(|panel| panel.to_html()))?;
        }
        let scale_factor = self.renderer.window().scale_factor();
        self.overlay.sync(&self.app, &frame, scale_factor)?;

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

        if let Err(err) = self.renderer.render(&frame) {
            match err {
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                    let size = self.renderer.window().inner_size();
                    self.renderer.resize(size);
                }
                wgpu::SurfaceError::OutOfMemory => {
                    return Err(JsValue::from_str("GPU is out of memory"));
                }
                wgpu::SurfaceError::Timeout => {
                    log_to_console("Surface timeout; retrying next frame");
                }
                wgpu::SurfaceError::Other => {
                    log_to_console("Surface reported an unknown error; retrying next frame");
                }
            }
        }
        Ok(())
    }
}

/// DOM layer drawn over the canvas: splash, hero title, About button,
/// crystal labels and the info panel.
struct Overlay {
    document: Document,
    splash: HtmlElement,
    hero: HtmlElement,
    about_button: HtmlElement,
    panel: HtmlElement,
    label_layer: HtmlElement,
    labels: Vec<HtmlElement>,
}

impl Overlay {
    fn build(
        document: &Document,
        app: &PortfolioApp,
        commands: &CommandQueue,
    ) -> Result<Self, JsValue> {
        let body = document.body().ok_or_else(|| JsValue::from_str("missing body"))?;
        let style = document.create_element("style")?;
        style.set_text_content(Some(OVERLAY_CSS));
        body.append_child(&style)?;

        let splash = element(document, "div", "splash")?;
        splash.set_text_content(Some(SPLASH_MESSAGE));

        let hero = element(document, "div", "hero")?;
        let title = element(document, "h1", "hero-title")?;
        title.set_text_content(Some(app.title()));
        let slogan = element(document, "p", "hero-slogan")?;
        slogan.set_text_content(Some(app.slogan()));
        hero.append_child(&title)?;
        hero.append_child(&slogan)?;

        let about_button = element(document, "button", "about-button")?;
        about_button.set_text_content(Some(Target::ABOUT_ME.label()));
        on_click(&about_button, commands, |_| Some(DomCommand::About))?;

        let panel = element(document, "div", "info-panel")?;
        on_click(&panel, commands, |event| {
            let target: Element = event.target()?.dyn_into().ok()?;
            target.closest(".close-button").ok().flatten()?;
            Some(DomCommand::Close)
        })?;

        let label_layer = element(document, "div", "crystal-labels")?;

        for node in [&splash, &hero, &about_button, &panel, &label_layer] {
            body.append_child(node)?;
        }

        let overlay = Self {
            document: document.clone(),
            splash,
            hero,
            about_button,
            panel,
            label_layer,
            labels: Vec::new(),
        };
        overlay.show_panel(None)?;
        Ok(overlay)
    }

    fn show_panel(&self, html: Option<String>) -> Result<(), JsValue> {
        match html {
            Some(html) => {
                self.panel.set_inner_html(&html);
                set_visible(&self.panel, true)
            }
            None => {
                self.panel.set_inner_html("");
                set_visible(&self.panel, false)
            }
        }
    }

    fn sync(
        &mut self,
        app: &PortfolioApp,
        frame: &SceneFrame,
        scale_factor: f64,
    ) -> Result<(), JsValue> {
        let splash = app.splash_visible();
        set_visible(&self.splash, splash)?;
        set_visible(&self.hero, !splash)?;
        set_visible(&self.about_button, app.about_button_visible())?;
        set_visible(&self.label_layer, !splash)?;

        while self.labels.len() < frame.labels.len() {
            let label = element(&self.document, "div", "crystal-label")?;
            self.label_layer.append_child(&label)?;
            self.labels.push(label);
        }

        let (width, height) = app.input().viewport();
        let scale = scale_factor.max(f64::EPSILON) as f32;
        let css_size = Vec2::new(width as f32, height as f32) / scale;
        for (index, element) in self.labels.iter().enumerate() {
            let Some(label) = frame.labels.get(index) else {
                set_visible(element, false)?;
                continue;
            };
            let ndc = frame.camera.view_proj.project_point3(label.position);
            let x = (ndc.x + 1.0) / 2.0 * css_size.x;
            let y = (1.0 - ndc.y) / 2.0 * css_size.y;
            element.set_text_content(Some(&label.text));
            let style = element.style();
            style.set_property("left", &format!("{x:.1}px"))?;
            style.set_property("top", &format!("{y:.1}px"))?;
            set_visible(element, true)?;
        }
        Ok(())
    }
}

fn element(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let element: HtmlElement = document.create_element(tag)?.dyn_into()?;
    element.set_class_name(class);
    Ok(element)
}

fn set_visible(element: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    element
        .style()
        .set_property("display", if visible { "" } else { "none" })
}

fn on_click<F>(element: &HtmlElement, commands: &CommandQueue, handler: F) -> Result<(), JsValue>
where
    F: Fn(&MouseEvent) -> Option<DomCommand> + 'static,
{
    let commands = Rc::clone(commands);
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        event.stop_propagation();
        if let Some(command) = handler(&event) {
            commands.borrow_mut().push(command);
        }
    });
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
