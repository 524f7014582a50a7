//! Interactive 3D portfolio: floating crystals that warp the camera into
//! info panels.
//!
//! The UI state machine, content store and panel presenter are plain data
//! and run without a window, which keeps them testable and lets the binary
//! replay scripted sessions headlessly. Rendering and platform integration
//! live in `render` and the `web` entry point.

pub mod app;
pub mod content;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod picking;
pub mod render;
pub mod scene;
pub mod target;
pub mod timer;
pub mod ui_state;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{PortfolioApp, Step, TickOutcome};
pub use content::{ContentError, ContentRecord, ContentStore};
pub use input::{InputState, MouseButton};
pub use panel::{InfoPanelPresenter, PanelView};
pub use render::{CameraParams, LightParams, Renderer};
pub use scene::{AboutAffordance, SceneConfig, SceneController, SceneFrame};
pub use target::Target;
pub use timer::{OneShotTimer, TimerToken};
pub use ui_state::{Phase, Timings, Transition, UiState, UiStateMachine};
