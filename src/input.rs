use std::collections::HashSet;

use glam::Vec2;

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const MIDDLE: Self = Self(2);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Winit;
        match button {
            Winit::Left => Self::LEFT,
            Winit::Right => Self::RIGHT,
            Winit::Middle => Self::MIDDLE,
            Winit::Back => Self(3),
            Winit::Forward => Self(4),
            Winit::Other(value) => Self(value.min(u8::MAX as u16) as u8),
        }
    }
}

/// Pointer state owned by the app shell and fed by the window event handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    buttons: HashSet<MouseButton>,
    position: Vec2,
    viewport: (u32, u32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn set_button_down(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn set_button_up(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Records the pointer position in physical pixels, origin top-left.
    pub fn set_pointer_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn pointer_position(&self) -> Vec2 {
        self.position
    }

    /// Pointer position in normalized device coordinates: x to the right and
    /// y up, both in `[-1, 1]`.
    pub fn pointer_ndc(&self) -> Vec2 {
        let (width, height) = self.viewport;
        pixel_to_ndc(self.position, width, height)
    }
}

pub fn pixel_to_ndc(position: Vec2, width: u32, height: u32) -> Vec2 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    let ndc = Vec2::new(
        position.x / width * 2.0 - 1.0,
        1.0 - position.y / height * 2.0,
    );
    ndc.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_buttons() {
        let mut state = InputState::new();
        state.set_button_down(MouseButton::LEFT);
        assert!(state.is_button_down(MouseButton::LEFT));
        assert!(!state.is_button_down(MouseButton::RIGHT));
        state.set_button_up(MouseButton::LEFT);
        assert!(!state.is_button_down(MouseButton::LEFT));
    }

    #[test]
    fn maps_window_buttons() {
        assert_eq!(MouseButton::from(winit::event::MouseButton::Left), MouseButton::LEFT);
        assert_eq!(MouseButton::from(winit::event::MouseButton::Right), MouseButton::RIGHT);
        assert_eq!(MouseButton::from(winit::event::MouseButton::Other(9)).index(), 9);
    }

    #[test]
    fn converts_pixels_to_ndc() {
        assert_eq!(pixel_to_ndc(Vec2::new(0.0, 0.0), 200, 100), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(100.0, 50.0), 200, 100), Vec2::ZERO);
        assert_eq!(pixel_to_ndc(Vec2::new(200.0, 100.0), 200, 100), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn pointer_ndc_uses_viewport_and_clamps() {
        let mut state = InputState::new();
        state.set_viewport(400, 300);
        state.set_pointer_position(Vec2::new(500.0, 150.0));
        assert_eq!(state.pointer_ndc(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn app_shell_sees_pointer_updates_through_plain_fields() {
        let mut state = InputState::new();
        state.set_viewport(0, 0);
        assert_eq!(state.viewport(), (1, 1));

        let before = state.clone();
        state.set_viewport(800, 600);
        state.set_pointer_position(Vec2::new(200.0, 450.0));
        state.set_button_down(MouseButton::RIGHT);
        assert_ne!(state, before);
        assert_eq!(state.pointer_position(), Vec2::new(200.0, 450.0));
        assert_eq!(state.pointer_ndc(), Vec2::new(-0.5, -0.5));
        assert!(state.is_button_down(MouseButton::RIGHT));
        assert!(!before.is_button_down(MouseButton::RIGHT));
    }
}
