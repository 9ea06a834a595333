//! Discrete input events delivered by the host between frames

use winit::keyboard::KeyCode;

/// Mouse button index, matching the host's numbering (0 = left)
pub type MouseButton = u32;

pub const LEFT_MOUSE_BUTTON: MouseButton = 0;

/// An input event in window coordinates (pixels, y pointing down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(KeyCode),
    KeyReleased(KeyCode),
    MouseMoved { x: f64, y: f64 },
    MouseButtonPressed { x: f64, y: f64, button: MouseButton },
    MouseButtonReleased { x: f64, y: f64, button: MouseButton },
    MouseScrolled { x: f64, y: f64, dx: f64, dy: f64 },
}
