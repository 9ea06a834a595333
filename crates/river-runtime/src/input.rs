//! Input state management

use crate::event::{InputEvent, MouseButton};
use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Action names bound by default
pub mod actions {
    /// Held: grow the river width
    pub const WIDEN: &str = "widen";
    /// Held: shrink the river width
    pub const NARROW: &str = "narrow";
    /// Held: increase texture tiling
    pub const TILE_MORE: &str = "tile_more";
    /// Held: decrease texture tiling
    pub const TILE_LESS: &str = "tile_less";
    /// Per press: speed the flow up one step
    pub const FLOW_FASTER: &str = "flow_faster";
    /// Per press: slow the flow down one step
    pub const FLOW_SLOWER: &str = "flow_slower";
    /// Per press: advance the post-process chain
    pub const CYCLE_POSTPROCESS: &str = "cycle_postprocess";
    /// Mouse: pick and drag control points
    pub const DRAG: &str = "drag";
}

/// Tracks keyboard and mouse input state per frame
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held
    mouse_buttons_down: HashSet<MouseButton>,

    /// Current mouse position in window pixels
    pub mouse_position: (f64, f64),
    /// Mouse movement delta this frame
    mouse_delta: (f64, f64),
    /// Scroll accumulated this frame
    scroll_delta: (f64, f64),

    /// Action map: action name -> list of key bindings
    action_map: HashMap<String, Vec<KeyCode>>,

    /// Mouse button action map: action name -> list of mouse button indices
    mouse_button_map: HashMap<String, Vec<MouseButton>>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            mouse_position: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            scroll_delta: (0.0, 0.0),
            action_map: Self::default_action_map(),
            mouse_button_map: Self::default_mouse_button_map(),
        }
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert(actions::WIDEN.into(), vec![KeyCode::KeyT]);
        map.insert(actions::NARROW.into(), vec![KeyCode::KeyR]);
        map.insert(actions::TILE_MORE.into(), vec![KeyCode::KeyP]);
        map.insert(actions::TILE_LESS.into(), vec![KeyCode::KeyO]);
        // Equal/Minus for keyboards without a numpad
        map.insert(
            actions::FLOW_FASTER.into(),
            vec![KeyCode::NumpadAdd, KeyCode::Equal],
        );
        map.insert(
            actions::FLOW_SLOWER.into(),
            vec![KeyCode::NumpadSubtract, KeyCode::Minus],
        );
        map.insert(actions::CYCLE_POSTPROCESS.into(), vec![KeyCode::KeyE]);
        map
    }

    fn default_mouse_button_map() -> HashMap<String, Vec<MouseButton>> {
        let mut map = HashMap::new();
        map.insert(actions::DRAG.into(), vec![0]);
        map
    }

    /// Bind an action to one or more keys
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Update held state from a discrete event
    pub fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyPressed(key) => self.process_key_down(key),
            InputEvent::KeyReleased(key) => self.process_key_up(key),
            InputEvent::MouseMoved { x, y } => self.process_mouse_move(x, y),
            InputEvent::MouseButtonPressed { x, y, button } => {
                self.process_mouse_move(x, y);
                self.mouse_buttons_down.insert(button);
            }
            InputEvent::MouseButtonReleased { x, y, button } => {
                self.process_mouse_move(x, y);
                self.mouse_buttons_down.remove(&button);
            }
            InputEvent::MouseScrolled { dx, dy, .. } => {
                self.scroll_delta.0 += dx;
                self.scroll_delta.1 += dy;
            }
        }
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.keys_down.contains(&key) {
            self.keys_just_pressed.insert(key);
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Process mouse movement (cursor position mode)
    pub fn process_mouse_move(&mut self, x: f64, y: f64) {
        self.mouse_delta.0 += x - self.mouse_position.0;
        self.mouse_delta.1 += y - self.mouse_position.1;
        self.mouse_position = (x, y);
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = (0.0, 0.0);
    }

    // --- Query methods ---

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed this frame?
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Is an action currently held? (any bound key or mouse button is down)
    pub fn is_action_pressed(&self, action: &str) -> bool {
        let key_match = self
            .action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false);
        let mouse_match = self
            .mouse_button_map
            .get(action)
            .map(|btns| btns.iter().any(|b| self.mouse_buttons_down.contains(b)))
            .unwrap_or(false);
        key_match || mouse_match
    }

    /// Does `key` trigger `action`?
    pub fn key_triggers(&self, key: KeyCode, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.contains(&key))
            .unwrap_or(false)
    }

    /// Does mouse `button` trigger `action`?
    pub fn button_triggers(&self, button: MouseButton, action: &str) -> bool {
        self.mouse_button_map
            .get(action)
            .map(|btns| btns.contains(&button))
            .unwrap_or(false)
    }

    /// Net direction of a held action pair: +1, -1 or 0
    pub fn axis(&self, positive: &str, negative: &str) -> f32 {
        let mut value = 0.0;
        if self.is_action_pressed(positive) {
            value += 1.0;
        }
        if self.is_action_pressed(negative) {
            value -= 1.0;
        }
        value
    }

    /// Get the mouse movement delta this frame
    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    /// Get the scroll accumulated this frame
    pub fn scroll_delta(&self) -> (f64, f64) {
        self.scroll_delta
    }

    /// Is a mouse button currently held?
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }
}
