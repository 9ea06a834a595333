//! River Runtime - Host loop building blocks
//!
//! Provides what the host loop feeds into the editor:
//! - `FrameClock` - elapsed and per-frame time
//! - `InputState` - held-key tracking with river action bindings
//! - `InputEvent` / `EventBus` - discrete input events queued between frames

mod clock;
mod event;
mod event_bus;
mod input;

pub use clock::FrameClock;
pub use event::{InputEvent, MouseButton, LEFT_MOUSE_BUTTON};
pub use event_bus::EventBus;
pub use input::{actions, InputState};
pub use winit::keyboard::KeyCode;
