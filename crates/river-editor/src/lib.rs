//! River Editor - the interactive river state driven by a host frame loop
//!
//! - `ControlPointStore` - the curve's control points, picking and dragging
//! - `RiverEditor` - parameters, splash pool and post-process chain, advanced
//!   through `init`, `on_frame_start`, `on_update`, `on_frame_end`,
//!   `on_input` and `on_input_update`

pub mod control_points;
mod editor;

pub use control_points::ControlPointStore;
pub use editor::{EditorStats, RiverEditor, CLEAR_COLOR, GIZMO_LIFT};
