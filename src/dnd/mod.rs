//! Drag & Drop
//!
//! - **DragCoordinator**: Owns the single in-flight drag gesture
//!   (idle → dragging → dropped) and the active drop target marker
//! - **reorder**: Pure helpers turning indices and drop targets into
//!   "insert after predecessor" requests and applying them optimistically

mod reorder;
mod session;

pub use reorder::{
    apply_optimistic, predecessor_for_drop, ReorderError, ReorderPlan, HEADER_ROWS,
};
pub use session::{DragCoordinator, DragPhase, DragSession, DropTarget};
