//! Kanban drag-and-drop: target resolution and optimistic reconciliation.

pub mod board;
pub mod collision;

pub use board::{persist_plan, Board, DropPlan, SettledMove};
pub use collision::{resolve_drop_target, Bounds, DropTarget, Region};
