//! Derived view data for the timeline and Gantt views. Pure functions over
//! model values; nothing here touches egui widgets.

pub mod gantt;
pub mod timeline;

pub use gantt::GanttLayout;
pub use timeline::{build_year_grid, ExpandedProjects};
