//! Drop-target resolution for the board.
//!
//! Two phases: a card whose bounds overlap the dragged card wins (this is
//! what makes reordering inside dense columns land where the user aimed);
//! otherwise the column whose center is nearest wins, so empty columns and
//! the empty space below the last card still accept drops.

use uuid::Uuid;

use crate::model::TaskStatus;

/// Axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap area with `other`; zero when they only touch.
    pub fn intersection_area(&self, other: &Bounds) -> f32 {
        let left = self.x.max(other.x);
        let right = (self.x + self.width).min(other.x + other.width);
        let top = self.y.max(other.y);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            0.0
        } else {
            (right - left) * (bottom - top)
        }
    }

    fn center_distance(&self, other: &Bounds) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// What a drop resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Card(Uuid),
    Column(TaskStatus),
}

/// A droppable area registered by the board while rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub target: DropTarget,
    pub bounds: Bounds,
}

impl Region {
    pub fn card(task_id: Uuid, bounds: Bounds) -> Self {
        Self {
            target: DropTarget::Card(task_id),
            bounds,
        }
    }

    pub fn column(status: TaskStatus, bounds: Bounds) -> Self {
        Self {
            target: DropTarget::Column(status),
            bounds,
        }
    }
}

/// Resolve the drop target for a dragged card occupying `pointer`.
pub fn resolve_drop_target(pointer: Bounds, regions: &[Region]) -> Option<DropTarget> {
    let mut best_card: Option<(DropTarget, f32)> = None;
    for region in regions.iter().filter(|r| matches!(r.target, DropTarget::Card(_))) {
        let area = region.bounds.intersection_area(&pointer);
        if area > 0.0 && best_card.map_or(true, |(_, best)| area > best) {
            best_card = Some((region.target, area));
        }
    }
    if let Some((target, _)) = best_card {
        return Some(target);
    }

    let mut best_column: Option<(DropTarget, f32)> = None;
    for region in regions.iter().filter(|r| matches!(r.target, DropTarget::Column(_))) {
        let distance = region.bounds.center_distance(&pointer);
        if best_column.map_or(true, |(_, best)| distance < best) {
            best_column = Some((region.target, distance));
        }
    }
    best_column.map(|(target, _)| target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Region> {
        vec![
            Region::column(TaskStatus::Todo, Bounds::new(0.0, 0.0, 200.0, 600.0)),
            Region::column(TaskStatus::InProgress, Bounds::new(210.0, 0.0, 200.0, 600.0)),
            Region::column(TaskStatus::Done, Bounds::new(420.0, 0.0, 200.0, 600.0)),
        ]
    }

    #[test]
    fn overlapping_card_wins_over_column() {
        let card = Uuid::new_v4();
        let mut regions = columns();
        regions.push(Region::card(card, Bounds::new(215.0, 40.0, 190.0, 60.0)));

        let pointer = Bounds::new(220.0, 60.0, 190.0, 60.0);
        assert_eq!(resolve_drop_target(pointer, &regions), Some(DropTarget::Card(card)));
    }

    #[test]
    fn largest_overlap_picks_between_stacked_cards() {
        let upper = Uuid::new_v4();
        let lower = Uuid::new_v4();
        let regions = vec![
            Region::card(upper, Bounds::new(0.0, 0.0, 100.0, 50.0)),
            Region::card(lower, Bounds::new(0.0, 55.0, 100.0, 50.0)),
        ];
        // Mostly over the lower card.
        let pointer = Bounds::new(0.0, 40.0, 100.0, 50.0);
        assert_eq!(resolve_drop_target(pointer, &regions), Some(DropTarget::Card(lower)));
    }

    #[test]
    fn empty_column_resolves_by_nearest_center() {
        // Done column has no cards at all.
        let pointer = Bounds::new(430.0, 500.0, 190.0, 60.0);
        assert_eq!(
            resolve_drop_target(pointer, &columns()),
            Some(DropTarget::Column(TaskStatus::Done))
        );
    }

    #[test]
    fn touching_edges_do_not_count_as_overlap() {
        let card = Uuid::new_v4();
        let mut regions = columns();
        regions.push(Region::card(card, Bounds::new(0.0, 0.0, 100.0, 50.0)));
        let pointer = Bounds::new(100.0, 50.0, 50.0, 50.0);
        assert_eq!(
            resolve_drop_target(pointer, &regions),
            Some(DropTarget::Column(TaskStatus::Todo))
        );
    }

    #[test]
    fn nothing_registered_means_no_target() {
        assert_eq!(resolve_drop_target(Bounds::new(0.0, 0.0, 10.0, 10.0), &[]), None);
    }
}
