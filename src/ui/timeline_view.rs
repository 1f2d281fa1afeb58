use crate::layout::timeline::{PlanMarker, TimelineGrid, TimelineRow, MONTH_LABELS};
use crate::layout::ExpandedProjects;
use crate::model::Task;
use crate::ui::theme;
use chrono::Datelike;
use egui::{Align2, Color32, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const LABEL_WIDTH: f32 = theme::LABEL_COLUMN_WIDTH;

/// Actions the timeline can request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineAction {
    None,
    ToggleProject(Uuid),
    SelectTask(Uuid),
    SetYear(i32),
}

/// Render the annual project timeline.
pub fn show_timeline(grid: &TimelineGrid<'_>, expanded: &ExpandedProjects, years: &[i32], ui: &mut Ui) -> TimelineAction {
    let mut action = TimelineAction::None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        stat(ui, "Projects", grid.stats.total_projects.to_string());
        stat(ui, "Tasks", grid.stats.total_tasks.to_string());
        stat(ui, "Avg. progress", format!("{}%", grid.stats.average_progress));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(8.0);
            if let Some(year) = year_picker(ui, grid.year, years) {
                action = TimelineAction::SetYear(year);
            }
            ui.add_space(12.0);
            for marker in [PlanMarker::Planned, PlanMarker::Delayed, PlanMarker::Actual] {
                ui.label(RichText::new(marker.label()).size(10.5).color(theme::TEXT_SECONDARY));
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(swatch, Rounding::same(2.0), marker.color());
            }
        });
    });
    ui.add_space(6.0);

    if grid.groups.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("No projects to show").size(14.0).color(theme::TEXT_DIM));
        });
        return action;
    }

    egui::ScrollArea::vertical()
        .id_salt("timeline-rows")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let width = ui.available_width().max(LABEL_WIDTH + 12.0 * 24.0);
            let cell_width = (width - LABEL_WIDTH) / 12.0;

            month_header(ui, width, cell_width, grid.current_month);

            for group in &grid.groups {
                group_header(ui, width, &group.name, group.rows.len());
                for row in &group.rows {
                    if project_row(ui, row, width, cell_width, expanded.is_expanded(row.project.id)) {
                        action = TimelineAction::ToggleProject(row.project.id);
                    }
                    if expanded.is_expanded(row.project.id) {
                        if row.project.tasks.is_empty() {
                            empty_tasks_row(ui, width);
                        }
                        for task in &row.project.tasks {
                            if task_row(ui, task, grid.year, width, cell_width) {
                                action = TimelineAction::SelectTask(task.id);
                            }
                        }
                    }
                }
            }
        });

    action
}

fn stat(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).size(11.0).color(theme::TEXT_DIM));
    ui.label(RichText::new(value).strong().size(14.0).color(theme::TEXT_PRIMARY));
    ui.add_space(14.0);
}

/// Returns the newly picked year.
fn year_picker(ui: &mut Ui, year: i32, years: &[i32]) -> Option<i32> {
    let mut picked = None;
    let later = years.iter().copied().find(|y| *y > year);
    let earlier = years.iter().rev().copied().find(|y| *y < year);

    if ui
        .add_enabled(later.is_some(), egui::Button::new(egui_phosphor::regular::CARET_RIGHT))
        .clicked()
    {
        picked = later;
    }
    ui.label(RichText::new(year.to_string()).strong().size(14.0));
    if ui
        .add_enabled(earlier.is_some(), egui::Button::new(egui_phosphor::regular::CARET_LEFT))
        .clicked()
    {
        picked = earlier;
    }
    picked
}

fn month_header(ui: &mut Ui, width: f32, cell_width: f32, current: Option<u32>) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, ROW_HEIGHT), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, theme::BG_HEADER);
    painter.text(
        Pos2::new(rect.left() + 10.0, rect.center().y),
        Align2::LEFT_CENTER,
        "Project",
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );
    for (i, label) in MONTH_LABELS.iter().enumerate() {
        let cell = month_cell(rect, i, cell_width);
        if current == Some(i as u32) {
            painter.rect_filled(cell, 0.0, theme::CURRENT_MONTH);
        }
        let color = if current == Some(i as u32) {
            theme::TEXT_PRIMARY
        } else {
            theme::TEXT_SECONDARY
        };
        painter.text(cell.center(), Align2::CENTER_CENTER, *label, theme::font_header(), color);
    }
}

fn month_cell(row: Rect, month0: usize, cell_width: f32) -> Rect {
    Rect::from_min_size(
        Pos2::new(row.left() + LABEL_WIDTH + month0 as f32 * cell_width, row.top()),
        Vec2::new(cell_width, row.height()),
    )
}

fn group_header(ui: &mut Ui, width: f32, name: &str, count: usize) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 24.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, theme::BG_PANEL);
    ui.painter().text(
        Pos2::new(rect.left() + 8.0, rect.center().y),
        Align2::LEFT_CENTER,
        format!("{}  ({})", name, count),
        theme::font_header(),
        theme::ACCENT,
    );
}

/// Returns true when the expand toggle was clicked.
fn project_row(ui: &mut Ui, row: &TimelineRow<'_>, width: f32, cell_width: f32, is_expanded: bool) -> bool {
    let project = row.project;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, ROW_HEIGHT), Sense::click());
    let painter = ui.painter();

    if response.hovered() {
        painter.rect_filled(rect, 0.0, theme::BG_ROW_HOVER);
    }
    for cell in &row.months {
        let cell_rect = month_cell(rect, cell.month0 as usize, cell_width);
        if cell.current {
            painter.rect_filled(cell_rect, 0.0, theme::CURRENT_MONTH);
        }
        if let Some(color) = cell.color {
            painter.rect_filled(
                cell_rect.shrink2(Vec2::new(2.0, theme::BAR_INSET)),
                Rounding::same(3.0),
                color,
            );
        }
        painter.line_segment(
            [cell_rect.left_top(), cell_rect.left_bottom()],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    let expandable = project.total_tasks() > 0 || !project.tasks.is_empty();
    let mut x = rect.left() + 8.0;
    if expandable {
        let caret = if is_expanded {
            egui_phosphor::regular::CARET_DOWN
        } else {
            egui_phosphor::regular::CARET_RIGHT
        };
        painter.text(Pos2::new(x, rect.center().y), Align2::LEFT_CENTER, caret, theme::font_sub(), theme::TEXT_SECONDARY);
    }
    x += 16.0;
    painter.circle_filled(Pos2::new(x, rect.center().y), 4.0, project.display_color(theme::FALLBACK_PROJECT));
    x += 10.0;

    let label_rect = Rect::from_min_max(Pos2::new(x, rect.top()), Pos2::new(rect.left() + LABEL_WIDTH - 44.0, rect.bottom()));
    let galley = painter.layout_no_wrap(project.name.clone(), theme::font_bar(), theme::TEXT_PRIMARY);
    painter
        .with_clip_rect(label_rect)
        .galley(Pos2::new(x, rect.center().y - galley.size().y / 2.0), galley, Color32::TRANSPARENT);
    painter.text(
        Pos2::new(rect.left() + LABEL_WIDTH - 8.0, rect.center().y),
        Align2::RIGHT_CENTER,
        format!("{:.0}%", project.progress),
        theme::font_small(),
        theme::TEXT_DIM,
    );
    painter.line_segment(
        [rect.left_bottom(), rect.right_bottom()],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );

    let response = response.on_hover_ui(|ui| {
        ui.strong(&project.name);
        ui.label(format!("Status: {}", project.status.label()));
        ui.label(format!("Tasks: {}", project.total_tasks()));
        if let Some(owner) = &project.owner {
            ui.label(format!("Owner: {}", owner.name));
        }
    });
    expandable && response.clicked()
}

fn empty_tasks_row(ui: &mut Ui, width: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, ROW_HEIGHT - 6.0), Sense::hover());
    ui.painter().text(
        Pos2::new(rect.left() + 48.0, rect.center().y),
        Align2::LEFT_CENTER,
        "Tasks were not included in this response",
        theme::font_small(),
        theme::TEXT_DIM,
    );
}

/// Returns true when the row was clicked.
fn task_row(ui: &mut Ui, task: &Task, year: i32, width: f32, cell_width: f32) -> bool {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, ROW_HEIGHT - 4.0), Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, if response.hovered() { theme::BG_ROW_HOVER } else { theme::BG_ROW_EVEN });

    let x = rect.left() + 40.0;
    painter.text(
        Pos2::new(x, rect.center().y),
        Align2::LEFT_CENTER,
        task.status.icon(),
        theme::font_sub(),
        task.status.color(),
    );
    let label_rect = Rect::from_min_max(Pos2::new(x + 16.0, rect.top()), Pos2::new(rect.left() + LABEL_WIDTH - 4.0, rect.bottom()));
    let galley = painter.layout_no_wrap(task.title.clone(), theme::font_sub(), theme::TEXT_SECONDARY);
    painter.with_clip_rect(label_rect).galley(
        Pos2::new(label_rect.left(), rect.center().y - galley.size().y / 2.0),
        galley,
        Color32::TRANSPARENT,
    );

    // Thin bar over the months the task spans in this year.
    if let Some((start, end)) = task.date_span() {
        if start.year() <= year && end.year() >= year {
            let first = if start.year() < year { 0 } else { start.month0() as usize };
            let last = if end.year() > year { 11 } else { end.month0() as usize };
            let left = month_cell(rect, first, cell_width).left() + 2.0;
            let right = month_cell(rect, last, cell_width).right() - 2.0;
            let bar = Rect::from_min_max(
                Pos2::new(left, rect.center().y - 3.0),
                Pos2::new(right, rect.center().y + 3.0),
            );
            painter.rect_filled(bar, Rounding::same(3.0), task.status.color());
        }
    }

    response
        .on_hover_text(format!("{} ({}, {}%)", task.title, task.status.label(), task.progress))
        .clicked()
}
