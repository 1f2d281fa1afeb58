use crate::layout::gantt::GanttRow;
use crate::layout::GanttLayout;
use crate::ui::theme;
use chrono::NaiveDate;
use egui::{Align2, Color32, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const LABEL_WIDTH: f32 = theme::LABEL_COLUMN_WIDTH;
const MIN_CHART_WIDTH: f32 = 480.0;

/// Render the Gantt chart. Returns the task whose bar or label was clicked.
pub fn show_gantt_chart(layout: &GanttLayout, selected: Option<Uuid>, today: NaiveDate, ui: &mut Ui) -> Option<Uuid> {
    if layout.is_empty() {
        show_empty_state(layout.undated, ui);
        return None;
    }

    let mut clicked = None;
    let available = ui.available_size();
    let chart_height = HEADER_HEIGHT + layout.rows.len() as f32 * (ROW_HEIGHT + ROW_PADDING) + 20.0;

    egui::ScrollArea::both()
        .id_salt("gantt-canvas")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let width = available.x.max(LABEL_WIDTH + MIN_CHART_WIDTH);
            let (response, painter) =
                ui.allocate_painter(Vec2::new(width, chart_height.max(available.y)), Sense::hover());
            let origin = response.rect.min;
            let chart_left = origin.x + LABEL_WIDTH;
            let chart_width = width - LABEL_WIDTH;
            let x_at = |percent: f32| chart_left + chart_width * percent / 100.0;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

            draw_header(&painter, origin, layout, chart_left, chart_width);

            for (i, row) in layout.rows.iter().enumerate() {
                let y = origin.y + HEADER_HEIGHT + i as f32 * (ROW_HEIGHT + ROW_PADDING);
                let row_rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, ROW_HEIGHT + ROW_PADDING));
                let is_selected = selected == Some(row.task_id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };
                painter.rect_filled(row_rect, 0.0, row_bg);
                painter.line_segment(
                    [row_rect.left_bottom(), row_rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );

                draw_row_label(&painter, row, row_rect);

                let bar_rect = Rect::from_min_max(
                    Pos2::new(x_at(row.left_percent), y + theme::BAR_INSET),
                    Pos2::new(
                        x_at((row.left_percent + row.width_percent).min(100.0)),
                        y + ROW_HEIGHT - theme::BAR_INSET,
                    ),
                );
                draw_task_bar(&painter, row, bar_rect, is_selected);

                let bar_response = ui
                    .interact(row_rect, ui.make_persistent_id(("gantt-row", row.task_id)), Sense::click())
                    .on_hover_ui_at_pointer(|ui| {
                        ui.strong(&row.title);
                        ui.label(format!(
                            "{} to {} ({} day{})",
                            row.start.format("%Y-%m-%d"),
                            row.end.format("%Y-%m-%d"),
                            row.duration_days,
                            if row.duration_days == 1 { "" } else { "s" }
                        ));
                        ui.label(format!("{} · {} priority", row.status.label(), row.priority.label()));
                        ui.label(format!("Progress: {}%", row.progress));
                    });
                if bar_response.clicked() {
                    clicked = Some(row.task_id);
                }
            }

            // Label column divider
            painter.line_segment(
                [
                    Pos2::new(chart_left, origin.y),
                    Pos2::new(chart_left, response.rect.bottom()),
                ],
                Stroke::new(1.0, theme::BORDER_SUBTLE),
            );

            if let Some(percent) = layout.today_percent(today) {
                draw_today_line(&painter, x_at(percent), origin.y, response.rect.bottom());
            }
        });

    if layout.undated > 0 {
        ui.label(
            RichText::new(format!("{} task(s) without dates are not shown", layout.undated))
                .size(10.5)
                .color(theme::TEXT_DIM),
        );
    }

    clicked
}

fn show_empty_state(undated: usize, ui: &mut Ui) {
    ui.add_space(60.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(egui_phosphor::regular::CHART_BAR_HORIZONTAL)
                .size(36.0)
                .color(theme::TEXT_DIM),
        );
        ui.add_space(6.0);
        ui.label(RichText::new("No tasks with dates to show").size(14.0).color(theme::TEXT_SECONDARY));
        if undated > 0 {
            ui.label(
                RichText::new(format!("{} task(s) have no start or due date", undated))
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
        }
    });
}

/// Months on top, weeks below. Each month is as wide as its weeks.
fn draw_header(painter: &egui::Painter, origin: Pos2, layout: &GanttLayout, chart_left: f32, chart_width: f32) {
    let half = HEADER_HEIGHT / 2.0;
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(chart_left - origin.x + chart_width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.text(
        Pos2::new(origin.x + 10.0, origin.y + HEADER_HEIGHT / 2.0),
        Align2::LEFT_CENTER,
        "Task",
        theme::font_header(),
        theme::TEXT_SECONDARY,
    );

    let mut x = chart_left;
    for month in &layout.months {
        let w = chart_width * month.width_percent / 100.0;
        let cell = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(w, half));
        painter.line_segment([cell.left_top(), cell.left_bottom()], Stroke::new(0.5, theme::GRID_LINE));
        painter
            .with_clip_rect(cell)
            .text(cell.left_center() + Vec2::new(5.0, 0.0), Align2::LEFT_CENTER, &month.label, theme::font_header(), theme::TEXT_PRIMARY);
        x += w;
    }

    // Weeks sit on the bar axis, so gridlines match bar dates.
    let week_width = chart_width * 7.0 / layout.total_days.max(7) as f32;
    for week in &layout.weeks {
        let x = chart_left + chart_width * week.left_percent / 100.0;
        painter.line_segment(
            [Pos2::new(x, origin.y + half), Pos2::new(x, origin.y + 4000.0)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        if week_width >= 24.0 {
            painter.text(
                Pos2::new(x + 3.0, origin.y + half + half / 2.0),
                Align2::LEFT_CENTER,
                &week.label,
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }
    }
}

fn draw_row_label(painter: &egui::Painter, row: &GanttRow, row_rect: Rect) {
    let indent = if row.is_subtask { 22.0 } else { 10.0 };
    let label_rect = Rect::from_min_max(
        Pos2::new(row_rect.left() + indent, row_rect.top()),
        Pos2::new(row_rect.left() + LABEL_WIDTH - 44.0, row_rect.bottom()),
    );
    let galley = painter.layout_no_wrap(row.title.clone(), theme::font_bar(), theme::TEXT_PRIMARY);
    let text_y = row_rect.center().y - galley.size().y / 2.0;
    painter
        .with_clip_rect(label_rect)
        .galley(Pos2::new(label_rect.left(), text_y), galley, Color32::TRANSPARENT);
    painter.text(
        Pos2::new(row_rect.left() + LABEL_WIDTH - 8.0, row_rect.center().y),
        Align2::RIGHT_CENTER,
        format!("{}d", row.duration_days),
        theme::font_small(),
        theme::TEXT_DIM,
    );
}

fn draw_task_bar(painter: &egui::Painter, row: &GanttRow, bar_rect: Rect, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, row.bar_color);

    if row.progress > 0 {
        let progress_width = bar_rect.width() * f32::from(row.progress.min(100)) / 100.0;
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    // Priority shows as the left border.
    painter.rect_filled(
        Rect::from_min_size(bar_rect.min, Vec2::new(3.0_f32.min(bar_rect.width()), bar_rect.height())),
        Rounding {
            nw: theme::BAR_ROUNDING,
            sw: theme::BAR_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        row.border_color,
    );

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(row.title.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.center().y - galley.size().y / 2.0;
        painter
            .with_clip_rect(bar_rect)
            .galley(Pos2::new(bar_rect.left() + 7.0, text_y), galley, Color32::TRANSPARENT);
    }
}

fn draw_today_line(painter: &egui::Painter, x: f32, top: f32, bottom: f32) {
    painter.line_segment(
        [Pos2::new(x, top + HEADER_HEIGHT), Pos2::new(x, bottom)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, top + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}
