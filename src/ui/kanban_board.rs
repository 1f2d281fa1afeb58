use crate::kanban::{resolve_drop_target, Board, Bounds, DropTarget, Region};
use crate::model::{Task, TaskFilters, TaskStatus};
use crate::ui::theme;
use egui::{Color32, Id, LayerId, Order, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

/// Actions the board can request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardAction {
    None,
    Select(Uuid),
    BeginDrag(Uuid),
    /// Pointer released. `target` is `None` when nothing is under the card.
    Drop {
        task_id: Uuid,
        target: Option<DropTarget>,
    },
}

/// Pointer offset inside the card at drag start.
fn grab_id() -> Id {
    Id::new("kanban-card-grab")
}

fn to_bounds(rect: Rect) -> Bounds {
    Bounds::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

/// Render the board columns.
pub fn show_kanban_board(board: &Board, filters: &TaskFilters, selected: Option<Uuid>, ui: &mut Ui) -> BoardAction {
    let mut action = BoardAction::None;
    let mut regions: Vec<Region> = Vec::new();
    let mut released: Option<(Uuid, Rect)> = None;
    let dragging = board.dragging();

    egui::ScrollArea::horizontal()
        .id_salt("kanban-columns")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.spacing_mut().item_spacing.x = theme::COLUMN_GAP;
                let column_height = ui.available_height();
                for (status, tasks) in board.columns() {
                    let visible: Vec<&Task> = tasks.into_iter().filter(|t| filters.matches(t)).collect();
                    let column_rect = ui
                        .allocate_ui_with_layout(
                            egui::vec2(theme::COLUMN_WIDTH, column_height),
                            egui::Layout::top_down(egui::Align::Min),
                            |ui| {
                                show_column(
                                    ui,
                                    status,
                                    &visible,
                                    selected,
                                    dragging,
                                    column_height,
                                    &mut regions,
                                    &mut action,
                                    &mut released,
                                )
                            },
                        )
                        .inner;
                    regions.push(Region::column(status, to_bounds(column_rect)));
                }
            });
        });

    if let Some((task_id, ghost)) = released {
        let target = resolve_drop_target(to_bounds(ghost), &regions);
        tracing::debug!(%task_id, ?target, "card released");
        action = BoardAction::Drop { task_id, target };
    }
    action
}

#[allow(clippy::too_many_arguments)]
fn show_column(
    ui: &mut Ui,
    status: TaskStatus,
    tasks: &[&Task],
    selected: Option<Uuid>,
    dragging: Option<Uuid>,
    height: f32,
    regions: &mut Vec<Region>,
    action: &mut BoardAction,
    released: &mut Option<(Uuid, Rect)>,
) -> Rect {
    let frame = egui::Frame {
        fill: theme::BG_PANEL,
        rounding: Rounding::same(theme::CARD_ROUNDING),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    let resp = frame.show(ui, |ui| {
        ui.set_min_height(height - 16.0);
        ui.set_width(theme::COLUMN_WIDTH - 16.0);

        // Header
        ui.horizontal(|ui| {
            ui.label(RichText::new(status.icon()).color(status.color()));
            ui.label(RichText::new(status.label()).strong().size(13.0).color(theme::TEXT_PRIMARY));
            ui.label(
                RichText::new(format!("{}", tasks.len()))
                    .size(11.0)
                    .color(theme::TEXT_DIM),
            );
        });
        let (line, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), 2.0), Sense::hover());
        ui.painter().rect_filled(line, 1.0, status.color());
        ui.add_space(4.0);

        if tasks.is_empty() {
            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Drop tasks here").size(11.0).color(theme::TEXT_DIM));
            });
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt(("kanban-column", status.wire_value()))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for task in tasks {
                    let is_dragged = dragging == Some(task.id);
                    let card = show_card(ui, task, selected == Some(task.id), is_dragged);

                    let visible = card.rect.intersect(ui.clip_rect());
                    if visible.is_positive() {
                        regions.push(Region::card(task.id, to_bounds(visible)));
                    }

                    if card.clicked() {
                        *action = BoardAction::Select(task.id);
                    }
                    if card.drag_started() {
                        let pointer = card.interact_pointer_pos().unwrap_or(card.rect.min);
                        let offset = pointer - card.rect.min;
                        ui.ctx().data_mut(|d| d.insert_temp(grab_id(), offset));
                        *action = BoardAction::BeginDrag(task.id);
                    }
                    if is_dragged && (card.dragged() || card.drag_stopped()) {
                        let ghost = ghost_rect(ui, card.rect);
                        if card.drag_stopped() {
                            ui.ctx().data_mut(|d| d.remove::<Vec2>(grab_id()));
                            *released = Some((task.id, ghost));
                        } else {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                            paint_ghost(ui.ctx(), task, ghost);
                        }
                    }
                    ui.add_space(6.0);
                }
            });
    });
    resp.response.rect
}

fn ghost_rect(ui: &Ui, card: Rect) -> Rect {
    let offset = ui
        .ctx()
        .data(|d| d.get_temp::<Vec2>(grab_id()))
        .unwrap_or(Vec2::ZERO);
    match ui.input(|i| i.pointer.latest_pos()) {
        Some(pointer) => Rect::from_min_size(pointer - offset, card.size()),
        None => card,
    }
}

fn show_card(ui: &mut Ui, task: &Task, is_selected: bool, is_dragged: bool) -> egui::Response {
    let frame = egui::Frame {
        fill: theme::BG_CARD,
        rounding: Rounding::same(theme::CARD_ROUNDING),
        inner_margin: egui::Margin {
            left: 12.0,
            right: 8.0,
            top: 6.0,
            bottom: 6.0,
        },
        outer_margin: egui::Margin::ZERO,
        stroke: if is_selected {
            Stroke::new(1.5, theme::BORDER_ACCENT)
        } else {
            Stroke::new(1.0, theme::BORDER_SUBTLE)
        },
        shadow: egui::epaint::Shadow::NONE,
    };

    let inner = frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.spacing_mut().item_spacing.y = 4.0;

        ui.add(egui::Label::new(RichText::new(&task.title).size(12.5).color(theme::TEXT_PRIMARY)).wrap());

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            let priority = task.priority;
            ui.label(
                RichText::new(format!("{} {}", priority.icon(), priority.label()))
                    .size(10.5)
                    .color(priority.color()),
            );
            if task.is_subtask() {
                ui.label(
                    RichText::new(egui_phosphor::regular::TREE_STRUCTURE)
                        .size(10.5)
                        .color(theme::TEXT_DIM),
                )
                .on_hover_text("Sub-task");
            }
            for tag in task.tags.iter().take(2) {
                ui.label(RichText::new(format!("#{}", tag.name)).size(10.0).color(theme::TEXT_SECONDARY));
            }
        });

        if task.progress > 0 {
            ui.add(
                egui::ProgressBar::new(f32::from(task.progress) / 100.0)
                    .desired_width(ui.available_width())
                    .desired_height(5.0)
                    .fill(task.status.color())
                    .rounding(Rounding::same(3.0)),
            );
        }

        ui.horizontal(|ui| {
            if let Some(due) = task.due_date {
                ui.label(
                    RichText::new(format!("{} {}", egui_phosphor::regular::CALENDAR_BLANK, due.format("%b %d")))
                        .size(10.0)
                        .color(theme::TEXT_SECONDARY),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(user) = task.assignees.first() {
                    let who = match &user.email {
                        Some(email) => format!("{} <{}>", user.name, email),
                        None => user.name.clone(),
                    };
                    avatar(ui, &user.initials()).on_hover_text(who);
                }
            });
        });
    });

    let rect = inner.response.rect;
    // Status stripe on the left edge.
    ui.painter().rect_filled(
        Rect::from_min_size(rect.min, egui::vec2(4.0, rect.height())),
        Rounding {
            nw: theme::CARD_ROUNDING,
            sw: theme::CARD_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        task.status.color(),
    );
    if is_dragged {
        ui.painter()
            .rect_filled(rect, Rounding::same(theme::CARD_ROUNDING), Color32::from_black_alpha(150));
    }

    ui.interact(rect, ui.make_persistent_id(("kanban-card", task.id)), Sense::click_and_drag())
}

fn avatar(ui: &mut Ui, initials: &str) -> egui::Response {
    let (rect, resp) = ui.allocate_exact_size(egui::vec2(20.0, 20.0), Sense::hover());
    ui.painter().circle_filled(rect.center(), 10.0, theme::ACCENT);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        theme::font_small(),
        theme::TEXT_ON_BAR,
    );
    resp
}

/// Floating copy of the card under the pointer.
fn paint_ghost(ctx: &egui::Context, task: &Task, rect: Rect) {
    let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("kanban-ghost")));
    let rounding = Rounding::same(theme::CARD_ROUNDING);
    painter.rect_filled(rect.translate(Vec2::new(2.0, 3.0)), rounding, Color32::from_black_alpha(60));
    painter.rect_filled(rect, rounding, theme::BG_CARD);
    painter.rect_stroke(rect, rounding, Stroke::new(1.5, theme::BORDER_ACCENT));
    painter.rect_filled(
        Rect::from_min_size(rect.min, egui::vec2(4.0, rect.height())),
        Rounding {
            nw: theme::CARD_ROUNDING,
            sw: theme::CARD_ROUNDING,
            ne: 0.0,
            se: 0.0,
        },
        task.status.color(),
    );
    let galley = painter.layout(
        task.title.clone(),
        theme::font_bar(),
        theme::TEXT_PRIMARY,
        rect.width() - 20.0,
    );
    painter
        .with_clip_rect(rect)
        .galley(Pos2::new(rect.left() + 12.0, rect.top() + 6.0), galley, Color32::TRANSPARENT);
}
