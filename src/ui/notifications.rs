use crate::model::Notification;
use crate::ui::theme;
use egui::{Context, RichText, Window};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    None,
    Close,
    MarkRead(Uuid),
    /// Open the linked task; the notification is marked read too.
    OpenTask { notification_id: Uuid, task_id: Uuid },
}

/// Render the notification list below the toolbar bell.
pub fn show_notifications(notifications: Option<&[Notification]>, ctx: &Context) -> NotificationAction {
    let mut action = NotificationAction::None;
    let mut open = true;
    Window::new(RichText::new("Notifications").strong().size(13.0))
        .open(&mut open)
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 36.0])
        .fixed_size([320.0, 0.0])
        .show(ctx, |ui| {
            let Some(list) = notifications else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading...").color(theme::TEXT_DIM));
                });
                return;
            };
            if list.is_empty() {
                ui.label(RichText::new("Nothing new").color(theme::TEXT_DIM));
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("notification_list")
                .max_height(360.0)
                .show(ui, |ui| {
                    for n in list {
                        if let Some(a) = notification_row(n, ui) {
                            action = a;
                        }
                        ui.separator();
                    }
                });
        });
    if !open || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        return NotificationAction::Close;
    }
    action
}

fn notification_row(n: &Notification, ui: &mut egui::Ui) -> Option<NotificationAction> {
    let mut action = None;
    let title_color = if n.is_read { theme::TEXT_SECONDARY } else { theme::TEXT_PRIMARY };
    ui.horizontal(|ui| {
        if !n.is_read {
            ui.label(RichText::new(egui_phosphor::regular::DOT_OUTLINE).color(theme::ACCENT));
        }
        ui.label(RichText::new(&n.title).strong().size(12.0).color(title_color));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !n.is_read
                && ui
                    .small_button(egui_phosphor::regular::CHECK)
                    .on_hover_text("Mark as read")
                    .clicked()
            {
                action = Some(NotificationAction::MarkRead(n.id));
            }
            if let Some(task_id) = n.task_id {
                if ui
                    .small_button(egui_phosphor::regular::ARROW_SQUARE_OUT)
                    .on_hover_text("Open task")
                    .clicked()
                {
                    action = Some(NotificationAction::OpenTask {
                        notification_id: n.id,
                        task_id,
                    });
                }
            }
        });
    });
    ui.add(egui::Label::new(RichText::new(&n.message).size(11.0).color(theme::TEXT_SECONDARY)).wrap());
    if let Some(at) = n.created_at {
        ui.label(
            RichText::new(at.format("%Y-%m-%d %H:%M").to_string())
                .size(10.0)
                .color(theme::TEXT_DIM),
        );
    }
    action
}
