use crate::app::TaskFlowApp;
use crate::config::ViewKind;
use crate::model::TaskPriority;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TaskFlowApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            for view in [ViewKind::Board, ViewKind::Timeline, ViewKind::Gantt] {
                if ui.radio(app.view == view, view.label()).clicked() {
                    app.set_view(view);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("  Refresh          F5").clicked() {
                app.refresh();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Connection  ").font(theme::font_menu()), |ui| {
            if ui.button("  Server & Tokens...").clicked() {
                app.open_connection_dialog();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        show_view_tabs(app, ui);
        ui.separator();

        match app.view {
            ViewKind::Board | ViewKind::Gantt => show_project_controls(app, ui),
            ViewKind::Timeline => {
                ui.label(
                    RichText::new(format!("{} {}", egui_phosphor::regular::CALENDAR, app.timeline_year))
                        .size(12.0)
                        .color(theme::TEXT_SECONDARY),
                );
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let bell = match app.unread_notifications {
                Some(n) if n > 0 => RichText::new(format!("{} {}", egui_phosphor::regular::BELL_RINGING, n)).color(theme::ACCENT),
                _ => RichText::new(egui_phosphor::regular::BELL).color(theme::TEXT_DIM),
            };
            let bell = ui.add(egui::Button::new(bell.size(13.0)).frame(false).selected(app.show_notifications));
            if bell.on_hover_text("Notifications").clicked() {
                app.toggle_notifications();
            }

            let refresh = ui.add(egui::Button::new(egui_phosphor::regular::ARROWS_CLOCKWISE).frame(false));
            if refresh.on_hover_text("Refresh (F5)").clicked() {
                app.refresh();
            }
        });
    });
}

fn show_view_tabs(app: &mut TaskFlowApp, ui: &mut Ui) {
    let tabs = [
        (ViewKind::Board, egui_phosphor::regular::KANBAN),
        (ViewKind::Timeline, egui_phosphor::regular::CALENDAR_BLANK),
        (ViewKind::Gantt, egui_phosphor::regular::CHART_BAR_HORIZONTAL),
    ];
    for (view, icon) in tabs {
        let text = RichText::new(format!("{} {}", icon, view.label())).size(12.0);
        if ui.selectable_label(app.view == view, text).clicked() && app.view != view {
            app.set_view(view);
        }
    }
}

fn show_project_controls(app: &mut TaskFlowApp, ui: &mut Ui) {
    let selected_name = app
        .selected_project
        .and_then(|id| app.projects.iter().find(|p| p.id == id))
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Select project".to_string());

    let mut picked = None;
    egui::ComboBox::from_id_salt("project_picker")
        .selected_text(RichText::new(selected_name).size(12.0))
        .width(200.0)
        .show_ui(ui, |ui| {
            for project in &app.projects {
                let is_selected = app.selected_project == Some(project.id);
                if ui.selectable_label(is_selected, project.name.as_str()).clicked() && !is_selected {
                    picked = Some(project.id);
                }
            }
        });
    if let Some(project_id) = picked {
        app.select_project(project_id);
    }

    ui.add(
        egui::TextEdit::singleline(&mut app.search_query)
            .hint_text(format!("{} Search tasks", egui_phosphor::regular::MAGNIFYING_GLASS))
            .desired_width(160.0),
    );

    let priority_label = app
        .filters
        .priority
        .map(|p| format!("{} {}", p.icon(), p.label()))
        .unwrap_or_else(|| "All priorities".to_string());
    egui::ComboBox::from_id_salt("priority_filter")
        .selected_text(RichText::new(priority_label).size(11.0))
        .width(120.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut app.filters.priority, None, "All priorities");
            for p in TaskPriority::all() {
                ui.selectable_value(&mut app.filters.priority, Some(*p), format!("{} {}", p.icon(), p.label()));
            }
        });

    if app.tags.is_empty() {
        return;
    }
    let tag_label = app
        .filters
        .tag_id
        .and_then(|id| app.tags.iter().find(|t| t.id == id))
        .map(|t| format!("{} {}", egui_phosphor::regular::TAG, t.name))
        .unwrap_or_else(|| "All tags".to_string());
    egui::ComboBox::from_id_salt("tag_filter")
        .selected_text(RichText::new(tag_label).size(11.0))
        .width(120.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut app.filters.tag_id, None, "All tags");
            for tag in &app.tags {
                ui.selectable_value(&mut app.filters.tag_id, Some(tag.id), tag.name.as_str());
            }
        });
}
