use crate::app::TaskFlowApp;
use crate::config::{Session, Settings};
use crate::ui::theme;
use egui::{Color32, Context, RichText, Window};

/// Edit buffer for the connection dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionDraft {
    pub base_url: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl ConnectionDraft {
    pub fn from_current(settings: &Settings, session: &Session) -> Self {
        Self {
            base_url: settings.api_base_url.clone(),
            access_token: session.access_token.clone().unwrap_or_default(),
            refresh_token: session.refresh_token.clone().unwrap_or_default(),
        }
    }

    /// Validate and write the draft into `settings` and `session`.
    pub fn apply(&self, settings: &mut Settings, session: &mut Session) -> Result<(), String> {
        let url = self.base_url.trim();
        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(_) => return Err("The API URL must start with http:// or https://".into()),
            Err(e) => return Err(format!("Invalid API URL: {}", e)),
        }
        settings.api_base_url = url.to_string();
        session.access_token = non_empty(&self.access_token);
        session.refresh_token = non_empty(&self.refresh_token);
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Render the "Connection" dialog.
pub fn show_connection_dialog(app: &mut TaskFlowApp, ctx: &Context) {
    let mut save = false;
    let mut cancel = false;
    Window::new(RichText::new("Connection").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([420.0, 0.0])
        .show(ctx, |ui| {
            ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
            ui.add_space(4.0);

            egui::Grid::new("connection_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("API URL").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [280.0, 24.0],
                        egui::TextEdit::singleline(&mut app.connection_draft.base_url)
                            .hint_text("http://localhost:3000/api"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Access token").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [280.0, 24.0],
                        egui::TextEdit::singleline(&mut app.connection_draft.access_token).password(true),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Refresh token").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [280.0, 24.0],
                        egui::TextEdit::singleline(&mut app.connection_draft.refresh_token).password(true),
                    );
                    ui.end_row();
                });

            if let Some(error) = &app.connection_error {
                ui.add_space(4.0);
                ui.label(RichText::new(error).size(11.0).color(theme::DANGER));
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let save_btn = egui::Button::new(RichText::new("Save").color(Color32::WHITE))
                    .fill(theme::ACCENT)
                    .rounding(egui::Rounding::same(4.0));
                if ui.add_sized([80.0, 28.0], save_btn).clicked() {
                    save = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    cancel = true;
                }
            });
            ui.add_space(2.0);
        });

    if save {
        app.apply_connection();
    }
    if cancel || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_connection = false;
        app.connection_error = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TaskFlowApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("TaskFlow").strong());
                ui.add_space(2.0);
                ui.label(RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY));
                ui.add_space(10.0);
                ui.label("Board, timeline and Gantt views");
                ui.label(RichText::new(app.settings.base_url()).size(11.0).color(theme::TEXT_DIM));
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_round_trips_current_values() {
        let settings = Settings::default();
        let session = Session {
            access_token: Some("abc".into()),
            refresh_token: None,
        };
        let draft = ConnectionDraft::from_current(&settings, &session);
        assert_eq!(draft.base_url, "http://localhost:3000/api");
        assert_eq!(draft.access_token, "abc");
        assert_eq!(draft.refresh_token, "");
    }

    #[test]
    fn apply_trims_and_clears_blank_tokens() {
        let mut settings = Settings::default();
        let mut session = Session {
            access_token: Some("old".into()),
            refresh_token: Some("old".into()),
        };
        let draft = ConnectionDraft {
            base_url: " https://tasks.example.com/api ".into(),
            access_token: " new-token ".into(),
            refresh_token: "   ".into(),
        };
        draft.apply(&mut settings, &mut session).unwrap();
        assert_eq!(settings.api_base_url, "https://tasks.example.com/api");
        assert_eq!(session.access_token.as_deref(), Some("new-token"));
        assert_eq!(session.refresh_token, None);
    }

    #[test]
    fn apply_rejects_bad_urls_without_touching_state() {
        let mut settings = Settings::default();
        let mut session = Session::default();
        for url in ["not a url", "ftp://example.com/api"] {
            let draft = ConnectionDraft {
                base_url: url.into(),
                access_token: "t".into(),
                ..Default::default()
            };
            assert!(draft.apply(&mut settings, &mut session).is_err());
        }
        assert_eq!(settings, Settings::default());
        assert_eq!(session, Session::default());
    }
}
