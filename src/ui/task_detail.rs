use crate::model::comment::thread_comments;
use crate::model::{Comment, CommentThread, DailyUpdate, NewComment, NewDailyUpdate, Task, TaskPatch};
use crate::ui::theme;
use chrono::NaiveDate;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

/// Actions the detail panel can request.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailAction {
    None,
    Close,
    SaveDates(TaskPatch),
    PostComment(NewComment),
    SubmitDailyUpdate(NewDailyUpdate),
}

/// Editable state for the selected task. Rebuilt when the selection changes.
#[derive(Debug, Clone)]
pub struct TaskDetailState {
    pub task_id: Uuid,
    has_start: bool,
    start: NaiveDate,
    has_due: bool,
    due: NaiveDate,
    pub threads: Vec<CommentThread>,
    pub comments_loaded: bool,
    pub daily_updates: Vec<DailyUpdate>,
    comment_draft: String,
    reply_to: Option<Uuid>,
    update_note: String,
    update_progress: u8,
    /// A request started here is in flight.
    pub saving: bool,
}

impl TaskDetailState {
    pub fn for_task(task: &Task, today: NaiveDate) -> Self {
        Self {
            task_id: task.id,
            has_start: task.start_date.is_some(),
            start: task.start_date.unwrap_or(today),
            has_due: task.due_date.is_some(),
            due: task.due_date.unwrap_or(today),
            threads: Vec::new(),
            comments_loaded: false,
            daily_updates: Vec::new(),
            comment_draft: String::new(),
            reply_to: None,
            update_note: String::new(),
            update_progress: task.progress,
            saving: false,
        }
    }

    /// Reset the date pickers to the task's current dates.
    pub fn sync_dates(&mut self, task: &Task) {
        self.has_start = task.start_date.is_some();
        if let Some(start) = task.start_date {
            self.start = start;
        }
        self.has_due = task.due_date.is_some();
        if let Some(due) = task.due_date {
            self.due = due;
        }
        self.update_progress = task.progress;
    }

    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.threads = thread_comments(comments);
        self.comments_loaded = true;
    }

    fn picked_start(&self) -> Option<NaiveDate> {
        self.has_start.then_some(self.start)
    }

    fn picked_due(&self) -> Option<NaiveDate> {
        self.has_due.then_some(self.due)
    }

    /// Patch for the picked dates, or `None` when nothing changed. Clearing
    /// a date is not supported by the endpoint, so an unchecked date is
    /// left untouched.
    pub fn date_patch(&self, task: &Task) -> Option<TaskPatch> {
        let start = self.picked_start().filter(|d| Some(*d) != task.start_date);
        let due = self.picked_due().filter(|d| Some(*d) != task.due_date);
        let patch = TaskPatch::dates(start, due);
        (!patch.is_empty()).then_some(patch)
    }

    /// Comment body from the draft; `None` for blank drafts.
    pub fn comment(&self) -> Option<NewComment> {
        let content = self.comment_draft.trim();
        (!content.is_empty()).then(|| NewComment {
            content: content.to_string(),
            parent_comment_id: self.reply_to,
        })
    }

    pub fn daily_update(&self) -> NewDailyUpdate {
        NewDailyUpdate {
            progress: self.update_progress.min(100),
            note: self.update_note.trim().to_string(),
            status: None,
        }
    }

    pub fn clear_comment_draft(&mut self) {
        self.comment_draft.clear();
        self.reply_to = None;
    }

    pub fn clear_update_draft(&mut self) {
        self.update_note.clear();
    }
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(10.0).color(theme::TEXT_DIM).strong());
}

/// Render the detail panel for `task`.
pub fn show_task_detail(task: &Task, state: &mut TaskDetailState, ui: &mut Ui) -> DetailAction {
    let mut action = DetailAction::None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Task Details").strong().size(13.0).color(theme::TEXT_PRIMARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let close = ui.add(
                egui::Button::new(RichText::new(egui_phosphor::regular::X).size(11.0).color(theme::TEXT_DIM))
                    .frame(false),
            );
            if close.on_hover_text("Close").clicked() {
                action = DetailAction::Close;
            }
            if state.saving {
                ui.spinner();
            }
        });
    });
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(10.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    egui::ScrollArea::vertical()
        .id_salt("task-detail")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            frame.show(ui, |ui| {
                ui.spacing_mut().item_spacing.y = 6.0;
                ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;

                ui.add(egui::Label::new(RichText::new(&task.title).size(15.0).strong()).wrap());
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        RichText::new(format!("{} {}", task.status.icon(), task.status.label()))
                            .size(11.0)
                            .color(task.status.color()),
                    );
                    ui.label(
                        RichText::new(format!("{} {}", task.priority.icon(), task.priority.label()))
                            .size(11.0)
                            .color(task.priority.color()),
                    );
                    ui.label(RichText::new(format!("{}%", task.progress)).size(11.0).color(theme::TEXT_SECONDARY));
                });

                if !task.assignees.is_empty() {
                    section_label(ui, "Assignees");
                    let names: Vec<&str> = task.assignees.iter().map(|u| u.name.as_str()).collect();
                    ui.label(RichText::new(names.join(", ")).size(11.0).color(theme::TEXT_SECONDARY));
                }

                if let Some(description) = task.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    section_label(ui, "Description");
                    ui.add(egui::Label::new(RichText::new(description).size(11.0).color(theme::TEXT_SECONDARY)).wrap());
                }

                ui.separator();
                if let Some(patch) = show_dates(task, state, ui) {
                    action = DetailAction::SaveDates(patch);
                }

                ui.separator();
                if let Some(update) = show_daily_update(state, ui) {
                    action = DetailAction::SubmitDailyUpdate(update);
                }

                ui.separator();
                if let Some(comment) = show_comments(state, ui) {
                    action = DetailAction::PostComment(comment);
                }
            });
        });

    action
}

/// Returns a patch when "Save dates" was clicked with changes pending.
fn show_dates(task: &Task, state: &mut TaskDetailState, ui: &mut Ui) -> Option<TaskPatch> {
    section_label(ui, "Dates");
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.checkbox(&mut state.has_start, RichText::new("Start").size(10.5));
            ui.add_enabled_ui(state.has_start, |ui| {
                let resp = ui.add(egui_extras::DatePickerButton::new(&mut state.start).id_salt("detail_dp_start"));
                if resp.changed() && state.has_due && state.due < state.start {
                    state.due = state.start;
                }
            });
        });
        ui.add_space(8.0);
        ui.vertical(|ui| {
            ui.checkbox(&mut state.has_due, RichText::new("Due").size(10.5));
            ui.add_enabled_ui(state.has_due, |ui| {
                let resp = ui.add(egui_extras::DatePickerButton::new(&mut state.due).id_salt("detail_dp_due"));
                if resp.changed() && state.has_start && state.due < state.start {
                    state.start = state.due;
                }
            });
        });
    });

    let patch = state.date_patch(task);
    let btn = egui::Button::new(RichText::new("Save dates").color(Color32::WHITE).size(12.0))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
    let clicked = ui
        .add_enabled(patch.is_some() && !state.saving, btn)
        .clicked();
    if clicked {
        patch
    } else {
        None
    }
}

fn show_daily_update(state: &mut TaskDetailState, ui: &mut Ui) -> Option<NewDailyUpdate> {
    section_label(ui, "Daily update");
    ui.add(
        egui::Slider::new(&mut state.update_progress, 0..=100)
            .suffix("%")
            .text("progress"),
    );
    ui.add_sized(
        [ui.available_width(), 48.0],
        egui::TextEdit::multiline(&mut state.update_note)
            .font(egui::FontId::proportional(11.0))
            .hint_text("What changed today?"),
    );
    let btn = egui::Button::new(RichText::new("Submit update").color(Color32::WHITE).size(12.0))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
    let submitted = ui.add_enabled(!state.saving, btn).clicked();

    for update in state.daily_updates.iter().rev().take(5) {
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(update.created_at.format("%b %d").to_string())
                    .size(10.0)
                    .color(theme::TEXT_DIM),
            );
            ui.label(RichText::new(format!("{}%", update.progress)).size(10.5).strong());
            if !update.note.is_empty() {
                ui.label(RichText::new(&update.note).size(10.5).color(theme::TEXT_SECONDARY));
            }
        });
    }

    submitted.then(|| state.daily_update())
}

fn show_comments(state: &mut TaskDetailState, ui: &mut Ui) -> Option<NewComment> {
    section_label(ui, "Comments");
    if !state.comments_loaded {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Loading comments...").size(10.5).color(theme::TEXT_DIM));
        });
    } else if state.threads.is_empty() {
        ui.label(RichText::new("No comments yet").size(10.5).color(theme::TEXT_DIM));
    }

    let mut reply_to = None;
    for thread in &state.threads {
        if comment_row(ui, &thread.root, 0.0) {
            reply_to = Some(thread.root.id);
        }
        for reply in &thread.replies {
            comment_row(ui, reply, 16.0);
        }
    }
    if reply_to.is_some() {
        state.reply_to = reply_to;
    }

    if let Some(parent) = state.reply_to {
        let author = state
            .threads
            .iter()
            .find(|t| t.root.id == parent)
            .map(|t| t.root.author().to_string())
            .unwrap_or_default();
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Replying to {}", author)).size(10.0).color(theme::ACCENT));
            if ui.small_button(egui_phosphor::regular::X).clicked() {
                state.reply_to = None;
            }
        });
    }

    ui.add_sized(
        [ui.available_width(), 40.0],
        egui::TextEdit::multiline(&mut state.comment_draft)
            .font(egui::FontId::proportional(11.0))
            .hint_text("Write a comment..."),
    );
    let comment = state.comment();
    let btn = egui::Button::new(RichText::new("Post").color(Color32::WHITE).size(12.0))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
    let posted = ui.add_enabled(comment.is_some() && !state.saving, btn).clicked();
    if posted {
        comment
    } else {
        None
    }
}

/// Returns true when "Reply" was clicked.
fn comment_row(ui: &mut Ui, comment: &Comment, indent: f32) -> bool {
    let mut reply = false;
    ui.horizontal(|ui| {
        ui.add_space(indent);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(comment.author()).size(11.0).strong());
                ui.label(
                    RichText::new(comment.created_at.format("%Y-%m-%d %H:%M").to_string())
                        .size(9.5)
                        .color(theme::TEXT_DIM),
                );
                if indent == 0.0 && ui.small_button("Reply").clicked() {
                    reply = true;
                }
            });
            ui.add(egui::Label::new(RichText::new(&comment.content).size(11.0).color(theme::TEXT_SECONDARY)).wrap());
            for attachment in &comment.attachments {
                ui.hyperlink_to(
                    format!("{} {}", egui_phosphor::regular::PAPERCLIP, attachment.file_name),
                    &attachment.url,
                );
            }
        });
    });
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task() -> Task {
        Task::new("write docs", Uuid::new_v4(), TaskStatus::InProgress)
            .with_dates(Some(date(2026, 3, 1)), Some(date(2026, 3, 5)))
    }

    #[test]
    fn unchanged_dates_produce_no_patch() {
        let task = task();
        let state = TaskDetailState::for_task(&task, date(2026, 10, 18));
        assert_eq!(state.date_patch(&task), None);
    }

    #[test]
    fn only_changed_dates_are_sent() {
        let task = task();
        let mut state = TaskDetailState::for_task(&task, date(2026, 10, 18));
        state.due = date(2026, 3, 9);
        assert_eq!(state.date_patch(&task), Some(TaskPatch::dates(None, Some(date(2026, 3, 9)))));
    }

    #[test]
    fn undated_task_gets_start_once_enabled() {
        let task = Task::new("plan", Uuid::new_v4(), TaskStatus::Todo);
        let mut state = TaskDetailState::for_task(&task, date(2026, 10, 18));
        assert_eq!(state.date_patch(&task), None);
        state.has_start = true;
        assert_eq!(state.date_patch(&task), Some(TaskPatch::dates(Some(date(2026, 10, 18)), None)));
    }

    #[test]
    fn blank_comment_drafts_are_not_posted() {
        let mut state = TaskDetailState::for_task(&task(), date(2026, 10, 18));
        state.comment_draft = "   \n".into();
        assert_eq!(state.comment(), None);

        let parent = Uuid::new_v4();
        state.comment_draft = "  looks good ".into();
        state.reply_to = Some(parent);
        assert_eq!(
            state.comment(),
            Some(NewComment {
                content: "looks good".into(),
                parent_comment_id: Some(parent),
            })
        );
        state.clear_comment_draft();
        assert_eq!(state.comment(), None);
        assert_eq!(state.reply_to, None);
    }

    #[test]
    fn daily_update_starts_from_task_progress() {
        let mut t = task();
        t.progress = 40;
        let mut state = TaskDetailState::for_task(&t, date(2026, 10, 18));
        state.update_note = " pairing session \n".into();
        let update = state.daily_update();
        assert_eq!(update.progress, 40);
        assert_eq!(update.note, "pairing session");
    }
}
