use std::future::Future;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::api::{ApiClient, TaskService};
use crate::config::{ConfigPaths, Session, Settings, ViewKind};
use crate::error::{ApiError, StartupError};
use crate::kanban::{persist_plan, Board, DropPlan, DropTarget, SettledMove};
use crate::layout::timeline::available_years;
use crate::layout::{build_year_grid, ExpandedProjects, GanttLayout};
use crate::model::notification::mark_read;
use crate::model::{Comment, DailyUpdate, Notification, Project, Tag, Task, TaskFilters, TaskPatch};
use crate::ui;
use crate::ui::dialogs::ConnectionDraft;
use crate::ui::kanban_board::BoardAction;
use crate::ui::notifications::NotificationAction;
use crate::ui::task_detail::{DetailAction, TaskDetailState};
use crate::ui::timeline_view::TimelineAction;
use crate::ui::toasts::Toasts;

/// Results of background requests, applied on the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    ProjectsLoaded(Result<Vec<Project>, ApiError>),
    TimelineLoaded(Result<Vec<Project>, ApiError>),
    TasksLoaded {
        project_id: Uuid,
        result: Result<Vec<Task>, ApiError>,
    },
    /// A drop's request finished; moves carry their settlement.
    DropPersisted(Option<SettledMove>),
    TaskSaved(Result<Task, ApiError>),
    CommentsLoaded {
        task_id: Uuid,
        result: Result<Vec<Comment>, ApiError>,
    },
    CommentPosted {
        task_id: Uuid,
        result: Result<Comment, ApiError>,
    },
    DailyUpdatesLoaded {
        task_id: Uuid,
        result: Result<Vec<DailyUpdate>, ApiError>,
    },
    DailyUpdateSubmitted {
        task_id: Uuid,
        result: Result<DailyUpdate, ApiError>,
    },
    UnreadCount(Result<u32, ApiError>),
    NotificationsLoaded(Result<Vec<Notification>, ApiError>),
    NotificationRead {
        notification_id: Uuid,
        result: Result<(), ApiError>,
    },
    TagsLoaded(Result<Vec<Tag>, ApiError>),
}

/// Main application state.
pub struct TaskFlowApp {
    pub settings: Settings,
    session: Session,
    paths: Option<ConfigPaths>,

    runtime: Runtime,
    client: Arc<ApiClient>,
    /// Same client, seen through the board/timeline contract.
    service: Arc<dyn TaskService>,
    ctx: egui::Context,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    in_flight: usize,

    pub view: ViewKind,
    pub projects: Vec<Project>,
    pub selected_project: Option<Uuid>,
    board: Board,

    // Filter / search
    pub search_query: String,
    pub filters: TaskFilters,
    pub tags: Vec<Tag>,

    timeline_projects: Vec<Project>,
    pub timeline_year: i32,
    expanded: ExpandedProjects,

    selected_task: Option<Uuid>,
    detail: Option<TaskDetailState>,

    toasts: Toasts,
    pub status_message: String,
    pub unread_notifications: Option<u32>,
    pub show_notifications: bool,
    /// `None` while the list is loading.
    notifications: Option<Vec<Notification>>,

    // Dialog state
    pub show_connection: bool,
    pub connection_draft: ConnectionDraft,
    pub connection_error: Option<String>,
    pub show_about: bool,
}

impl TaskFlowApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        session: Session,
        paths: Option<ConfigPaths>,
    ) -> Result<Self, StartupError> {
        ui::theme::install_fonts(&cc.egui_ctx);
        ui::theme::apply_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("taskflow-net")
            .enable_all()
            .build()?;
        let client = Arc::new(ApiClient::new(&settings, session.clone())?);
        let service: Arc<dyn TaskService> = client.clone();
        let (events_tx, events_rx) = unbounded_channel();
        let today = today();

        let mut app = Self {
            view: settings.default_view,
            connection_draft: ConnectionDraft::from_current(&settings, &session),
            settings,
            session,
            paths,
            runtime,
            client,
            service,
            ctx: cc.egui_ctx.clone(),
            events_tx,
            events_rx,
            in_flight: 0,
            projects: Vec::new(),
            selected_project: None,
            board: Board::new(Vec::new()),
            search_query: String::new(),
            filters: TaskFilters::default(),
            tags: Vec::new(),
            timeline_projects: Vec::new(),
            timeline_year: today.year(),
            expanded: ExpandedProjects::default(),
            selected_task: None,
            detail: None,
            toasts: Toasts::default(),
            status_message: "Connecting...".to_string(),
            unread_notifications: None,
            show_notifications: false,
            notifications: None,
            show_connection: false,
            connection_error: None,
            show_about: false,
        };
        app.refresh();
        Ok(app)
    }

    // --- Background requests ---

    /// Run `request` on the network runtime and deliver its event to the
    /// next frame.
    fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = request.await;
            if tx.send(event).is_err() {
                tracing::debug!("app closed before a response arrived");
            }
            ctx.request_repaint();
        });
    }

    fn load_projects(&mut self) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::ProjectsLoaded(client.list_projects().await) });
    }

    fn load_timeline(&mut self) {
        let service = Arc::clone(&self.service);
        self.spawn(async move { AppEvent::TimelineLoaded(service.get_projects_timeline().await) });
    }

    fn load_tasks(&mut self, project_id: Uuid) {
        let service = Arc::clone(&self.service);
        self.spawn(async move {
            let result = service.get_tasks(project_id, &TaskFilters::default()).await;
            AppEvent::TasksLoaded { project_id, result }
        });
    }

    fn load_unread_count(&mut self) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::UnreadCount(client.unread_notification_count().await) });
    }

    fn load_tags(&mut self) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::TagsLoaded(client.list_tags().await) });
    }

    fn load_notifications(&mut self) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::NotificationsLoaded(client.list_notifications().await) });
    }

    fn load_task_activity(&mut self, task_id: Uuid) {
        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = client.list_comments(task_id).await;
            AppEvent::CommentsLoaded { task_id, result }
        });
        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = client.list_daily_updates(task_id).await;
            AppEvent::DailyUpdatesLoaded { task_id, result }
        });
    }

    fn reload_task(&mut self, task_id: Uuid) {
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::TaskSaved(client.get_task(task_id).await) });
    }

    /// Reload everything the current view shows.
    pub fn refresh(&mut self) {
        tracing::info!(view = ?self.view, "refreshing");
        self.load_projects();
        if let Some(project_id) = self.selected_project {
            self.load_tasks(project_id);
        }
        if self.view == ViewKind::Timeline {
            self.load_timeline();
        }
        self.load_unread_count();
        self.load_tags();
    }

    // --- Event handling ---

    fn pump_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_event(event);
        }
    }

    fn now(&self) -> f64 {
        self.ctx.input(|i| i.time)
    }

    fn notify_error(&mut self, context: &str, err: &ApiError) {
        tracing::warn!(error = %err, "{}", context);
        let now = self.now();
        self.toasts.error(format!("{}: {}", context, err.user_message()), now);
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ProjectsLoaded(Ok(projects)) => {
                tracing::info!(count = projects.len(), "projects loaded");
                self.status_message = format!("Loaded {} projects", projects.len());
                self.projects = projects;
                let still_there = self
                    .selected_project
                    .is_some_and(|id| self.projects.iter().any(|p| p.id == id));
                if !still_there {
                    if let Some(first) = self.projects.first().map(|p| p.id) {
                        self.select_project(first);
                    }
                }
            }
            AppEvent::ProjectsLoaded(Err(err)) => {
                self.status_message = "Offline".to_string();
                self.notify_error("Could not load projects", &err);
            }
            AppEvent::TimelineLoaded(Ok(projects)) => {
                tracing::info!(count = projects.len(), "timeline loaded");
                self.timeline_projects = projects;
            }
            AppEvent::TimelineLoaded(Err(err)) => self.notify_error("Could not load the timeline", &err),
            AppEvent::TasksLoaded { project_id, result } => {
                if self.selected_project != Some(project_id) {
                    tracing::debug!(%project_id, "dropping tasks for a project no longer selected");
                    return;
                }
                match result {
                    Ok(tasks) => {
                        tracing::info!(%project_id, count = tasks.len(), "tasks loaded");
                        self.board.replace_tasks(tasks);
                        if let Some(detail) = self.detail.as_mut() {
                            if let Some(task) = self.board.task(detail.task_id) {
                                detail.sync_dates(task);
                            }
                        }
                    }
                    Err(err) => self.notify_error("Could not load tasks", &err),
                }
            }
            AppEvent::DropPersisted(None) => {}
            AppEvent::DropPersisted(Some(settled)) => {
                let confirmed = settled.result.is_ok();
                if self.board.settle(settled.ticket, settled.result) && confirmed {
                    self.status_message = "Task moved".to_string();
                }
            }
            AppEvent::TaskSaved(result) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.saving = false;
                }
                match result {
                    Ok(task) => {
                        self.status_message = format!("Saved '{}'", task.title);
                        self.apply_saved_task(task);
                    }
                    Err(err) => self.notify_error("Could not save the task", &err),
                }
            }
            AppEvent::CommentsLoaded { task_id, result } => {
                let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task_id) else {
                    return;
                };
                match result {
                    Ok(comments) => detail.set_comments(comments),
                    Err(err) => {
                        detail.set_comments(Vec::new());
                        self.notify_error("Could not load comments", &err);
                    }
                }
            }
            AppEvent::CommentPosted { task_id, result } => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task_id) {
                    detail.saving = false;
                    if result.is_ok() {
                        detail.clear_comment_draft();
                    }
                }
                match result {
                    Ok(_) => {
                        let client = Arc::clone(&self.client);
                        self.spawn(async move {
                            let result = client.list_comments(task_id).await;
                            AppEvent::CommentsLoaded { task_id, result }
                        });
                    }
                    Err(err) => self.notify_error("Could not post the comment", &err),
                }
            }
            AppEvent::DailyUpdatesLoaded { task_id, result } => match result {
                Ok(updates) => {
                    if let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task_id) {
                        detail.daily_updates = updates;
                    }
                }
                Err(err) => tracing::warn!(%task_id, error = %err, "daily updates not loaded"),
            },
            AppEvent::DailyUpdateSubmitted { task_id, result } => {
                if let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task_id) {
                    detail.saving = false;
                    if let Ok(update) = &result {
                        detail.daily_updates.push(update.clone());
                        detail.clear_update_draft();
                    }
                }
                match result {
                    Ok(_) => {
                        let now = self.now();
                        self.toasts.info("Daily update submitted", now);
                        // The server recomputes progress from the update.
                        self.reload_task(task_id);
                    }
                    Err(err) => self.notify_error("Could not submit the update", &err),
                }
            }
            AppEvent::UnreadCount(Ok(count)) => self.unread_notifications = Some(count),
            AppEvent::UnreadCount(Err(err)) => {
                tracing::debug!(error = %err, "unread count unavailable");
            }
            AppEvent::NotificationsLoaded(Ok(list)) => {
                let unread = list.iter().filter(|n| !n.is_read).count();
                self.unread_notifications = Some(u32::try_from(unread).unwrap_or(u32::MAX));
                self.notifications = Some(list);
            }
            AppEvent::NotificationsLoaded(Err(err)) => {
                self.notifications = Some(Vec::new());
                self.notify_error("Could not load notifications", &err);
            }
            AppEvent::NotificationRead { notification_id, result } => {
                if let Err(err) = result {
                    tracing::warn!(%notification_id, error = %err, "notification not marked read");
                    // The local copy is already read; reload to show the server's view.
                    self.load_unread_count();
                    if self.show_notifications {
                        self.load_notifications();
                    }
                }
            }
            AppEvent::TagsLoaded(Ok(tags)) => {
                if self.filters.tag_id.is_some_and(|id| !tags.iter().any(|t| t.id == id)) {
                    self.filters.tag_id = None;
                }
                self.tags = tags;
            }
            AppEvent::TagsLoaded(Err(err)) => tracing::debug!(error = %err, "tags unavailable"),
        }
    }

    fn apply_saved_task(&mut self, task: Task) {
        for project in &mut self.timeline_projects {
            if let Some(slot) = project.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task.clone();
            }
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task.id) {
            detail.sync_dates(&task);
        }
        self.board.refresh_task(task);
    }

    /// Move board notices (failed moves) into toasts.
    fn drain_board_notices(&mut self) {
        let notices = self.board.drain_notices();
        if notices.is_empty() {
            return;
        }
        let now = self.now();
        for notice in notices {
            self.toasts.error(notice, now);
        }
    }

    // --- User actions ---

    pub fn set_view(&mut self, view: ViewKind) {
        self.view = view;
        if view == ViewKind::Timeline && self.timeline_projects.is_empty() {
            self.load_timeline();
        }
    }

    pub fn select_project(&mut self, project_id: Uuid) {
        if self.board.is_busy() {
            let now = self.now();
            self.toasts.info("Wait for the task move to finish before switching projects", now);
            return;
        }
        self.selected_project = Some(project_id);
        self.board.replace_tasks(Vec::new());
        self.close_task();
        self.load_tasks(project_id);
    }

    fn find_task(&self, task_id: Uuid) -> Option<&Task> {
        self.board.task(task_id).or_else(|| {
            self.timeline_projects
                .iter()
                .flat_map(|p| p.tasks.iter())
                .find(|t| t.id == task_id)
        })
    }

    fn open_task(&mut self, task_id: Uuid) {
        if self.selected_task == Some(task_id) {
            return;
        }
        let Some(task) = self.find_task(task_id) else {
            tracing::debug!(%task_id, "selected task is not loaded");
            return;
        };
        let state = TaskDetailState::for_task(task, today());
        self.detail = Some(state);
        self.selected_task = Some(task_id);
        self.load_task_activity(task_id);
    }

    fn close_task(&mut self) {
        self.selected_task = None;
        self.detail = None;
    }

    fn handle_board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::None => {}
            BoardAction::Select(task_id) => self.open_task(task_id),
            BoardAction::BeginDrag(task_id) => {
                if let Err(err) = self.board.begin_drag(task_id) {
                    let now = self.now();
                    self.toasts.info(format!("Cannot move yet: {}", err), now);
                }
            }
            BoardAction::Drop { task_id, target: None } => {
                if self.board.dragging() == Some(task_id) {
                    self.board.cancel_drag();
                }
            }
            BoardAction::Drop {
                task_id,
                target: Some(target),
            } => self.dispatch_drop(task_id, target),
        }
    }

    fn dispatch_drop(&mut self, task_id: Uuid, target: DropTarget) {
        let plan = match self.board.drop_on(task_id, target) {
            Ok(DropPlan::Noop) => return,
            Ok(plan) => plan,
            Err(err) => {
                let now = self.now();
                self.toasts.info(format!("Cannot move task: {}", err), now);
                return;
            }
        };
        if let DropPlan::Move(request) = &plan {
            self.status_message = format!("Moving task to {}...", request.update.status.label());
        }
        let service = Arc::clone(&self.service);
        self.spawn(async move { AppEvent::DropPersisted(persist_plan(service.as_ref(), &plan).await) });
    }

    fn handle_detail_action(&mut self, action: DetailAction) {
        let Some(task_id) = self.selected_task else {
            return;
        };
        match action {
            DetailAction::None => {}
            DetailAction::Close => self.close_task(),
            DetailAction::SaveDates(patch) => self.save_task(task_id, patch),
            DetailAction::PostComment(comment) => {
                self.mark_saving();
                let client = Arc::clone(&self.client);
                self.spawn(async move {
                    let result = client.add_comment(task_id, &comment).await;
                    AppEvent::CommentPosted { task_id, result }
                });
            }
            DetailAction::SubmitDailyUpdate(update) => {
                self.mark_saving();
                let client = Arc::clone(&self.client);
                self.spawn(async move {
                    let result = client.submit_daily_update(task_id, &update).await;
                    AppEvent::DailyUpdateSubmitted { task_id, result }
                });
            }
        }
    }

    fn save_task(&mut self, task_id: Uuid, patch: TaskPatch) {
        self.mark_saving();
        let client = Arc::clone(&self.client);
        self.spawn(async move { AppEvent::TaskSaved(client.update_task(task_id, &patch).await) });
    }

    fn mark_saving(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.saving = true;
        }
    }

    fn handle_timeline_action(&mut self, action: TimelineAction) {
        match action {
            TimelineAction::None => {}
            TimelineAction::ToggleProject(project_id) => {
                if let Some(project) = self.timeline_projects.iter().find(|p| p.id == project_id) {
                    self.expanded.toggle(project);
                }
            }
            TimelineAction::SelectTask(task_id) => self.open_task(task_id),
            TimelineAction::SetYear(year) => {
                self.timeline_year = year;
                self.expanded.collapse_all();
            }
        }
    }

    pub fn toggle_notifications(&mut self) {
        self.show_notifications = !self.show_notifications;
        if self.show_notifications {
            self.notifications = None;
            self.load_notifications();
            self.load_unread_count();
        }
    }

    fn handle_notification_action(&mut self, action: NotificationAction) {
        match action {
            NotificationAction::None => {}
            NotificationAction::Close => self.show_notifications = false,
            NotificationAction::MarkRead(notification_id) => self.mark_notification_read(notification_id),
            NotificationAction::OpenTask {
                notification_id,
                task_id,
            } => {
                self.mark_notification_read(notification_id);
                self.show_notifications = false;
                if self.find_task(task_id).is_some() {
                    self.open_task(task_id);
                } else {
                    let now = self.now();
                    self.toasts.info("That task is not in the loaded project", now);
                }
            }
        }
    }

    fn mark_notification_read(&mut self, notification_id: Uuid) {
        let changed = self
            .notifications
            .as_deref_mut()
            .is_some_and(|list| mark_read(list, notification_id));
        if !changed {
            return;
        }
        if let Some(n) = self.unread_notifications.as_mut() {
            *n = n.saturating_sub(1);
        }
        let client = Arc::clone(&self.client);
        self.spawn(async move {
            let result = client.mark_notification_read(notification_id).await;
            AppEvent::NotificationRead { notification_id, result }
        });
    }

    // --- Connection ---

    pub fn open_connection_dialog(&mut self) {
        self.connection_draft = ConnectionDraft::from_current(&self.settings, &self.session);
        self.connection_error = None;
        self.show_connection = true;
    }

    /// Apply the connection dialog: persist, rebuild the client, reload.
    pub fn apply_connection(&mut self) {
        let mut settings = self.settings.clone();
        let mut session = self.session.clone();
        if let Err(msg) = self.connection_draft.apply(&mut settings, &mut session) {
            self.connection_error = Some(msg);
            return;
        }
        let client = match ApiClient::new(&settings, session.clone()) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(error = %err, "could not build API client");
                self.connection_error = Some(err.user_message());
                return;
            }
        };

        if let Some(paths) = &self.paths {
            let saved = settings
                .save_to(&paths.settings)
                .and_then(|_| session.save_to(&paths.session));
            if let Err(err) = saved {
                tracing::warn!(error = %err, "connection settings not saved");
                let now = self.now();
                self.toasts.error(format!("Settings not saved: {}", err), now);
            }
        }

        tracing::info!(api = %client.base_url(), authenticated = session.is_authenticated(), "connection updated");
        self.settings = settings;
        self.session = session;
        let client = Arc::new(client);
        self.service = Arc::clone(&client) as Arc<dyn TaskService>;
        self.client = client;
        self.show_connection = false;
        self.connection_error = None;
        self.timeline_projects.clear();
        self.refresh();
    }

    // --- Rendering helpers ---

    fn visible_tasks(&self) -> Vec<Task> {
        self.board
            .tasks()
            .iter()
            .filter(|t| self.filters.matches(t))
            .cloned()
            .collect()
    }

    fn selected_project_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        self.selected_project
            .and_then(|id| self.projects.iter().find(|p| p.id == id))
            .map(Project::date_range)
            .unwrap_or((None, None))
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.in_flight > 0 {
                        ui.spinner();
                    }
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    if self.board.is_busy() {
                        ui.label(
                            egui::RichText::new("· saving move")
                                .size(10.5)
                                .color(ui::theme::ACCENT),
                        );
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let auth = if self.session.is_authenticated() {
                            egui_phosphor::regular::LOCK_KEY
                        } else {
                            egui_phosphor::regular::LOCK_KEY_OPEN
                        };
                        ui.label(
                            egui::RichText::new(format!("{} {}", auth, self.settings.base_url()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(" · ")
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.board.tasks().len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl eframe::App for TaskFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_events();
        self.drain_board_notices();

        if self.in_flight > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }

        // Keyboard shortcuts outside closures to avoid borrow issues
        let should_refresh =
            ctx.input(|i| i.key_pressed(egui::Key::F5) || (i.modifiers.command && i.key_pressed(egui::Key::R)));
        if should_refresh {
            self.refresh();
        }
        let dialog_open = self.show_connection || self.show_about;
        if !dialog_open && self.detail.is_some() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close_task();
        }

        self.filters.search = Some(self.search_query.clone());

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        self.show_status_bar(ctx);

        // Right panel: task detail
        let mut detail_action = DetailAction::None;
        let selected = self.selected_task.and_then(|id| self.find_task(id).cloned());
        if selected.is_none() && self.detail.is_some() {
            // The task left the board (deleted, or gone after a reload).
            self.close_task();
        }
        if let (Some(task), Some(detail)) = (selected, self.detail.as_mut()) {
            egui::SidePanel::right("task_detail")
                .default_width(ui::theme::DETAIL_PANEL_WIDTH)
                .min_width(260.0)
                .resizable(true)
                .frame(
                    egui::Frame::default()
                        .fill(ui::theme::BG_PANEL)
                        .inner_margin(egui::Margin::same(8.0))
                        .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
                )
                .show(ctx, |ui| {
                    detail_action = ui::task_detail::show_task_detail(&task, detail, ui);
                });
        }
        self.handle_detail_action(detail_action);

        // Central panel: active view
        let mut board_action = BoardAction::None;
        let mut timeline_action = TimelineAction::None;
        let mut gantt_click = None;
        let frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::same(8.0));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| match self.view {
            ViewKind::Board => {
                board_action = ui::kanban_board::show_kanban_board(&self.board, &self.filters, self.selected_task, ui);
            }
            ViewKind::Timeline => {
                let today = today();
                let years = available_years(&self.timeline_projects, today);
                let grid = build_year_grid(
                    &self.timeline_projects,
                    self.timeline_year,
                    today,
                    &self.settings.category_order,
                );
                timeline_action = ui::timeline_view::show_timeline(&grid, &self.expanded, &years, ui);
            }
            ViewKind::Gantt => {
                let layout = GanttLayout::compute(
                    &self.visible_tasks(),
                    self.selected_project_range(),
                    self.settings.week_starts_on.weekday(),
                );
                gantt_click = ui::gantt_chart::show_gantt_chart(&layout, self.selected_task, today(), ui);
            }
        });
        self.handle_board_action(board_action);
        self.handle_timeline_action(timeline_action);
        if let Some(task_id) = gantt_click {
            self.open_task(task_id);
        }

        // Dialogs
        if self.show_connection {
            ui::dialogs::show_connection_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }

        if self.show_notifications {
            let action = ui::notifications::show_notifications(self.notifications.as_deref(), ctx);
            self.handle_notification_action(action);
        }

        self.toasts.show(ctx);
    }
}
