use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates;
use super::status::{TaskPriority, TaskStatus};
use super::tag::Tag;
use super::user::UserRef;

/// A single task as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Percent complete, 0 to 100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default, with = "dates::optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub due_date: Option<NaiveDate>,
    pub project_id: Uuid,
    #[serde(default)]
    pub assignee_id: Option<Uuid>,
    #[serde(default)]
    pub assignees: Vec<UserRef>,
    /// Set for sub-tasks.
    #[serde(default)]
    pub parent_task_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Position hint inside a board column.
    #[serde(default)]
    pub order: i32,
}

impl Task {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, project_id: Uuid, status: TaskStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            status,
            priority: TaskPriority::default(),
            progress: if status == TaskStatus::Done { 100 } else { 0 },
            start_date: None,
            due_date: None,
            project_id,
            assignee_id: None,
            assignees: Vec::new(),
            parent_task_id: None,
            tags: Vec::new(),
            order: 0,
        }
    }

    #[cfg(test)]
    pub fn with_dates(mut self, start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.due_date = due;
        self
    }

    /// Start date, falling back to the due date.
    pub fn effective_start(&self) -> Option<NaiveDate> {
        self.start_date.or(self.due_date)
    }

    /// Inclusive date span. A task with only one date spans that single day;
    /// a due date before the start is clamped to the start.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.due_date) {
            (Some(start), Some(due)) => Some((start, due.max(start))),
            (Some(only), None) | (None, Some(only)) => Some((only, only)),
            (None, None) => None,
        }
    }

    pub fn is_subtask(&self) -> bool {
        self.parent_task_id.is_some()
    }

}

/// Body of `PATCH /tasks/:id/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl StatusUpdate {
    /// The update a drop into `status` produces: entering DONE forces
    /// progress to 100, every other column leaves progress alone.
    pub fn for_column(status: TaskStatus) -> Self {
        Self {
            status,
            progress: (status == TaskStatus::Done).then_some(100),
        }
    }

    pub fn apply(&self, task: &mut Task) {
        task.status = self.status;
        if let Some(progress) = self.progress {
            task.progress = progress;
        }
    }
}

/// Partial update for `PATCH /tasks/:id`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", with = "dates::optional")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", with = "dates::optional")]
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn dates(start: Option<NaiveDate>, due: Option<NaiveDate>) -> Self {
        Self {
            start_date: start,
            due_date: due,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Query filters for `GET /projects/:id/tasks`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<Uuid>,
    pub search: Option<String>,
    /// Applied locally only; the task list endpoint has no tag filter.
    pub tag_id: Option<Uuid>,
}

impl TaskFilters {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.wire_value().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.wire_value().to_string()));
        }
        if let Some(assignee) = self.assignee_id {
            pairs.push(("assigneeId", assignee.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        pairs
    }

    /// Local equivalent of the server-side filter, applied to cached lists.
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if let Some(assignee) = self.assignee_id {
            let assigned = task.assignee_id == Some(assignee)
                || task.assignees.iter().any(|u| u.id == assignee);
            if !assigned {
                return false;
            }
        }
        if let Some(tag) = self.tag_id {
            if !task.tags.iter().any(|t| t.id == tag) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                task.title.to_lowercase().contains(&q)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&q))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decodes_api_task() {
        let json = r#"{
            "id": "6f1c2a4e-3b7d-4c59-9a1e-2d5f8b0c7e11",
            "title": "Wire up login",
            "status": "IN_REVIEW",
            "priority": "HIGH",
            "progress": 80,
            "startDate": "2026-03-01T00:00:00.000Z",
            "dueDate": "2026-03-05",
            "projectId": "0b8e9d4c-1a2f-4e3d-8c7b-6a5f4e3d2c1b",
            "assignees": [{"id": "1e2d3c4b-5a69-4788-9a0b-c1d2e3f4a5b6", "name": "Sam Lee"}],
            "tags": []
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InReview);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.start_date, Some(date(2026, 3, 1)));
        assert_eq!(task.due_date, Some(date(2026, 3, 5)));
        assert_eq!(task.assignee_label(), Some("Sam Lee"));
        assert_eq!(task.order, 0);
    }

    #[test]
    fn date_span_handles_partial_dates() {
        let project = Uuid::new_v4();
        let only_due = Task::new("a", project, TaskStatus::Todo).with_dates(None, Some(date(2026, 1, 9)));
        assert_eq!(only_due.date_span(), Some((date(2026, 1, 9), date(2026, 1, 9))));

        let inverted = Task::new("b", project, TaskStatus::Todo)
            .with_dates(Some(date(2026, 1, 9)), Some(date(2026, 1, 2)));
        assert_eq!(inverted.date_span(), Some((date(2026, 1, 9), date(2026, 1, 9))));

        let undated = Task::new("c", project, TaskStatus::Todo);
        assert_eq!(undated.date_span(), None);
        assert_eq!(undated.effective_start(), None);
    }

    #[test]
    fn status_update_only_forces_progress_for_done() {
        assert_eq!(StatusUpdate::for_column(TaskStatus::Done).progress, Some(100));
        assert_eq!(StatusUpdate::for_column(TaskStatus::InProgress).progress, None);

        let body = serde_json::to_value(StatusUpdate::for_column(TaskStatus::Blocked)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "BLOCKED"}));
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatch::dates(Some(date(2026, 4, 1)), None);
        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({"startDate": "2026-04-01"}));
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn filters_build_query_and_match_locally() {
        let filters = TaskFilters {
            status: Some(TaskStatus::Todo),
            search: Some("  login ".into()),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![("status", "TODO".to_string()), ("search", "login".to_string())]
        );

        let project = Uuid::new_v4();
        assert!(filters.matches(&Task::new("Fix Login page", project, TaskStatus::Todo)));
        assert!(!filters.matches(&Task::new("Fix Login page", project, TaskStatus::Done)));
        assert!(!filters.matches(&Task::new("Billing", project, TaskStatus::Todo)));
    }

    #[test]
    fn tag_filter_is_local_only() {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: "backend".into(),
            color: None,
        };
        let filters = TaskFilters {
            tag_id: Some(tag.id),
            ..Default::default()
        };
        assert!(filters.query_pairs().is_empty());

        let project = Uuid::new_v4();
        let mut tagged = Task::new("API", project, TaskStatus::Todo);
        tagged.tags.push(tag);
        assert!(filters.matches(&tagged));
        assert!(!filters.matches(&Task::new("Docs", project, TaskStatus::Todo)));
    }
}
