use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Mark `id` read in a cached list. Returns whether it was unread.
pub fn mark_read(notifications: &mut [Notification], id: Uuid) -> bool {
    match notifications.iter_mut().find(|n| n.id == id) {
        Some(n) if !n.is_read => {
            n.is_read = true;
            true
        }
        _ => false,
    }
}

/// Payload of `GET /notifications/unread-count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(is_read: bool) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "TASK_ASSIGNED".into(),
            title: "Assigned".into(),
            message: "You were assigned a task".into(),
            is_read,
            project_id: None,
            task_id: None,
            created_at: None,
        }
    }

    #[test]
    fn mark_read_reports_only_unread_changes() {
        let mut list = vec![notification(false), notification(true)];
        let (unread, read) = (list[0].id, list[1].id);

        assert!(mark_read(&mut list, unread));
        assert!(list[0].is_read);
        assert!(!mark_read(&mut list, unread));
        assert!(!mark_read(&mut list, read));
        assert!(!mark_read(&mut list, Uuid::new_v4()));
    }

    #[test]
    fn decodes_type_field() {
        let json = r#"{
            "id": "6a1f0d7e-6a44-4a59-9d36-0f1f2b3c4d5e",
            "userId": "0b7c9b9e-2b44-4d8e-8a51-1c2d3e4f5a6b",
            "type": "COMMENT_ADDED",
            "title": "New comment",
            "message": "Ana replied"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.kind, "COMMENT_ADDED");
        assert!(!n.is_read);
        assert_eq!(n.task_id, None);
    }
}
