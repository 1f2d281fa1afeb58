use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Uuid,
    pub file_name: String,
    pub url: String,
}

/// A comment on a task. Replies point at their parent; there is one level
/// of nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub parent_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("Unknown")
    }
}

/// Body of `POST /tasks/:id/comments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<Uuid>,
}

/// A top-level comment with its replies.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub root: Comment,
    pub replies: Vec<Comment>,
}

/// Arrange a flat comment list into threads ordered by creation time.
/// Replies whose parent is missing are promoted to top level.
pub fn thread_comments(mut comments: Vec<Comment>) -> Vec<CommentThread> {
    comments.sort_by_key(|c| c.created_at);

    let root_ids: Vec<Uuid> = comments
        .iter()
        .filter(|c| c.parent_comment_id.is_none())
        .map(|c| c.id)
        .collect();

    let mut threads: Vec<CommentThread> = Vec::new();
    let mut replies: Vec<Comment> = Vec::new();
    for comment in comments {
        match comment.parent_comment_id {
            Some(parent) if root_ids.contains(&parent) => replies.push(comment),
            _ => threads.push(CommentThread {
                root: comment,
                replies: Vec::new(),
            }),
        }
    }
    for reply in replies {
        if let Some(thread) = threads
            .iter_mut()
            .find(|t| Some(t.root.id) == reply.parent_comment_id)
        {
            thread.replies.push(reply);
        }
    }
    threads
}
