//! Status and priority lookup tables: wire values, labels, ordering and
//! display colors.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Each value is one Kanban column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    InReview,
    Done,
    Hold,
    Cancelled,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 7] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Blocked,
        TaskStatus::Hold,
        TaskStatus::Done,
        TaskStatus::Cancelled,
    ];

    /// Column order on the board, left to right.
    pub fn board_columns() -> &'static [TaskStatus] {
        &Self::ALL
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::InReview => "In Review",
            TaskStatus::Done => "Done",
            TaskStatus::Hold => "On Hold",
            TaskStatus::Cancelled => "Cancelled",
            TaskStatus::Blocked => "Blocked",
        }
    }

    /// Value used in query strings and request bodies.
    pub fn wire_value(self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
            TaskStatus::Hold => "HOLD",
            TaskStatus::Cancelled => "CANCELLED",
            TaskStatus::Blocked => "BLOCKED",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            TaskStatus::Todo => Color32::from_rgb(140, 140, 140),
            TaskStatus::InProgress => Color32::from_rgb(22, 119, 255),
            TaskStatus::InReview => Color32::from_rgb(114, 46, 209),
            TaskStatus::Done => Color32::from_rgb(82, 196, 26),
            TaskStatus::Hold => Color32::from_rgb(250, 140, 22),
            TaskStatus::Cancelled => Color32::from_rgb(89, 89, 89),
            TaskStatus::Blocked => Color32::from_rgb(245, 34, 45),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskStatus::Todo => egui_phosphor::regular::CIRCLE,
            TaskStatus::InProgress => egui_phosphor::regular::CIRCLE_HALF,
            TaskStatus::InReview => egui_phosphor::regular::EYE,
            TaskStatus::Done => egui_phosphor::regular::CHECK_CIRCLE,
            TaskStatus::Hold => egui_phosphor::regular::PAUSE_CIRCLE,
            TaskStatus::Cancelled => egui_phosphor::regular::X_CIRCLE,
            TaskStatus::Blocked => egui_phosphor::regular::PROHIBIT,
        }
    }
}

/// Task priority, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl TaskPriority {
    pub fn all() -> &'static [TaskPriority] {
        &[
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Urgent,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Urgent => "Urgent",
        }
    }

    pub fn wire_value(self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Urgent => "URGENT",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            TaskPriority::Low => Color32::from_rgb(82, 196, 26),
            TaskPriority::Medium => Color32::from_rgb(250, 173, 20),
            TaskPriority::High => Color32::from_rgb(250, 140, 22),
            TaskPriority::Urgent => Color32::from_rgb(245, 34, 45),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskPriority::Low => egui_phosphor::regular::ARROW_DOWN,
            TaskPriority::Medium => egui_phosphor::regular::MINUS,
            TaskPriority::High => egui_phosphor::regular::ARROW_UP,
            TaskPriority::Urgent => egui_phosphor::regular::WARNING,
        }
    }
}

/// Overall state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    Delay,
    Completed,
    Hold,
    Cancelled,
    Archived,
    Postpone,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Delay => "Delayed",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Hold => "On Hold",
            ProjectStatus::Cancelled => "Cancelled",
            ProjectStatus::Archived => "Archived",
            ProjectStatus::Postpone => "Postponed",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            ProjectStatus::Active => Color32::from_rgb(22, 119, 255),
            ProjectStatus::Delay => Color32::from_rgb(250, 173, 20),
            ProjectStatus::Completed => Color32::from_rgb(82, 196, 26),
            ProjectStatus::Hold => Color32::from_rgb(250, 140, 22),
            ProjectStatus::Cancelled => Color32::from_rgb(89, 89, 89),
            ProjectStatus::Archived => Color32::from_rgb(100, 105, 120),
            ProjectStatus::Postpone => Color32::from_rgb(114, 46, 209),
        }
    }
}
