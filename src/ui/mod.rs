pub mod dialogs;
pub mod gantt_chart;
pub mod kanban_board;
pub mod notifications;
pub mod task_detail;
pub mod theme;
pub mod timeline_view;
pub mod toasts;
pub mod toolbar;
