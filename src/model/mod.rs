pub mod comment;
pub mod daily_update;
pub mod dates;
pub mod notification;
pub mod project;
pub mod status;
pub mod tag;
pub mod task;
pub mod user;

pub use comment::{Comment, CommentThread, NewComment};
pub use daily_update::{DailyUpdate, NewDailyUpdate};
pub use notification::Notification;
pub use project::Project;
pub use status::{ProjectStatus, TaskPriority, TaskStatus};
pub use tag::Tag;
pub use task::{StatusUpdate, Task, TaskFilters, TaskPatch};
