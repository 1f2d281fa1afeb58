//! In-memory board state with optimistic status moves.
//!
//! A cross-column drop snapshots the task list, applies the new status
//! locally and hands back a [`MoveRequest`] for the caller to send. The
//! result comes back through [`Board::settle`]: success drops the snapshot,
//! failure restores it and queues one user-facing notice. At most one move
//! is in flight at a time.
//!
//! [`persist_plan`] sends a plan through a [`TaskService`] and returns the
//! [`SettledMove`] to feed back into `settle`; reorders are not settled.

use thiserror::Error;
use uuid::Uuid;

use super::collision::DropTarget;
use crate::api::TaskService;
use crate::error::ApiError;
use crate::model::{StatusUpdate, Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("a status change is still being saved")]
    MoveInFlight,
    #[error("task {0} is not on this board")]
    UnknownTask(Uuid),
}

/// Remote status update the caller must send, tagged for [`Board::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub ticket: u64,
    pub task_id: Uuid,
    pub update: StatusUpdate,
}

/// Outcome of a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPlan {
    /// Nothing changed and nothing needs sending.
    Noop,
    /// Column order changed locally; persisting it is best-effort.
    Reorder {
        status: TaskStatus,
        ordered_ids: Vec<Uuid>,
    },
    /// Status changed locally; the request must be sent and settled.
    Move(MoveRequest),
}

#[derive(Debug)]
struct PendingMove {
    ticket: u64,
    task_id: Uuid,
    update: StatusUpdate,
    snapshot: Vec<Task>,
}

#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
    dragging: Option<Uuid>,
    pending: Option<PendingMove>,
    next_ticket: u64,
    notices: Vec<String>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the list with freshly fetched server state. If a move is
    /// still pending, the fetched list becomes its rollback point and the
    /// optimistic change is re-applied on top.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if let Some(pending) = self.pending.as_mut() {
            pending.snapshot = self.tasks.clone();
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == pending.task_id) {
                pending.update.apply(task);
            }
        }
        if self.dragging.is_some_and(|id| !self.tasks.iter().any(|t| t.id == id)) {
            self.dragging = None;
        }
    }

    /// Swap in a fresh server copy of one task. A pending move on the same
    /// task stays applied on top.
    pub fn refresh_task(&mut self, task: Task) {
        if let Some(pending) = self.pending.as_mut() {
            if let Some(slot) = pending.snapshot.iter_mut().find(|t| t.id == task.id) {
                *slot = task.clone();
            }
        }
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            tracing::debug!(task_id = %task.id, "refreshed task is not on this board");
            return;
        };
        *slot = task;
        if let Some(pending) = self.pending.as_ref().filter(|p| p.task_id == slot.id) {
            pending.update.apply(slot);
        }
    }

    /// True while a status move awaits confirmation.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.dragging
    }

    pub fn begin_drag(&mut self, task_id: Uuid) -> Result<(), BoardError> {
        if self.pending.is_some() {
            return Err(BoardError::MoveInFlight);
        }
        if self.task(task_id).is_none() {
            return Err(BoardError::UnknownTask(task_id));
        }
        self.dragging = Some(task_id);
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Apply a drop of `task_id` onto `target`.
    pub fn drop_on(&mut self, task_id: Uuid, target: DropTarget) -> Result<DropPlan, BoardError> {
        self.dragging = None;
        if self.pending.is_some() {
            return Err(BoardError::MoveInFlight);
        }
        let from = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(BoardError::UnknownTask(task_id))?;
        let source = self.tasks[from].status;

        let (destination, over_card) = match target {
            DropTarget::Card(card) if card == task_id => return Ok(DropPlan::Noop),
            DropTarget::Card(card) => match self.tasks.iter().position(|t| t.id == card) {
                Some(idx) => (self.tasks[idx].status, Some(idx)),
                None => {
                    tracing::debug!(%card, "drop over a card that is no longer on the board");
                    return Ok(DropPlan::Noop);
                }
            },
            DropTarget::Column(status) => (status, None),
        };

        if destination == source {
            return Ok(match over_card {
                Some(to) => self.reorder(from, to, source),
                None => DropPlan::Noop,
            });
        }

        let update = StatusUpdate::for_column(destination);
        let snapshot = self.tasks.clone();
        update.apply(&mut self.tasks[from]);
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending = Some(PendingMove {
            ticket,
            task_id,
            update,
            snapshot,
        });
        tracing::debug!(%task_id, from = ?source, to = ?destination, ticket, "optimistic status move");
        Ok(DropPlan::Move(MoveRequest {
            ticket,
            task_id,
            update,
        }))
    }

    fn reorder(&mut self, from: usize, to: usize, status: TaskStatus) -> DropPlan {
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);

        let mut ordered_ids = Vec::new();
        for task in self.tasks.iter_mut().filter(|t| t.status == status) {
            task.order = ordered_ids.len() as i32;
            ordered_ids.push(task.id);
        }
        DropPlan::Reorder { status, ordered_ids }
    }

    /// Resolve the in-flight move identified by `ticket`. Returns false for
    /// stale tickets, which are ignored.
    pub fn settle(&mut self, ticket: u64, result: Result<Task, ApiError>) -> bool {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                tracing::warn!(ticket, "ignoring result for a move that is not pending");
                return false;
            }
        };
        match result {
            Ok(_) => {
                tracing::debug!(task_id = %pending.task_id, ticket, "status move confirmed");
            }
            Err(err) => {
                tracing::error!(task_id = %pending.task_id, ticket, error = %err, "status move failed, rolling back");
                self.tasks = pending.snapshot;
                self.notices
                    .push(format!("Could not move task: {}", err.user_message()));
            }
        }
        true
    }

    /// User-visible errors queued since the last call.
    pub fn drain_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    /// Tasks per column in board order, each column keeping list order.
    pub fn columns(&self) -> Vec<(TaskStatus, Vec<&Task>)> {
        TaskStatus::board_columns()
            .iter()
            .map(|status| {
                let tasks = self.tasks.iter().filter(|t| t.status == *status).collect();
                (*status, tasks)
            })
            .collect()
    }
}

/// Server answer to a [`MoveRequest`], ready for [`Board::settle`].
#[derive(Debug)]
pub struct SettledMove {
    pub ticket: u64,
    pub result: Result<Task, ApiError>,
}

/// Send whatever `plan` needs sending. A move yields its settlement; a
/// reorder is best-effort, so its failure is only logged.
pub async fn persist_plan<S>(service: &S, plan: &DropPlan) -> Option<SettledMove>
where
    S: TaskService + ?Sized,
{
    match plan {
        DropPlan::Move(request) => {
            let result = service
                .update_task_status(request.task_id, request.update)
                .await;
            Some(SettledMove {
                ticket: request.ticket,
                result,
            })
        }
        DropPlan::Reorder { status, ordered_ids } => {
            if let Err(err) = service.reorder_tasks(ordered_ids).await {
                tracing::debug!(?status, error = %err, "reorder not persisted");
            }
            None
        }
        DropPlan::Noop => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::model::{Project, TaskFilters};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Status(Uuid, StatusUpdate),
        Reorder(Vec<Uuid>),
    }

    #[derive(Default)]
    struct FakeService {
        fail: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeService {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskService for FakeService {
        async fn update_task_status(&self, task_id: Uuid, update: StatusUpdate) -> Result<Task, ApiError> {
            self.calls.lock().unwrap().push(Call::Status(task_id, update));
            if self.fail {
                return Err(ApiError::Http {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            let mut task = Task::new("server copy", Uuid::nil(), update.status);
            task.id = task_id;
            Ok(task)
        }

        async fn reorder_tasks(&self, ordered_ids: &[Uuid]) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Reorder(ordered_ids.to_vec()));
            if self.fail {
                return Err(ApiError::Api("reorder failed".into()));
            }
            Ok(())
        }

        async fn get_projects_timeline(&self) -> Result<Vec<Project>, ApiError> {
            Ok(Vec::new())
        }

        async fn get_tasks(&self, _project_id: Uuid, _filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
            Ok(Vec::new())
        }
    }

    /// Drop, persist, then settle in one go, as the shell does across frames.
    async fn drop_and_persist<S>(
        board: &mut Board,
        service: &S,
        task_id: Uuid,
        target: DropTarget,
    ) -> Result<DropPlan, BoardError>
    where
        S: TaskService + ?Sized,
    {
        let plan = board.drop_on(task_id, target)?;
        if let Some(settled) = persist_plan(service, &plan).await {
            board.settle(settled.ticket, settled.result);
        }
        Ok(plan)
    }

    fn board() -> (Board, Vec<Uuid>) {
        let project = Uuid::new_v4();
        let mut in_progress = Task::new("b", project, TaskStatus::InProgress);
        in_progress.progress = 40;
        let tasks = vec![
            Task::new("a", project, TaskStatus::Todo),
            in_progress,
            Task::new("c", project, TaskStatus::Todo),
            Task::new("d", project, TaskStatus::Todo),
        ];
        let ids = tasks.iter().map(|t| t.id).collect();
        (Board::new(tasks), ids)
    }

    #[tokio::test]
    async fn dropping_a_card_on_itself_changes_nothing() {
        let (mut board, ids) = board();
        let before = board.tasks().to_vec();
        let service = FakeService::default();

        let plan = drop_and_persist(&mut board, &service, ids[0], DropTarget::Card(ids[0]))
            .await
            .unwrap();

        assert_eq!(plan, DropPlan::Noop);
        assert_eq!(board.tasks(), before.as_slice());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn dropping_on_own_column_is_a_noop() {
        let (mut board, ids) = board();
        let service = FakeService::default();
        let plan = drop_and_persist(&mut board, &service, ids[2], DropTarget::Column(TaskStatus::Todo))
            .await
            .unwrap();
        assert_eq!(plan, DropPlan::Noop);
        assert!(service.calls().is_empty());
    }

    #[test]
    fn cross_column_drop_applies_before_any_response() {
        let (mut board, ids) = board();

        let plan = board.drop_on(ids[1], DropTarget::Column(TaskStatus::Done)).unwrap();
        let DropPlan::Move(request) = plan else {
            panic!("expected a move, got {plan:?}");
        };
        let moved = board.task(ids[1]).unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.progress, 100);
        assert_eq!(request.update.progress, Some(100));
        assert!(board.is_busy());

        assert_eq!(
            board.drop_on(ids[0], DropTarget::Column(TaskStatus::InReview)),
            Err(BoardError::MoveInFlight)
        );
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::Todo);
    }

    #[test]
    fn progress_is_kept_outside_done() {
        let (mut board, ids) = board();
        board.drop_on(ids[1], DropTarget::Column(TaskStatus::Blocked)).unwrap();
        let moved = board.task(ids[1]).unwrap();
        assert_eq!(moved.status, TaskStatus::Blocked);
        assert_eq!(moved.progress, 40);
    }

    #[test]
    fn drop_on_card_in_other_column_takes_its_status() {
        let (mut board, ids) = board();
        let plan = board.drop_on(ids[0], DropTarget::Card(ids[1])).unwrap();
        assert!(matches!(plan, DropPlan::Move(r) if r.update.status == TaskStatus::InProgress));
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::InProgress);
        assert_eq!(board.task(ids[0]).unwrap().progress, 0);
    }

    #[tokio::test]
    async fn failed_move_rolls_back_with_one_notice() {
        let (mut board, ids) = board();
        let before = board.tasks().to_vec();
        let service = FakeService::failing();

        drop_and_persist(&mut board, &service, ids[0], DropTarget::Column(TaskStatus::Done))
            .await
            .unwrap();

        assert_eq!(board.tasks(), before.as_slice());
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::Todo);
        assert!(!board.is_busy());
        assert_eq!(board.drain_notices().len(), 1);
        assert!(board.drain_notices().is_empty());
        assert_eq!(
            service.calls(),
            vec![Call::Status(ids[0], StatusUpdate::for_column(TaskStatus::Done))]
        );
    }

    #[tokio::test]
    async fn confirmed_move_keeps_local_state() {
        let (mut board, ids) = board();
        let service = FakeService::default();
        drop_and_persist(&mut board, &service, ids[2], DropTarget::Column(TaskStatus::InReview))
            .await
            .unwrap();

        let task = board.task(ids[2]).unwrap();
        // The server copy is not written back.
        assert_eq!(task.title, "c");
        assert_eq!(task.status, TaskStatus::InReview);
        assert!(!board.is_busy());
        assert!(board.drain_notices().is_empty());
        board.begin_drag(ids[0]).unwrap();
    }

    #[test]
    fn drags_are_refused_while_a_move_is_pending() {
        let (mut board, ids) = board();
        let DropPlan::Move(request) = board.drop_on(ids[0], DropTarget::Column(TaskStatus::Done)).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(board.begin_drag(ids[2]), Err(BoardError::MoveInFlight));
        assert_eq!(
            board.drop_on(ids[2], DropTarget::Column(TaskStatus::Done)),
            Err(BoardError::MoveInFlight)
        );

        assert!(!board.settle(request.ticket + 1, Err(ApiError::MissingData)));
        assert!(board.is_busy());
        assert!(board.settle(request.ticket, Err(ApiError::MissingData)));
        assert!(!board.is_busy());
        board.begin_drag(ids[2]).unwrap();
        assert_eq!(board.dragging(), Some(ids[2]));
    }

    #[tokio::test]
    async fn reorder_splices_and_swallows_failures() {
        let (mut board, ids) = board();
        let service = FakeService::failing();

        // Move "d" onto "a": remove index 3, insert at index 0.
        let plan = drop_and_persist(&mut board, &service, ids[3], DropTarget::Card(ids[0]))
            .await
            .unwrap();

        let expected = vec![ids[3], ids[0], ids[2]];
        assert_eq!(
            plan,
            DropPlan::Reorder {
                status: TaskStatus::Todo,
                ordered_ids: expected.clone()
            }
        );
        assert_eq!(board.tasks()[0].id, ids[3]);
        assert_eq!(board.task(ids[2]).unwrap().order, 2);
        assert_eq!(service.calls(), vec![Call::Reorder(expected)]);
        assert!(board.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn reorder_is_sent_without_settling() {
        let (mut board, ids) = board();
        let service = FakeService::failing();

        let plan = board.drop_on(ids[2], DropTarget::Card(ids[0])).unwrap();
        assert!(persist_plan(&service, &plan).await.is_none());

        assert_eq!(service.calls(), vec![Call::Reorder(vec![ids[2], ids[0], ids[3]])]);
        assert_eq!(board.tasks()[0].id, ids[2]);
        assert!(!board.is_busy());
        assert!(board.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn detached_move_settles_through_its_ticket() {
        let (mut board, ids) = board();
        let before = board.tasks().to_vec();
        let service: Arc<dyn TaskService> = Arc::new(FakeService::failing());

        // The desktop shell sends from another task and settles on the UI thread.
        let plan = board.drop_on(ids[0], DropTarget::Column(TaskStatus::Done)).unwrap();
        let sender = Arc::clone(&service);
        let settled = tokio::spawn(async move { persist_plan(sender.as_ref(), &plan).await })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::Done);

        assert!(board.settle(settled.ticket, settled.result));
        assert_eq!(board.tasks(), before.as_slice());
        assert_eq!(board.drain_notices().len(), 1);
    }

    #[tokio::test]
    async fn noop_plan_sends_nothing() {
        let service = FakeService::default();
        assert!(persist_plan(&service, &DropPlan::Noop).await.is_none());
        assert!(service.calls().is_empty());
    }

    #[test]
    fn refetch_during_pending_move_becomes_rollback_point() {
        let (mut board, ids) = board();
        let DropPlan::Move(request) = board.drop_on(ids[0], DropTarget::Column(TaskStatus::Done)).unwrap() else {
            panic!("expected a move");
        };

        let mut fresh = board.tasks().to_vec();
        fresh[0].status = TaskStatus::Todo;
        fresh[0].progress = 0;
        fresh[2].title = "renamed elsewhere".into();
        board.replace_tasks(fresh);
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::Done);

        board.settle(request.ticket, Err(ApiError::Api("nope".into())));
        assert_eq!(board.task(ids[0]).unwrap().status, TaskStatus::Todo);
        assert_eq!(board.task(ids[2]).unwrap().title, "renamed elsewhere");
    }

    #[test]
    fn refreshed_task_keeps_pending_status() {
        let (mut board, ids) = board();
        let DropPlan::Move(request) = board.drop_on(ids[0], DropTarget::Column(TaskStatus::Done)).unwrap() else {
            panic!("expected a move");
        };

        let mut server_copy = board.task(ids[0]).unwrap().clone();
        server_copy.status = TaskStatus::Todo;
        server_copy.progress = 0;
        server_copy.title = "a, with dates".into();
        board.refresh_task(server_copy);

        let task = board.task(ids[0]).unwrap();
        assert_eq!(task.title, "a, with dates");
        assert_eq!(task.status, TaskStatus::Done);

        board.settle(request.ticket, Err(ApiError::MissingData));
        let task = board.task(ids[0]).unwrap();
        assert_eq!(task.title, "a, with dates");
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn unknown_tasks_are_rejected() {
        let (mut board, _) = board();
        let stranger = Uuid::new_v4();
        assert_eq!(board.begin_drag(stranger), Err(BoardError::UnknownTask(stranger)));
        assert_eq!(
            board.drop_on(stranger, DropTarget::Column(TaskStatus::Done)),
            Err(BoardError::UnknownTask(stranger))
        );
    }

    #[test]
    fn columns_follow_board_order() {
        let (board, ids) = board();
        let columns = board.columns();
        assert_eq!(columns.len(), TaskStatus::board_columns().len());
        let (status, todo) = &columns[0];
        assert_eq!(*status, TaskStatus::Todo);
        let todo_ids: Vec<Uuid> = todo.iter().map(|t| t.id).collect();
        assert_eq!(todo_ids, vec![ids[0], ids[2], ids[3]]);
    }
}
