use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Lifecycle of the single "current" request of one kind.
///
/// Only the active id may complete; anything else is a superseded request.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Marks `id` as the current task and returns the token of the task it
    /// replaced, if any.
    pub fn start(&mut self, id: TaskId, cancel: CancellationToken) -> Option<CancellationToken> {
        self.active = Some(id);
        self.cancel.replace(cancel)
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Forgets the current task, handing back its token so the caller can cancel it.
    pub fn take(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }
}
