use costq_core::{CostqError, Task, WorkerId};

/// The boundary between a worker pool and the scheduler feeding it.
///
/// Producers call [`push`](TaskScheduler::push); idle workers call
/// [`pop`](TaskScheduler::pop), run the task, then report it back through
/// [`finished`](TaskScheduler::finished). `pop` never blocks: `None` means
/// nothing is queued right now and retrying is up to the caller.
pub trait TaskScheduler<T: Task>: Send + Sync {
    /// Queue a task.
    fn push(&self, task: T) -> Result<(), CostqError>;

    /// Hand the next task to `worker`, or `None` when nothing is queued.
    fn pop(&self, worker: WorkerId) -> Option<T>;

    /// Report that `worker` is done with a task it got from `pop`.
    fn finished(&self, task: &T, worker: WorkerId);

    /// Number of queued (not yet dispatched) tasks.
    fn size(&self) -> usize;

    fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Discard all queued tasks.
    fn clear(&self);
}
