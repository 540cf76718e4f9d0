use futures_util::future::BoxFuture;
use tokio::runtime::Handle;

/// Runs mailbox drains. No ordering is promised between different mailboxes.
pub trait Dispatcher: Send + Sync {
    fn schedule(&self, task: BoxFuture<'static, ()>);
    /// Runtime for work the system spawns itself, such as future deadlines.
    /// `None` means the runtime of the caller.
    fn runtime(&self) -> Option<Handle> {
        None
    }
}

/// Spawns each drain as a tokio task.
///
/// Without an explicit handle the task goes to the runtime of the caller,
/// so mailboxes must be posted to from inside a runtime.
#[derive(Clone, Debug, Default)]
pub struct TokioDispatcher {
    handle: Option<Handle>,
}

impl TokioDispatcher {
    pub fn new() -> Self {
        Self { handle: None }
    }
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl Dispatcher for TokioDispatcher {
    fn schedule(&self, task: BoxFuture<'static, ()>) {
        match &self.handle {
            Some(handle) => {
                handle.spawn(task);
            }
            None => {
                tokio::spawn(task);
            }
        }
    }
    fn runtime(&self) -> Option<Handle> {
        self.handle.clone()
    }
}
