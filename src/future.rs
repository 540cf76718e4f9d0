//! Ask futures: one-shot containers for a reply
//!
//! An [ActorFuture] is registered in the process registry like any actor, so
//! its address can be handed out as the sender of a request. The first
//! message it receives (or its deadline) completes it. Completion is torn
//! down exactly once by [ActorFuture::finalize]: the timer is cancelled, the
//! backing process unregistered, pipes and continuations notified, waiters
//! released.

use crate::{
    addr::Addr,
    error::FutureError,
    mailbox::panic_reason,
    message_queue::{MessageEnvelope, Payload, SystemMessage},
    process::Process,
    system::ActorSystem,
};
use parking_lot::Mutex;
use std::{
    mem,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, OnceLock, Weak},
    time::Duration,
};
use tokio::{sync::watch, task::AbortHandle};
use tracing::{debug, error};

pub type FutureResult = Result<Payload, FutureError>;

type Continuation = Box<dyn FnOnce(FutureResult) + Send>;

#[derive(Default)]
struct FutureState {
    outcome: Option<FutureResult>,
    done: bool,
    pipes: Vec<Addr>,
    completions: Vec<Continuation>,
    timer: Option<AbortHandle>,
}

struct FutureInner {
    system: ActorSystem,
    addr: OnceLock<Addr>,
    state: Mutex<FutureState>,
    done_tx: watch::Sender<bool>,
}

#[derive(Clone)]
pub struct ActorFuture {
    inner: Arc<FutureInner>,
}

impl ActorFuture {
    /// Creates and registers a future. `timeout: None` means no deadline.
    ///
    /// If registration fails the error is logged and the future stays usable
    /// through this handle, it just has no [addr](ActorFuture::addr).
    /// The deadline runs on the dispatcher's runtime; for a dispatcher
    /// without one this must be called from within a tokio runtime.
    pub fn new(system: &ActorSystem, timeout: Option<Duration>) -> Self {
        let (done_tx, _) = watch::channel(false);
        let future = Self {
            inner: Arc::new(FutureInner {
                system: system.clone(),
                addr: OnceLock::new(),
                state: Mutex::new(FutureState::default()),
                done_tx,
            }),
        };

        let registry = system.registry();
        let id = format!("future{}", registry.next_id());
        let (addr, added) = registry.add(
            Arc::new(FutureProcess {
                future: future.clone(),
            }),
            &id,
        );
        if added {
            let _ = future.inner.addr.set(addr);
        } else {
            error!(%addr, "failed to register future process");
        }

        if let Some(timeout) = timeout {
            let weak = Arc::downgrade(&future.inner);
            let timer = system.spawn_task(expire_after(weak, timeout));
            let mut state = future.inner.state.lock();
            if state.done {
                timer.abort();
            } else {
                state.timer = Some(timer.abort_handle());
            }
        }
        future
    }

    /// Address of the backing process, if registration succeeded.
    pub fn addr(&self) -> Option<&Addr> {
        self.inner.addr.get()
    }

    pub fn is_done(&self) -> bool {
        self.inner.state.lock().done
    }

    /// Stages a reply. Has no effect once the future is done.
    pub fn set_result(&self, value: Payload) {
        let mut state = self.inner.state.lock();
        if !state.done {
            state.outcome = Some(Ok(value));
        }
    }

    /// Stages an error. Has no effect once the future is done.
    pub fn set_error(&self, error: FutureError) {
        let mut state = self.inner.state.lock();
        if !state.done {
            state.outcome = Some(Err(error));
        }
    }

    /// Completes the future with whatever was staged, or [FutureError::Stopped].
    ///
    /// Idempotent: only the first call tears anything down.
    pub fn finalize(&self) {
        let (outcome, pipes, completions, timer) = {
            let mut state = self.inner.state.lock();
            if state.done {
                return;
            }
            state.done = true;
            let outcome = state
                .outcome
                .get_or_insert(Err(FutureError::Stopped))
                .clone();
            (
                outcome,
                mem::take(&mut state.pipes),
                mem::take(&mut state.completions),
                state.timer.take(),
            )
        };

        if let Some(timer) = timer {
            timer.abort();
        }
        if let Some(addr) = self.inner.addr.get() {
            self.inner.system.registry().remove(addr);
        }
        self.deliver(&outcome, &pipes);
        for continuation in completions {
            run_continuation(continuation, outcome.clone());
        }
        self.inner.done_tx.send_replace(true);
        debug!(future = ?self.addr(), ok = outcome.is_ok(), "future completed");
    }

    /// Resolves once the future is done. Any number of tasks may wait.
    pub async fn wait(&self) -> Result<(), FutureError> {
        if !self.is_done() {
            let mut done_rx = self.inner.done_tx.subscribe();
            // the sender lives in `self.inner`, so this only returns once done
            let _ = done_rx.wait_for(|done| *done).await;
        }
        match &self.inner.state.lock().outcome {
            Some(Err(error)) => Err(*error),
            _ => Ok(()),
        }
    }

    pub async fn result(&self) -> FutureResult {
        let _ = self.wait().await;
        self.inner
            .state
            .lock()
            .outcome
            .clone()
            .unwrap_or(Err(FutureError::Stopped))
    }

    /// Forwards the outcome to `addrs` once available, immediately if already done.
    ///
    /// Errors are delivered as a payload holding the [FutureError].
    pub fn pipe_to(&self, addrs: impl IntoIterator<Item = Addr>) {
        let outcome = {
            let mut state = self.inner.state.lock();
            if !state.done {
                state.pipes.extend(addrs);
                return;
            }
            state.outcome.clone()
        };
        if let Some(outcome) = outcome {
            let addrs: Vec<Addr> = addrs.into_iter().collect();
            self.deliver(&outcome, &addrs);
        }
    }

    /// Runs `continuation` with the outcome, right away if already done.
    pub fn continue_with<F>(&self, continuation: F)
    where
        F: FnOnce(FutureResult) + Send + 'static,
    {
        let outcome = {
            let mut state = self.inner.state.lock();
            if !state.done {
                state.completions.push(Box::new(continuation));
                return;
            }
            state.outcome.clone()
        };
        run_continuation(continuation, outcome.unwrap_or(Err(FutureError::Stopped)));
    }

    fn deliver(&self, outcome: &FutureResult, addrs: &[Addr]) {
        if addrs.is_empty() {
            return;
        }
        let message: Payload = match outcome {
            Ok(value) => value.clone(),
            Err(error) => Arc::new(*error),
        };
        for addr in addrs {
            addr.send_user_message(&self.inner.system, MessageEnvelope::new(message.clone()));
        }
    }
}

/// Panics are logged and never unwind into whoever completed the future.
fn run_continuation<F>(continuation: F, outcome: FutureResult)
where
    F: FnOnce(FutureResult),
{
    if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| continuation(outcome))) {
        error!(reason = %panic_reason(panic.as_ref()), "future continuation panicked");
    }
}

async fn expire_after(future: Weak<FutureInner>, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    let Some(inner) = future.upgrade() else {
        return;
    };
    let future = ActorFuture { inner };
    {
        let mut state = future.inner.state.lock();
        if state.done {
            return;
        }
        state.timer = None;
        if state.outcome.is_none() {
            state.outcome = Some(Err(FutureError::Timeout));
        }
    }
    future.finalize();
}

/// Registry face of an [ActorFuture]: the first user message is the reply.
struct FutureProcess {
    future: ActorFuture,
}

impl Process for FutureProcess {
    fn send_user_message(&self, _addr: &Addr, envelope: MessageEnvelope) {
        self.future.set_result(envelope.message);
        self.future.finalize();
    }
    fn send_system_message(&self, addr: &Addr, msg: SystemMessage) {
        match msg {
            SystemMessage::Stop => self.future.finalize(),
            other => debug!(future = %addr, ?other, "ignoring system message"),
        }
    }
}
