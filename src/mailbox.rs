//! Per-actor message buffering and delivery scheduling
//!
//! A [Mailbox] holds two queues. System messages always go first; user
//! messages are handed to the invoker in batches. The mailbox never runs two
//! drains at once: a drain is only dispatched on the Idle → Busy transition of
//! the scheduler status, which is what makes actors single-threaded on top of
//! a shared runtime.

use crate::{
    dispatcher::Dispatcher,
    error::ActorError,
    message_queue::{FailedMessage, MessageBatch, MessageEnvelope, MessageQueue, SystemMessage},
};
use async_trait::async_trait;
use futures_util::FutureExt;
use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    sync::{
        atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering},
        Arc, OnceLock, Weak,
    },
};
use tracing::{debug, warn};

const IDLE: u8 = 0;
const BUSY: u8 = 1;

/// What a mailbox drives. Implemented by the actor cell.
#[async_trait]
pub trait MessageInvoker: Send + Sync {
    async fn invoke_system_message(&self, msg: &SystemMessage) -> Result<(), ActorError>;
    /// Walk the batch with [MessageBatch::deliver] so that, on failure, the
    /// messages after the failing one stay queued.
    async fn invoke_user_message(&self, batch: &MessageBatch) -> Result<(), ActorError>;
    /// Called with the mailbox already suspended. Someone has to post
    /// [SystemMessage::ResumeMailbox] for user messages to flow again.
    fn escalate_failure(&self, error: ActorError, message: Option<FailedMessage>);
}

#[derive(Debug)]
pub enum MailboxEvent<'a> {
    System(&'a SystemMessage),
    User(&'a MessageEnvelope),
    Batch(&'a MessageBatch),
}

/// Observer hooks. Called inline, so keep them cheap.
pub trait MailboxMiddleware: Send + Sync {
    fn mailbox_started(&self) {}
    fn message_posted(&self, _event: &MailboxEvent<'_>) {}
    fn message_received(&self, _event: &MailboxEvent<'_>) {}
    fn mailbox_empty(&self) {}
}

struct Handlers {
    invoker: Arc<dyn MessageInvoker>,
    dispatcher: Arc<dyn Dispatcher>,
}

pub struct Mailbox {
    user_mailbox: MessageQueue<MessageEnvelope>,
    system_mailbox: MessageQueue<SystemMessage>,
    user_messages: AtomicUsize,
    system_messages: AtomicUsize,
    scheduler_status: AtomicU8,
    suspended: AtomicBool,
    batch_size: usize,
    middlewares: Vec<Arc<dyn MailboxMiddleware>>,
    handlers: OnceLock<Handlers>,
    this: Weak<Mailbox>,
}

impl Mailbox {
    pub fn new(batch_size: usize, middlewares: Vec<Arc<dyn MailboxMiddleware>>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            user_mailbox: MessageQueue::new(),
            system_mailbox: MessageQueue::new(),
            user_messages: AtomicUsize::new(0),
            system_messages: AtomicUsize::new(0),
            scheduler_status: AtomicU8::new(IDLE),
            suspended: AtomicBool::new(false),
            batch_size: batch_size.max(1),
            middlewares,
            handlers: OnceLock::new(),
            this: this.clone(),
        })
    }

    /// Attaches the invoker and dispatcher. Only the first call has an effect.
    pub fn register_handlers(
        &self,
        invoker: Arc<dyn MessageInvoker>,
        dispatcher: Arc<dyn Dispatcher>,
    ) {
        if self
            .handlers
            .set(Handlers {
                invoker,
                dispatcher,
            })
            .is_err()
        {
            debug!("mailbox handlers already registered");
        }
    }

    pub fn start(&self) {
        for middleware in &self.middlewares {
            middleware.mailbox_started();
        }
        if self.has_pending_work() {
            self.schedule();
        }
    }

    pub fn post_user_message(&self, msg: MessageEnvelope) {
        for middleware in &self.middlewares {
            middleware.message_posted(&MailboxEvent::User(&msg));
        }
        // count first so a racing drain never takes the counter below zero
        self.user_messages.fetch_add(1, Ordering::SeqCst);
        self.user_mailbox.push(msg);
        self.schedule();
    }

    pub fn post_system_message(&self, msg: SystemMessage) {
        for middleware in &self.middlewares {
            middleware.message_posted(&MailboxEvent::System(&msg));
        }
        self.system_messages.fetch_add(1, Ordering::SeqCst);
        self.system_mailbox.push(msg);
        self.schedule();
    }

    pub fn user_message_count(&self) -> usize {
        self.user_messages.load(Ordering::SeqCst)
    }

    pub fn system_message_count(&self) -> usize {
        self.system_messages.load(Ordering::SeqCst)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn schedule(&self) {
        let Some(handlers) = self.handlers.get() else {
            return;
        };
        if self
            .scheduler_status
            .compare_exchange(IDLE, BUSY, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        match self.this.upgrade() {
            Some(this) => handlers.dispatcher.schedule(this.run().boxed()),
            None => self.scheduler_status.store(IDLE, Ordering::SeqCst),
        }
    }

    fn has_pending_work(&self) -> bool {
        !self.system_mailbox.is_empty()
            || (!self.is_suspended() && !self.user_mailbox.is_empty())
    }

    /// One drain quantum: at most one system message, then at most one batch.
    async fn run(self: Arc<Self>) {
        let Some(handlers) = self.handlers.get() else {
            self.scheduler_status.store(IDLE, Ordering::SeqCst);
            return;
        };
        if let Err((error, message)) = self.process_messages(handlers.invoker.as_ref()).await {
            self.suspended.store(true, Ordering::SeqCst);
            warn!(%error, "mailbox suspended after failure");
            handlers.invoker.escalate_failure(error, message);
        }
        self.scheduler_status.store(IDLE, Ordering::SeqCst);

        if self.has_pending_work() {
            self.schedule();
        } else {
            for middleware in &self.middlewares {
                middleware.mailbox_empty();
            }
        }
    }

    async fn process_messages(
        &self,
        invoker: &dyn MessageInvoker,
    ) -> Result<(), (ActorError, Option<FailedMessage>)> {
        if let Some(msg) = self.system_mailbox.pop() {
            self.system_messages.fetch_sub(1, Ordering::SeqCst);
            let result = match msg {
                SystemMessage::SuspendMailbox => {
                    self.suspended.store(true, Ordering::SeqCst);
                    Ok(())
                }
                SystemMessage::ResumeMailbox => {
                    self.suspended.store(false, Ordering::SeqCst);
                    Ok(())
                }
                _ => guarded(invoker.invoke_system_message(&msg)).await,
            };
            if let Err(error) = result {
                return Err((error, Some(FailedMessage::System(msg))));
            }
            for middleware in &self.middlewares {
                middleware.message_received(&MailboxEvent::System(&msg));
            }
        }

        if self.is_suspended() {
            return Ok(());
        }

        let mut batch = MessageBatch::new(self.user_mailbox.pop_many(self.batch_size));
        if batch.is_empty() {
            return Ok(());
        }
        self.user_messages.fetch_sub(batch.len(), Ordering::SeqCst);
        let result = guarded(invoker.invoke_user_message(&batch)).await;
        if let Err(error) = result {
            let undelivered = batch.take_undelivered();
            if !undelivered.is_empty() {
                debug!(requeued = undelivered.len(), "returning rest of failed batch to the queue");
                self.user_messages.fetch_add(undelivered.len(), Ordering::SeqCst);
                self.user_mailbox.requeue(undelivered);
            }
            return Err((error, Some(FailedMessage::User(batch))));
        }
        for middleware in &self.middlewares {
            middleware.message_received(&MailboxEvent::Batch(&batch));
        }
        Ok(())
    }
}

/// Turns a panic in actor code into an ordinary [ActorError].
async fn guarded<F>(fut: F) -> Result<(), ActorError>
where
    F: Future<Output = Result<(), ActorError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(ActorError::Panicked {
            reason: panic_reason(panic.as_ref()),
        }),
    }
}

pub(crate) fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
