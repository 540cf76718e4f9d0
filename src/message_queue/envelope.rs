//! Messages travelling through a mailbox

use crate::{addr::Addr, error::ActorError};
use std::{
    any::Any,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Opaque message body. Shared by reference so one reply can reach several pipes.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Wraps any value into a [Payload].
pub fn payload<M: Any + Send + Sync>(msg: M) -> Payload {
    Arc::new(msg)
}

/// A user message together with the address a reply should go to.
#[derive(Clone)]
pub struct MessageEnvelope {
    pub message: Payload,
    pub sender: Option<Addr>,
}

impl MessageEnvelope {
    pub fn new(message: Payload) -> Self {
        Self {
            message,
            sender: None,
        }
    }
    pub fn with_sender(message: Payload, sender: Option<Addr>) -> Self {
        Self { message, sender }
    }
    #[inline]
    pub fn is<M: Any>(&self) -> bool {
        self.message.is::<M>()
    }
    #[inline]
    pub fn downcast_ref<M: Any>(&self) -> Option<&M> {
        self.message.downcast_ref::<M>()
    }
}

impl fmt::Debug for MessageEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEnvelope")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl From<Payload> for MessageEnvelope {
    fn from(message: Payload) -> Self {
        Self::new(message)
    }
}

/// Control messages. These bypass the user queue and are always preferred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SystemMessage {
    Started,
    Stop,
    SuspendMailbox,
    ResumeMailbox,
    /// A child escalated a failure to its parent.
    Failure { child: Addr, reason: ActorError },
}

/// User messages handed to the invoker in one go, in enqueue order.
///
/// Invokers walk the batch with [MessageBatch::deliver], which records how
/// far delivery got. If the invoker fails, the mailbox puts everything after
/// the failing message back in front of its user queue.
#[derive(Debug, Default)]
pub struct MessageBatch {
    messages: Vec<MessageEnvelope>,
    delivered: AtomicUsize,
}

impl MessageBatch {
    pub fn new(messages: Vec<MessageEnvelope>) -> Self {
        Self {
            messages,
            delivered: AtomicUsize::new(0),
        }
    }
    pub fn len(&self) -> usize {
        self.messages.len()
    }
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &MessageEnvelope> {
        self.messages.iter()
    }
    /// Like [MessageBatch::iter], but counts each message as it is handed out.
    pub fn deliver(&self) -> impl Iterator<Item = &MessageEnvelope> {
        self.messages.iter().inspect(move |_| {
            self.delivered.fetch_add(1, Ordering::SeqCst);
        })
    }
    /// Splits off the messages [MessageBatch::deliver] never handed out.
    ///
    /// A batch nobody walked with `deliver` gives nothing back: the whole of
    /// it counts as failed.
    pub(crate) fn take_undelivered(&mut self) -> Vec<MessageEnvelope> {
        let delivered = *self.delivered.get_mut();
        if delivered == 0 || delivered >= self.messages.len() {
            return Vec::new();
        }
        self.messages.split_off(delivered)
    }
}

impl Clone for MessageBatch {
    fn clone(&self) -> Self {
        Self {
            messages: self.messages.clone(),
            delivered: AtomicUsize::new(self.delivered.load(Ordering::SeqCst)),
        }
    }
}

/// The message that was being processed when a mailbox caught a failure.
#[derive(Clone, Debug)]
pub enum FailedMessage {
    System(SystemMessage),
    /// The batch up to and including the failing message.
    User(MessageBatch),
}
