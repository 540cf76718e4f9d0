//! Stores sucralose's error types

use thiserror::Error;

/// Failure raised while an actor processes a message.
///
/// Never leaves the mailbox that caught it: the mailbox suspends itself and
/// hands the error to [MessageInvoker::escalate_failure](crate::mailbox::MessageInvoker::escalate_failure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    #[error("Actor failed to process a message: {reason}")]
    Failed { reason: String },
    #[error("Actor panicked while processing a message: {reason}")]
    Panicked { reason: String },
}

impl ActorError {
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }
}

/// Outcome of an [ActorFuture](crate::future::ActorFuture) that did not receive a reply.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureError {
    #[error("future: timeout")]
    Timeout,
    #[error("future: stopped before a reply arrived")]
    Stopped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("Actor with id {id} already exists")]
    NameExists { id: String },
    #[error("Router {id} failed to start: {reason}")]
    RouterStartFailed { id: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}
