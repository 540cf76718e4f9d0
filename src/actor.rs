use crate::{addr::Addr, context::ActorContext, error::ActorError, message_queue::Payload};
use async_trait::async_trait;
use tracing::warn;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActorState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Behavior of an actor.
///
/// The runtime calls these one at a time per actor, never concurrently, so
/// `&mut self` is all the synchronization an actor needs. Returning an error
/// (or panicking) suspends the actor's mailbox and escalates to its parent.
#[async_trait]
pub trait Actor: Send + 'static {
    async fn started(&mut self, _ctx: &mut ActorContext) -> Result<(), ActorError> {
        Ok(())
    }

    /// Handles one user message. The sender, if any, is available via [ActorContext::sender].
    async fn receive(&mut self, msg: Payload, ctx: &mut ActorContext) -> Result<(), ActorError>;

    async fn stopped(&mut self, _ctx: &mut ActorContext) {}

    /// A child escalated a failure. Its mailbox stays suspended until someone
    /// posts [SystemMessage::ResumeMailbox](crate::message_queue::SystemMessage::ResumeMailbox) to it.
    async fn child_failed(&mut self, child: &Addr, reason: &ActorError, ctx: &mut ActorContext) {
        warn!(parent = %ctx.address(), %child, %reason, "child actor failed");
    }
}
