//! Glue between a mailbox and the actor it drives

use crate::{
    actor::{Actor, ActorState},
    addr::Addr,
    context::ActorContext,
    error::ActorError,
    mailbox::MessageInvoker,
    message_queue::{FailedMessage, MessageBatch, SystemMessage},
    system::ActorSystem,
};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error};

struct Incarnation {
    actor: Box<dyn Actor>,
    ctx: ActorContext,
}

/// Invoker for a regular actor.
///
/// The lock is never contended: the mailbox runs at most one drain at a time.
/// It only exists so the actor can be borrowed mutably across awaits.
pub(crate) struct ActorCell {
    system: ActorSystem,
    address: Addr,
    parent: Option<Addr>,
    incarnation: Mutex<Incarnation>,
}

impl ActorCell {
    pub fn new(actor: Box<dyn Actor>, ctx: ActorContext) -> Self {
        Self {
            system: ctx.system().clone(),
            address: ctx.address().clone(),
            parent: ctx.parent().cloned(),
            incarnation: Mutex::new(Incarnation { actor, ctx }),
        }
    }
}

#[async_trait]
impl MessageInvoker for ActorCell {
    async fn invoke_system_message(&self, msg: &SystemMessage) -> Result<(), ActorError> {
        let mut guard = self.incarnation.lock().await;
        let Incarnation { actor, ctx } = &mut *guard;
        match msg {
            SystemMessage::Started => {
                if ctx.state() != ActorState::Starting {
                    return Ok(());
                }
                actor.started(ctx).await?;
                ctx.set_state(ActorState::Running);
            }
            SystemMessage::Stop => {
                if ctx.state() == ActorState::Stopped {
                    return Ok(());
                }
                ctx.set_state(ActorState::Stopping);
                for child in ctx.take_children() {
                    child.stop(&self.system);
                }
                actor.stopped(ctx).await;
                self.system.registry().remove(&self.address);
                ctx.set_state(ActorState::Stopped);
                debug!(actor = %self.address, "actor stopped");
            }
            SystemMessage::Failure { child, reason } => {
                actor.child_failed(child, reason, ctx).await;
            }
            // handled by the mailbox itself
            SystemMessage::SuspendMailbox | SystemMessage::ResumeMailbox => {}
        }
        Ok(())
    }

    async fn invoke_user_message(&self, batch: &MessageBatch) -> Result<(), ActorError> {
        let mut guard = self.incarnation.lock().await;
        let Incarnation { actor, ctx } = &mut *guard;
        if ctx.state() == ActorState::Stopped {
            debug!(actor = %self.address, dropped = batch.len(), "messages for stopped actor");
            return Ok(());
        }
        for envelope in batch.deliver() {
            ctx.set_sender(envelope.sender.clone());
            let result = actor.receive(envelope.message.clone(), ctx).await;
            ctx.set_sender(None);
            result?;
        }
        Ok(())
    }

    fn escalate_failure(&self, error: ActorError, message: Option<FailedMessage>) {
        error!(actor = %self.address, %error, ?message, "actor failed, escalating");
        match &self.parent {
            Some(parent) => parent.send_system_message(
                &self.system,
                SystemMessage::Failure {
                    child: self.address.clone(),
                    reason: error,
                },
            ),
            None => debug!(actor = %self.address, "failure in root actor has no parent to escalate to"),
        }
    }
}
