use super::{
    config::{RouterConfig, RouterKind},
    messages::{AddRoutee, BroadcastMessage, GetRoutees, RemoveRoutee, Routees},
    state::RouterState,
};
use crate::{
    actor::Actor,
    context::ActorContext,
    error::ActorError,
    message_queue::Payload,
    props::Props,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// Owns a router's routees and answers management messages.
pub(crate) struct RouterActor {
    config: RouterConfig,
    routee_props: Props,
    state: Arc<dyn RouterState>,
    started: Option<oneshot::Sender<()>>,
}

impl RouterActor {
    pub fn new(
        config: RouterConfig,
        routee_props: Props,
        state: Arc<dyn RouterState>,
        started: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self {
            config,
            routee_props,
            state,
            started,
        }
    }
}

#[async_trait]
impl Actor for RouterActor {
    async fn started(&mut self, ctx: &mut ActorContext) -> Result<(), ActorError> {
        // dropped unsent on failure, which the spawner sees as a failed start
        let started = self.started.take();
        let routees = match &self.config.kind {
            RouterKind::Pool { size } => {
                let mut routees = Vec::with_capacity(*size);
                for _ in 0..*size {
                    let routee = ctx
                        .spawn(self.routee_props.clone())
                        .await
                        .map_err(ActorError::failed)?;
                    routees.push(routee);
                }
                routees
            }
            RouterKind::Group { routees } => routees.clone(),
        };
        debug!(router = %ctx.address(), routees = routees.len(), "router actor started");
        self.state.set_routees(routees);
        if let Some(started) = started {
            let _ = started.send(());
        }
        Ok(())
    }

    async fn receive(&mut self, msg: Payload, ctx: &mut ActorContext) -> Result<(), ActorError> {
        if let Some(AddRoutee(routee)) = msg.downcast_ref::<AddRoutee>() {
            self.state.add_routee(routee.clone());
        } else if let Some(RemoveRoutee(routee)) = msg.downcast_ref::<RemoveRoutee>() {
            self.state.remove_routee(routee);
            if self.config.is_pool() {
                ctx.stop_child(routee);
            }
        } else if msg.is::<GetRoutees>() {
            ctx.respond(Routees(self.state.routees()));
        } else if let Some(BroadcastMessage(inner)) = msg.downcast_ref::<BroadcastMessage>() {
            for routee in self.state.routees() {
                ctx.forward(&routee, inner.clone());
            }
        } else {
            // the façade routes ordinary messages without involving this actor
            debug!(router = %ctx.address(), "ignoring unexpected message");
        }
        Ok(())
    }
}
