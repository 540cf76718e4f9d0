use crate::{
    actor::ActorState,
    addr::Addr,
    error::SpawnError,
    future::ActorFuture,
    message_queue::{payload, MessageEnvelope, Payload, SystemMessage},
    props::Props,
    spawner,
    system::ActorSystem,
};
use std::{any::Any, time::Duration};

/// Everything an actor can see of the runtime while it handles a message.
pub struct ActorContext {
    system: ActorSystem,
    address: Addr,
    parent: Option<Addr>,
    sender: Option<Addr>,
    children: Vec<Addr>,
    state: ActorState,
}

impl ActorContext {
    #[inline]
    pub fn state(&self) -> ActorState {
        self.state
    }
    #[inline]
    pub fn address(&self) -> &Addr {
        &self.address
    }
    #[inline]
    pub fn parent(&self) -> Option<&Addr> {
        self.parent.as_ref()
    }
    /// Sender of the message currently being handled.
    #[inline]
    pub fn sender(&self) -> Option<&Addr> {
        self.sender.as_ref()
    }
    #[inline]
    pub fn system(&self) -> &ActorSystem {
        &self.system
    }
    pub fn children(&self) -> &[Addr] {
        &self.children
    }

    /// Fire and forget.
    pub fn send<M: Any + Send + Sync>(&self, target: &Addr, msg: M) {
        target.send_user_message(&self.system, MessageEnvelope::new(payload(msg)));
    }
    /// Sends with this actor as the reply address.
    pub fn request<M: Any + Send + Sync>(&self, target: &Addr, msg: M) {
        target.send_user_message(
            &self.system,
            MessageEnvelope::with_sender(payload(msg), Some(self.address.clone())),
        );
    }
    /// Sends with a fresh [ActorFuture] as the reply address.
    pub fn request_future<M: Any + Send + Sync>(
        &self,
        target: &Addr,
        msg: M,
        timeout: Option<Duration>,
    ) -> ActorFuture {
        self.system.request_future(target, msg, timeout)
    }
    /// Replies to the sender of the current message. Dropped as a dead letter if there is none.
    pub fn respond<M: Any + Send + Sync>(&self, msg: M) {
        match &self.sender {
            Some(sender) => sender.send_user_message(&self.system, MessageEnvelope::new(payload(msg))),
            None => self.system.dead_letter(&self.address, "response without sender"),
        }
    }
    /// Passes the current message on, keeping the original sender.
    pub fn forward(&self, target: &Addr, msg: Payload) {
        target.send_user_message(
            &self.system,
            MessageEnvelope::with_sender(msg, self.sender.clone()),
        );
    }

    /// Spawns a child with a generated name.
    pub async fn spawn(&mut self, props: Props) -> Result<Addr, SpawnError> {
        let name = self.system.registry().next_id();
        self.spawn_named(props, &name).await
    }
    /// Spawns a child registered as `<own id>/<name>`.
    pub async fn spawn_named(&mut self, props: Props, name: &str) -> Result<Addr, SpawnError> {
        let id = format!("{}/{}", self.address.id(), name);
        let child = spawner::spawn(&self.system, &id, props, Some(self.address.clone())).await?;
        self.children.push(child.clone());
        Ok(child)
    }
    pub fn stop_child(&mut self, child: &Addr) {
        self.children.retain(|c| c != child);
        child.stop(&self.system);
    }
    /// Asks the runtime to stop this actor once the current message is handled.
    pub fn stop(&self) {
        self.address.send_system_message(&self.system, SystemMessage::Stop);
    }

    pub(crate) fn new(system: ActorSystem, address: Addr, parent: Option<Addr>) -> Self {
        Self {
            system,
            address,
            parent,
            sender: None,
            children: Vec::new(),
            state: ActorState::Starting,
        }
    }
    pub(crate) fn set_state(&mut self, state: ActorState) {
        self.state = state;
    }
    pub(crate) fn set_sender(&mut self, sender: Option<Addr>) {
        self.sender = sender;
    }
    pub(crate) fn take_children(&mut self) -> Vec<Addr> {
        std::mem::take(&mut self.children)
    }
}
