//! The single-actor spawn primitive

use crate::{
    addr::Addr,
    cell::ActorCell,
    context::ActorContext,
    error::SpawnError,
    mailbox::Mailbox,
    message_queue::SystemMessage,
    process::ActorProcess,
    props::Props,
    system::ActorSystem,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Entry point used to bring a process to life under a given id.
#[async_trait]
pub trait Spawner: Send + Sync {
    async fn spawn(
        &self,
        system: &ActorSystem,
        id: &str,
        props: Props,
        parent: Option<Addr>,
    ) -> Result<Addr, SpawnError>;
}

/// Spawns one actor with its own mailbox.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSpawner;

#[async_trait]
impl Spawner for DefaultSpawner {
    async fn spawn(
        &self,
        system: &ActorSystem,
        id: &str,
        props: Props,
        parent: Option<Addr>,
    ) -> Result<Addr, SpawnError> {
        spawn_actor(system, id, props, parent)
    }
}

/// Uses the props' own spawner when they carry one.
pub(crate) async fn spawn(
    system: &ActorSystem,
    id: &str,
    props: Props,
    parent: Option<Addr>,
) -> Result<Addr, SpawnError> {
    match props.spawner().cloned() {
        Some(spawner) => spawner.spawn(system, id, props, parent).await,
        None => DefaultSpawner.spawn(system, id, props, parent).await,
    }
}

pub(crate) fn spawn_actor(
    system: &ActorSystem,
    id: &str,
    props: Props,
    parent: Option<Addr>,
) -> Result<Addr, SpawnError> {
    let batch_size = props
        .mailbox_batch_size()
        .unwrap_or(system.config().mailbox_batch_size);
    let mailbox = Mailbox::new(batch_size, props.middlewares().to_vec());
    let process = Arc::new(ActorProcess::new(mailbox.clone()));
    let (addr, added) = system.registry().add(process, id);
    if !added {
        return Err(SpawnError::NameExists { id: id.to_owned() });
    }

    let ctx = ActorContext::new(system.clone(), addr.clone(), parent);
    let cell = Arc::new(ActorCell::new(props.produce(), ctx));
    let dispatcher = props
        .dispatcher()
        .cloned()
        .unwrap_or_else(|| system.dispatcher());
    mailbox.register_handlers(cell, dispatcher);
    mailbox.post_system_message(SystemMessage::Started);
    mailbox.start();
    debug!(actor = %addr, batch_size, "actor spawned");
    Ok(addr)
}
