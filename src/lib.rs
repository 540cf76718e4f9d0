pub mod actor;
pub mod addr;
mod cell;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod future;
pub mod logging;
pub mod mailbox;
pub mod message_queue;
pub mod process;
pub mod props;
pub mod registry;
pub mod router;
pub mod spawner;
pub mod system;

pub mod prelude {
    pub use crate::{
        actor::Actor,
        addr::Addr,
        config::SystemConfig,
        context::ActorContext,
        error::{ActorError, FutureError, SpawnError},
        future::ActorFuture,
        message_queue::{payload, MessageEnvelope, Payload, SystemMessage},
        props::Props,
        router::{RouterConfig, RouterSpawner},
        system::ActorSystem,
    };
    pub use async_trait::async_trait;
}
