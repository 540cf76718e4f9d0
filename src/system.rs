use crate::{
    addr::Addr,
    config::SystemConfig,
    dispatcher::{Dispatcher, TokioDispatcher},
    error::{ConfigError, SpawnError},
    future::ActorFuture,
    message_queue::{payload, MessageEnvelope},
    props::Props,
    registry::ProcessRegistry,
    spawner,
};
use std::{any::Any, future::Future, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{info, warn};

struct SystemInner {
    config: SystemConfig,
    registry: ProcessRegistry,
    dispatcher: Arc<dyn Dispatcher>,
}

/// Handle to a running actor system. Cheap to clone.
#[derive(Clone)]
pub struct ActorSystem {
    inner: Arc<SystemInner>,
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ActorSystem {
    pub fn new() -> Self {
        Self::build(SystemConfig::default(), Arc::new(TokioDispatcher::new()))
    }

    pub fn with_config(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, Arc::new(TokioDispatcher::new())))
    }

    /// Like [ActorSystem::with_config] but with a different default dispatcher.
    pub fn with_dispatcher(
        config: SystemConfig,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, dispatcher))
    }

    fn build(config: SystemConfig, dispatcher: Arc<dyn Dispatcher>) -> Self {
        info!(address = %config.address, batch_size = config.mailbox_batch_size, "actor system created");
        Self {
            inner: Arc::new(SystemInner {
                registry: ProcessRegistry::new(config.address.as_str()),
                config,
                dispatcher,
            }),
        }
    }

    #[inline]
    pub fn registry(&self) -> &ProcessRegistry {
        &self.inner.registry
    }
    #[inline]
    pub fn config(&self) -> &SystemConfig {
        &self.inner.config
    }
    #[inline]
    pub fn address(&self) -> &str {
        self.inner.registry.address()
    }
    pub(crate) fn dispatcher(&self) -> Arc<dyn Dispatcher> {
        self.inner.dispatcher.clone()
    }
    /// Spawns on the dispatcher's runtime, or the caller's if it has none.
    pub(crate) fn spawn_task<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match self.inner.dispatcher.runtime() {
            Some(handle) => handle.spawn(task),
            None => tokio::spawn(task),
        }
    }

    /// Spawns a top-level actor under a generated id.
    pub async fn spawn(&self, props: Props) -> Result<Addr, SpawnError> {
        let id = self.registry().next_id();
        spawner::spawn(self, &id, props, None).await
    }

    /// Spawns a top-level actor under `id`. Fails with
    /// [SpawnError::NameExists] if the id is taken; the registry is left as it was.
    pub async fn spawn_named(&self, props: Props, id: &str) -> Result<Addr, SpawnError> {
        spawner::spawn(self, id, props, None).await
    }

    pub fn send<M: Any + Send + Sync>(&self, target: &Addr, msg: M) {
        target.send_user_message(self, MessageEnvelope::new(payload(msg)));
    }

    pub fn request<M: Any + Send + Sync>(&self, target: &Addr, msg: M, sender: Addr) {
        target.send_user_message(self, MessageEnvelope::with_sender(payload(msg), Some(sender)));
    }

    /// Sends `msg` with a new [ActorFuture] as its reply address.
    ///
    /// `timeout: None` waits forever. With a deadline this must be called
    /// from within a tokio runtime unless the dispatcher carries its own.
    pub fn request_future<M: Any + Send + Sync>(
        &self,
        target: &Addr,
        msg: M,
        timeout: Option<Duration>,
    ) -> ActorFuture {
        let future = ActorFuture::new(self, timeout);
        target.send_user_message(
            self,
            MessageEnvelope::with_sender(payload(msg), future.addr().cloned()),
        );
        future
    }

    pub fn stop(&self, target: &Addr) {
        target.stop(self);
    }

    pub(crate) fn dead_letter(&self, target: &Addr, what: &str) {
        if self.inner.config.log_dead_letters {
            warn!(addr = %target, what, "dead letter");
        }
    }
}
