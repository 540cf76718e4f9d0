use crate::{
    actor::Actor,
    dispatcher::Dispatcher,
    mailbox::MailboxMiddleware,
    spawner::Spawner,
};
use std::sync::Arc;

type Producer = Arc<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

/// Recipe for spawning an actor: how to build it and how its mailbox behaves.
#[derive(Clone)]
pub struct Props {
    producer: Producer,
    mailbox_batch_size: Option<usize>,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    middlewares: Vec<Arc<dyn MailboxMiddleware>>,
    spawner: Option<Arc<dyn Spawner>>,
}

impl Props {
    pub fn from_producer<A, F>(producer: F) -> Self
    where
        A: Actor,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(move || Box::new(producer()) as Box<dyn Actor>),
            mailbox_batch_size: None,
            dispatcher: None,
            middlewares: Vec::new(),
            spawner: None,
        }
    }
    /// Overrides [SystemConfig::mailbox_batch_size](crate::config::SystemConfig::mailbox_batch_size).
    pub fn with_mailbox_batch_size(mut self, batch_size: usize) -> Self {
        self.mailbox_batch_size = Some(batch_size);
        self
    }
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }
    pub fn with_mailbox_middleware(mut self, middleware: Arc<dyn MailboxMiddleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }
    /// Replaces the default spawn primitive, e.g. with a
    /// [RouterSpawner](crate::router::RouterSpawner).
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub(crate) fn without_spawner(mut self) -> Self {
        self.spawner = None;
        self
    }
    pub(crate) fn produce(&self) -> Box<dyn Actor> {
        (self.producer)()
    }
    pub(crate) fn mailbox_batch_size(&self) -> Option<usize> {
        self.mailbox_batch_size
    }
    pub(crate) fn dispatcher(&self) -> Option<&Arc<dyn Dispatcher>> {
        self.dispatcher.as_ref()
    }
    pub(crate) fn middlewares(&self) -> &[Arc<dyn MailboxMiddleware>] {
        &self.middlewares
    }
    pub(crate) fn spawner(&self) -> Option<&Arc<dyn Spawner>> {
        self.spawner.as_ref()
    }
}
