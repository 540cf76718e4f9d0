use super::{messages::is_management_message, state::RouterState};
use crate::{
    addr::Addr,
    message_queue::{MessageEnvelope, SystemMessage},
    process::Process,
    system::ActorSystem,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, OnceLock,
};
use tracing::debug;

/// The registry-visible face of a router.
pub struct RouterProcess {
    system: ActorSystem,
    state: Arc<dyn RouterState>,
    router: OnceLock<Addr>,
    parent: OnceLock<Addr>,
    stopped: AtomicBool,
}

impl RouterProcess {
    pub(crate) fn new(system: ActorSystem, state: Arc<dyn RouterState>) -> Self {
        Self {
            system,
            state,
            router: OnceLock::new(),
            parent: OnceLock::new(),
            stopped: AtomicBool::new(false),
        }
    }
    /// The internal router actor. Always set once spawning returned.
    pub fn router(&self) -> Option<&Addr> {
        self.router.get()
    }
    pub fn parent(&self) -> Option<&Addr> {
        self.parent.get()
    }
    pub(crate) fn set_router(&self, router: Addr) {
        let _ = self.router.set(router);
    }
    pub(crate) fn set_parent(&self, parent: Addr) {
        let _ = self.parent.set(parent);
    }
}

impl Process for RouterProcess {
    fn send_user_message(&self, addr: &Addr, envelope: MessageEnvelope) {
        if is_management_message(&envelope) {
            match self.router.get() {
                Some(router) => router.send_user_message(&self.system, envelope),
                None => self.system.dead_letter(addr, "router not started"),
            }
            return;
        }
        let targets = self.state.route(&envelope);
        if targets.is_empty() {
            debug!(router = %addr, "no routees, dropping message");
            return;
        }
        for target in targets {
            target.send_user_message(&self.system, envelope.clone());
        }
    }

    fn send_system_message(&self, addr: &Addr, msg: SystemMessage) {
        match msg {
            SystemMessage::Stop => self.stop(addr),
            other => match self.router.get() {
                Some(router) => router.send_system_message(&self.system, other),
                None => self.system.dead_letter(addr, "router not started"),
            },
        }
    }

    fn stop(&self, addr: &Addr) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(router) = self.router.get() {
            router.stop(&self.system);
        }
        self.system.registry().remove(addr);
        debug!(router = %addr, "router stopped");
    }
}
