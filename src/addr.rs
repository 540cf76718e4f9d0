use crate::{
    message_queue::{MessageEnvelope, SystemMessage},
    system::ActorSystem,
};
use std::fmt;

/// Address of a registered process.
///
/// An `Addr` is just a name. It is resolved through the
/// [ProcessRegistry](crate::registry::ProcessRegistry) on every send, so it
/// stays valid (and cheap to clone) after the process it named is gone.
/// Sends to such an address end up as dead letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Addr {
    address: String,
    id: String,
}

impl Addr {
    pub fn new(address: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            id: id.into(),
        }
    }
    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn send_user_message(&self, system: &ActorSystem, envelope: impl Into<MessageEnvelope>) {
        let envelope = envelope.into();
        match system.registry().get(self) {
            Some(process) => process.send_user_message(self, envelope),
            None => system.dead_letter(self, "user message"),
        }
    }
    pub fn send_system_message(&self, system: &ActorSystem, msg: SystemMessage) {
        match system.registry().get(self) {
            Some(process) => process.send_system_message(self, msg),
            None => system.dead_letter(self, "system message"),
        }
    }
    pub fn stop(&self, system: &ActorSystem) {
        if let Some(process) = system.registry().get(self) {
            process.stop(self);
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.id)
    }
}
