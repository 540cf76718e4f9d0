use crate::{
    addr::Addr,
    mailbox::Mailbox,
    message_queue::{MessageEnvelope, SystemMessage},
};
use std::sync::Arc;

/// Anything that can sit in the registry and receive messages.
pub trait Process: Send + Sync {
    fn send_user_message(&self, addr: &Addr, envelope: MessageEnvelope);
    fn send_system_message(&self, addr: &Addr, msg: SystemMessage);
    fn stop(&self, addr: &Addr) {
        self.send_system_message(addr, SystemMessage::Stop);
    }
}

/// Process backed by a mailbox, i.e. a regular actor.
pub struct ActorProcess {
    mailbox: Arc<Mailbox>,
}

impl ActorProcess {
    pub fn new(mailbox: Arc<Mailbox>) -> Self {
        Self { mailbox }
    }
}

impl Process for ActorProcess {
    fn send_user_message(&self, _addr: &Addr, envelope: MessageEnvelope) {
        self.mailbox.post_user_message(envelope);
    }
    fn send_system_message(&self, _addr: &Addr, msg: SystemMessage) {
        self.mailbox.post_system_message(msg);
    }
}
