//! Messages that manage a router instead of being routed

use crate::{addr::Addr, message_queue::{MessageEnvelope, Payload}};

#[derive(Clone, Debug)]
pub struct AddRoutee(pub Addr);

/// Removes a routee. Pool routees are also stopped.
#[derive(Clone, Debug)]
pub struct RemoveRoutee(pub Addr);

/// Answered with [Routees].
#[derive(Clone, Copy, Debug)]
pub struct GetRoutees;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routees(pub Vec<Addr>);

/// Delivers the wrapped payload to every routee, whatever the strategy.
#[derive(Clone)]
pub struct BroadcastMessage(pub Payload);

pub(crate) fn is_management_message(envelope: &MessageEnvelope) -> bool {
    envelope.is::<AddRoutee>()
        || envelope.is::<RemoveRoutee>()
        || envelope.is::<GetRoutees>()
        || envelope.is::<BroadcastMessage>()
}
