use crate::{addr::Addr, message_queue::MessageEnvelope};
use parking_lot::RwLock;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Routing decision shared by a router's façade and its router actor.
pub trait RouterState: Send + Sync {
    /// Targets for one message. Empty when there are no routees.
    fn route(&self, envelope: &MessageEnvelope) -> Vec<Addr>;
    fn set_routees(&self, routees: Vec<Addr>);
    fn routees(&self) -> Vec<Addr>;

    fn add_routee(&self, routee: Addr) {
        let mut routees = self.routees();
        if !routees.contains(&routee) {
            routees.push(routee);
            self.set_routees(routees);
        }
    }
    fn remove_routee(&self, routee: &Addr) {
        let mut routees = self.routees();
        routees.retain(|r| r != routee);
        self.set_routees(routees);
    }
}

/// Cycles through the routees in list order.
#[derive(Default)]
pub struct RoundRobinState {
    routees: RwLock<Vec<Addr>>,
    index: AtomicUsize,
}

impl RouterState for RoundRobinState {
    fn route(&self, _envelope: &MessageEnvelope) -> Vec<Addr> {
        let routees = self.routees.read();
        if routees.is_empty() {
            return Vec::new();
        }
        let i = self.index.fetch_add(1, Ordering::Relaxed) % routees.len();
        vec![routees[i].clone()]
    }
    fn set_routees(&self, routees: Vec<Addr>) {
        *self.routees.write() = routees;
    }
    fn routees(&self) -> Vec<Addr> {
        self.routees.read().clone()
    }
}

#[derive(Default)]
pub struct RandomState {
    routees: RwLock<Vec<Addr>>,
}

impl RouterState for RandomState {
    fn route(&self, _envelope: &MessageEnvelope) -> Vec<Addr> {
        let routees = self.routees.read();
        if routees.is_empty() {
            return Vec::new();
        }
        let i = rand::thread_rng().gen_range(0..routees.len());
        vec![routees[i].clone()]
    }
    fn set_routees(&self, routees: Vec<Addr>) {
        *self.routees.write() = routees;
    }
    fn routees(&self) -> Vec<Addr> {
        self.routees.read().clone()
    }
}

/// Every message goes to every routee.
#[derive(Default)]
pub struct BroadcastState {
    routees: RwLock<Vec<Addr>>,
}

impl RouterState for BroadcastState {
    fn route(&self, _envelope: &MessageEnvelope) -> Vec<Addr> {
        self.routees.read().clone()
    }
    fn set_routees(&self, routees: Vec<Addr>) {
        *self.routees.write() = routees;
    }
    fn routees(&self) -> Vec<Addr> {
        self.routees.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_queue::payload;

    fn routees(n: usize) -> Vec<Addr> {
        (0..n).map(|i| Addr::new("local", format!("r{i}"))).collect()
    }

    fn envelope() -> MessageEnvelope {
        MessageEnvelope::new(payload(()))
    }

    #[test]
    fn round_robin_wraps_in_list_order() {
        let state = RoundRobinState::default();
        state.set_routees(routees(3));
        let picked: Vec<_> = (0..6)
            .map(|_| state.route(&envelope())[0].id().to_owned())
            .collect();
        assert_eq!(picked, ["r0", "r1", "r2", "r0", "r1", "r2"]);
    }

    #[test]
    fn random_picks_a_single_known_routee() {
        let state = RandomState::default();
        state.set_routees(routees(4));
        for _ in 0..50 {
            let picked = state.route(&envelope());
            assert_eq!(picked.len(), 1);
            assert!(state.routees().contains(&picked[0]));
        }
    }

    #[test]
    fn broadcast_targets_everyone() {
        let state = BroadcastState::default();
        state.set_routees(routees(3));
        assert_eq!(state.route(&envelope()), routees(3));
    }

    #[test]
    fn no_routees_means_no_targets() {
        assert!(RoundRobinState::default().route(&envelope()).is_empty());
        assert!(RandomState::default().route(&envelope()).is_empty());
        assert!(BroadcastState::default().route(&envelope()).is_empty());
    }

    #[test]
    fn add_and_remove_routees() {
        let state = RoundRobinState::default();
        let [a, b] = [Addr::new("local", "a"), Addr::new("local", "b")];
        state.add_routee(a.clone());
        state.add_routee(a.clone());
        state.add_routee(b.clone());
        assert_eq!(state.routees(), vec![a.clone(), b.clone()]);
        state.remove_routee(&a);
        assert_eq!(state.routees(), vec![b]);
    }
}
