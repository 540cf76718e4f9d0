//! Name → process lookup shared by the whole actor system

use crate::{addr::Addr, process::Process};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

pub struct ProcessRegistry {
    address: String,
    processes: RwLock<HashMap<String, Arc<dyn Process>>>,
    sequence: AtomicU64,
}

impl ProcessRegistry {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            processes: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }
    pub fn address(&self) -> &str {
        &self.address
    }
    /// Unique, never reused id suffix.
    pub fn next_id(&self) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("${n}")
    }
    /// Inserts `process` under `id` unless the name is taken.
    ///
    /// Returns the address for `id` either way; the flag tells whether this
    /// call inserted it. A failed add leaves the registry untouched.
    pub fn add(&self, process: Arc<dyn Process>, id: &str) -> (Addr, bool) {
        let addr = Addr::new(self.address.as_str(), id);
        let mut processes = self.processes.write();
        if processes.contains_key(id) {
            return (addr, false);
        }
        processes.insert(id.to_owned(), process);
        (addr, true)
    }
    /// Idempotent.
    pub fn remove(&self, addr: &Addr) {
        self.processes.write().remove(addr.id());
    }
    pub fn get(&self, addr: &Addr) -> Option<Arc<dyn Process>> {
        if addr.address() != self.address {
            return None;
        }
        self.processes.read().get(addr.id()).cloned()
    }
    pub fn contains(&self, id: &str) -> bool {
        self.processes.read().contains_key(id)
    }
    pub fn len(&self) -> usize {
        self.processes.read().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_queue::{MessageEnvelope, SystemMessage};

    struct Sink;
    impl Process for Sink {
        fn send_user_message(&self, _addr: &Addr, _envelope: MessageEnvelope) {}
        fn send_system_message(&self, _addr: &Addr, _msg: SystemMessage) {}
    }

    #[test]
    fn add_rejects_taken_names() {
        let registry = ProcessRegistry::new("local");
        let (addr, added) = registry.add(Arc::new(Sink), "worker-1");
        assert!(added);
        assert_eq!(addr.id(), "worker-1");
        let (again, added) = registry.add(Arc::new(Sink), "worker-1");
        assert!(!added);
        assert_eq!(again, addr);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let registry = ProcessRegistry::new("local");
        let (addr, _) = registry.add(Arc::new(Sink), "a");
        registry.remove(&addr);
        registry.remove(&addr);
        assert!(registry.get(&addr).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn next_id_is_unique() {
        let registry = ProcessRegistry::new("local");
        let a = registry.next_id();
        let b = registry.next_id();
        assert_ne!(a, b);
        assert!(a.starts_with('$'));
    }

    #[test]
    fn foreign_addresses_do_not_resolve() {
        let registry = ProcessRegistry::new("local");
        registry.add(Arc::new(Sink), "a");
        assert!(registry.get(&Addr::new("remote", "a")).is_none());
    }
}
