use super::state::{BroadcastState, RandomState, RoundRobinState, RouterState};
use crate::addr::Addr;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingStrategy {
    RoundRobin,
    Random,
    Broadcast,
}

impl RoutingStrategy {
    pub fn create_state(self) -> Arc<dyn RouterState> {
        match self {
            Self::RoundRobin => Arc::new(RoundRobinState::default()),
            Self::Random => Arc::new(RandomState::default()),
            Self::Broadcast => Arc::new(BroadcastState::default()),
        }
    }
}

/// Where routees come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterKind {
    /// The router actor spawns `size` routees from the props it is spawned with.
    Pool { size: usize },
    /// Routees already exist and are owned by someone else.
    Group { routees: Vec<Addr> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterConfig {
    pub strategy: RoutingStrategy,
    pub kind: RouterKind,
}

impl RouterConfig {
    pub fn pool(strategy: RoutingStrategy, size: usize) -> Self {
        Self {
            strategy,
            kind: RouterKind::Pool { size },
        }
    }
    pub fn group(strategy: RoutingStrategy, routees: Vec<Addr>) -> Self {
        Self {
            strategy,
            kind: RouterKind::Group { routees },
        }
    }
    pub fn round_robin_pool(size: usize) -> Self {
        Self::pool(RoutingStrategy::RoundRobin, size)
    }
    pub fn random_pool(size: usize) -> Self {
        Self::pool(RoutingStrategy::Random, size)
    }
    pub fn broadcast_pool(size: usize) -> Self {
        Self::pool(RoutingStrategy::Broadcast, size)
    }
    pub fn round_robin_group(routees: Vec<Addr>) -> Self {
        Self::group(RoutingStrategy::RoundRobin, routees)
    }
    pub fn random_group(routees: Vec<Addr>) -> Self {
        Self::group(RoutingStrategy::Random, routees)
    }
    pub fn broadcast_group(routees: Vec<Addr>) -> Self {
        Self::group(RoutingStrategy::Broadcast, routees)
    }

    pub fn is_pool(&self) -> bool {
        matches!(self.kind, RouterKind::Pool { .. })
    }

    pub fn create_router_state(&self) -> Arc<dyn RouterState> {
        self.strategy.create_state()
    }
}
