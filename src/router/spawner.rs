use super::{actor::RouterActor, config::RouterConfig, process::RouterProcess};
use crate::{
    addr::Addr,
    error::SpawnError,
    props::Props,
    spawner::{spawn_actor, Spawner},
    system::ActorSystem,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Spawns routers. Attach to props with [Props::with_spawner]; the props
/// themselves then describe the pool routees.
///
/// ```ignore
/// let props = Props::from_producer(|| Worker).with_spawner(RouterSpawner::spawner(
///     RouterConfig::round_robin_pool(3),
/// ));
/// let workers = system.spawn_named(props, "workers").await?;
/// ```
pub struct RouterSpawner {
    config: RouterConfig,
}

impl RouterSpawner {
    pub fn spawner(config: RouterConfig) -> Arc<dyn Spawner> {
        Arc::new(Self { config })
    }
}

#[async_trait]
impl Spawner for RouterSpawner {
    /// Registers the façade, starts the router actor and only returns once
    /// the router actor has finished starting, so nothing sent through the
    /// returned address can overtake its initialization.
    async fn spawn(
        &self,
        system: &ActorSystem,
        id: &str,
        props: Props,
        parent: Option<Addr>,
    ) -> Result<Addr, SpawnError> {
        let state = self.config.create_router_state();
        let facade = Arc::new(RouterProcess::new(system.clone(), state.clone()));
        let (addr, added) = system.registry().add(facade.clone(), id);
        if !added {
            return Err(SpawnError::NameExists { id: id.to_owned() });
        }

        let (started_tx, started_rx) = oneshot::channel();
        let started_tx = Arc::new(Mutex::new(Some(started_tx)));
        let config = self.config.clone();
        let routee_props = props.without_spawner();
        let router_props = Props::from_producer(move || {
            RouterActor::new(
                config.clone(),
                routee_props.clone(),
                state.clone(),
                started_tx.lock().take(),
            )
        });

        let router_id = format!("{id}/router");
        let router = match spawn_actor(system, &router_id, router_props, parent.clone()) {
            Ok(router) => router,
            Err(err) => {
                system.registry().remove(&addr);
                return Err(SpawnError::RouterStartFailed {
                    id: id.to_owned(),
                    reason: err.to_string(),
                });
            }
        };

        if started_rx.await.is_err() {
            warn!(router = %addr, "router actor failed to start");
            router.stop(system);
            system.registry().remove(&addr);
            return Err(SpawnError::RouterStartFailed {
                id: id.to_owned(),
                reason: "router actor failed during startup".to_owned(),
            });
        }

        facade.set_router(router);
        if let Some(parent) = parent {
            facade.set_parent(parent);
        }
        debug!(router = %addr, strategy = ?self.config.strategy, "router spawned");
        Ok(addr)
    }
}
