//! Routers: one address in front of many routees
//!
//! A router is two processes. The façade ([RouterProcess]) is what callers
//! address; it routes ordinary messages itself using the shared
//! [RouterState]. The router actor (`<id>/router`) owns the routees and
//! handles the management messages in [messages].

mod actor;
mod config;
pub mod messages;
mod process;
mod spawner;
mod state;

pub use config::{RouterConfig, RouterKind, RoutingStrategy};
pub use messages::{AddRoutee, BroadcastMessage, GetRoutees, RemoveRoutee, Routees};
pub use process::RouterProcess;
pub use spawner::RouterSpawner;
pub use state::{BroadcastState, RandomState, RoundRobinState, RouterState};
