//! `fleet-sim` — the delivery engine for the fleet workspace.
//!
//! # Outer loop
//!
//! ```text
//! start:  advance to opening time, load every truck from the full manifest
//! loop until clock.is_over():
//!   ① Deliver  — each truck, in fleet order, drives to its nearest pending
//!                destination (fresh shortest paths per stop) until empty
//!   ② Reload   — the truck nearest the hub returns and is refilled
//!   ③ Wait     — nothing loadable yet: jump to the next delayed arrival
//!   otherwise  — Stalled, stop
//! finish: append Finished, build SimReport
//! ```
//!
//! Every state change lands in the [`SimClock`](fleet_core::SimClock) event
//! log and is forwarded to the [`SimObserver`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_dispatch::ConstraintSet;
//! use fleet_sim::{FleetConfig, NoopObserver, SimBuilder};
//! use fleet_spatial::DijkstraRouter;
//!
//! let mut sim = SimBuilder::new(FleetConfig::default(), graph, packages, ConstraintSet::wgups(), DijkstraRouter)
//!     .build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use config::FleetConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, SimReport};
