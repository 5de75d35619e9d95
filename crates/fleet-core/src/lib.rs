//! `fleet-core` — foundational types for the fleet delivery simulation.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `PackageId`, `TruckId`, `NodeId`                          |
//! | [`time`]      | `TimeOfDay`, `SimClock`, `travel_secs`                    |
//! | [`event`]     | `SimEvent`, `EventKind`                                   |
//! | [`package`]   | `Package`, `PackageStatus`, `PackageTable`                |
//! | [`truck`]     | `Truck`                                                   |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod event;
pub mod ids;
pub mod package;
pub mod time;
pub mod truck;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use event::{EventKind, SimEvent};
pub use ids::{NodeId, PackageId, TruckId};
pub use package::{Package, PackageStatus, PackageTable};
pub use time::{travel_secs, SimClock, TimeOfDay};
pub use truck::Truck;
