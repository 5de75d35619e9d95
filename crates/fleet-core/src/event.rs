//! Typed simulation events.
//!
//! Every state change the delivery engine makes is recorded as a
//! [`SimEvent`] in the [`SimClock`](crate::SimClock) log, stamped with the
//! global time at which it happened.  `Display` renders the line printed by
//! the demo's event dump.

use std::fmt;

use crate::{PackageId, TimeOfDay, TruckId};

/// One timestamped log entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimEvent {
    pub at:   TimeOfDay,
    pub kind: EventKind,
}

/// What happened.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    // -- Hub --
    /// The clock was moved forward to opening time before any loading.
    HubOpened,
    TrucksLoaded {
        loaded:      usize,
        left_at_hub: usize,
    },
    TruckContents {
        truck:    TruckId,
        packages: Vec<PackageId>,
    },
    BacklogListed {
        packages: Vec<PackageId>,
    },

    // -- Delivery --
    Delivered {
        truck:   TruckId,
        package: PackageId,
        address: String,
        miles:   f64,
    },
    AddressCorrected {
        package: PackageId,
        address: String,
        city:    String,
        zip:     String,
    },
    /// None of the truck's remaining packages can be reached from where it is.
    Unreachable {
        truck:    TruckId,
        packages: Vec<PackageId>,
    },

    // -- Reload cycle --
    ReturnedToHub {
        truck: TruckId,
        miles: f64,
    },
    Reloaded {
        truck:  TruckId,
        loaded: usize,
    },
    /// Nothing could be loaded; the fleet idled until delayed packages
    /// arrived.  Stamped when the wait ends.
    Waiting {
        until: TimeOfDay,
    },
    /// No truck can deliver, load, or wait for anything: the run cannot
    /// progress further.
    Stalled {
        backlog: usize,
    },

    Finished {
        delivered: usize,
        mileage:   f64,
    },
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[PackageId]) -> fmt::Result {
    if ids.is_empty() {
        return f.write_str("(none)");
    }
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", id.0)?;
    }
    Ok(())
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::HubOpened => f.write_str("hub opened"),
            EventKind::TrucksLoaded { loaded, left_at_hub } => {
                write!(f, "trucks finished loading: loaded {loaded}, left {left_at_hub} at hub")
            }
            EventKind::TruckContents { truck, packages } => {
                write!(f, "{truck} contents: ")?;
                write_ids(f, packages)
            }
            EventKind::BacklogListed { packages } => {
                f.write_str("packages left at hub: ")?;
                write_ids(f, packages)
            }
            EventKind::Delivered { truck, package, address, miles } => {
                write!(f, "{truck} delivered {package} to {address} ({miles:.1} mi)")
            }
            EventKind::AddressCorrected { package, address, city, zip } => {
                write!(f, "{package} address updated to {address}, {city} {zip}")
            }
            EventKind::Unreachable { truck, packages } => {
                write!(f, "{truck} cannot reach remaining packages: ")?;
                write_ids(f, packages)
            }
            EventKind::ReturnedToHub { truck, miles } => {
                write!(f, "{truck} returned to the hub ({miles:.1} mi)")
            }
            EventKind::Reloaded { truck, loaded } => {
                write!(f, "{truck} reloaded {loaded} packages at the hub")
            }
            EventKind::Waiting { until } => {
                write!(f, "fleet waited at hub for delayed packages until {until}")
            }
            EventKind::Stalled { backlog } => {
                write!(f, "no further progress possible; {backlog} packages undeliverable")
            }
            EventKind::Finished { delivered, mileage } => {
                write!(f, "finished delivering {delivered} packages with a total mileage of {mileage:.1}")
            }
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.at, self.kind)
    }
}
