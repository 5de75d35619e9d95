//! Special-case rules applied while loading and delivering.

use std::collections::{BTreeMap, BTreeSet};

use fleet_core::{PackageId, TimeOfDay, TruckId};

/// A destination fix that becomes known mid-run.
///
/// Applied once, by the delivery engine, on the first delivery whose
/// resulting clock time is at or after `trigger`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressCorrection {
    pub package: PackageId,
    pub trigger: TimeOfDay,
    pub address: String,
    pub city:    String,
    pub zip:     String,
}

/// The constraint tiers consulted by [`load_trucks`](crate::load_trucks).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintSet {
    /// Availability time → packages that are not at the hub before it.
    pub delayed:        BTreeMap<TimeOfDay, Vec<PackageId>>,
    /// Truck → packages that must ride it when it has room.
    pub forced_truck:   BTreeMap<TruckId, Vec<PackageId>>,
    /// Packages that travel on one truck together or not at all.
    pub grouped:        BTreeSet<PackageId>,
    pub address_change: Vec<AddressCorrection>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule set of the reference WGUPS day.
    pub fn wgups() -> Self {
        let ids = |v: &[u32]| v.iter().map(|&i| PackageId(i)).collect::<Vec<_>>();
        ConstraintSet::new()
            .delay(TimeOfDay::from_hm(9, 5), ids(&[6, 25, 28, 32]))
            .force(TruckId(2), ids(&[3, 18, 36, 38]))
            .group(ids(&[13, 14, 15, 16, 19, 20]))
            .correct(AddressCorrection {
                package: PackageId(9),
                trigger: TimeOfDay::from_hm(10, 30),
                address: "410 South State St".into(),
                city:    "Salt Lake City".into(),
                zip:     "84111".into(),
            })
    }

    // ── Builders ──────────────────────────────────────────────────────────

    pub fn delay(mut self, until: TimeOfDay, packages: impl IntoIterator<Item = PackageId>) -> Self {
        self.delayed.entry(until).or_default().extend(packages);
        self
    }

    pub fn force(mut self, truck: TruckId, packages: impl IntoIterator<Item = PackageId>) -> Self {
        self.forced_truck.entry(truck).or_default().extend(packages);
        self
    }

    pub fn group(mut self, packages: impl IntoIterator<Item = PackageId>) -> Self {
        self.grouped.extend(packages);
        self
    }

    pub fn correct(mut self, correction: AddressCorrection) -> Self {
        self.address_change.push(correction);
        self
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// When `package` reaches the hub, if it is delayed at all.  A package
    /// listed under several times is available at the latest of them.
    pub fn available_at(&self, package: PackageId) -> Option<TimeOfDay> {
        self.delayed
            .iter()
            .rev()
            .find(|(_, ids)| ids.contains(&package))
            .map(|(&at, _)| at)
    }

    /// The truck `package` is pinned to.  The first truck listing it wins.
    pub fn forced_truck_of(&self, package: PackageId) -> Option<TruckId> {
        self.forced_truck
            .iter()
            .find(|(_, ids)| ids.contains(&package))
            .map(|(&truck, _)| truck)
    }

    #[inline]
    pub fn is_grouped(&self, package: PackageId) -> bool {
        self.grouped.contains(&package)
    }

    /// Earliest availability time strictly after `now`.
    pub fn next_availability_after(&self, now: TimeOfDay) -> Option<TimeOfDay> {
        self.delayed.keys().copied().find(|&at| at > now)
    }
}
