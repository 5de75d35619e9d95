//! Greedy multi-tier truck loader.
//!
//! # Pass structure
//!
//! ```text
//! backlog ─┬─ en route / delivered ───────────────▶ dropped (never re-selected)
//!          ├─ delayed, not yet available ─────────▶ status Delayed, held
//!          ├─ grouped ────────────────────────────▶ group
//!          └─ everything else ── stable sort by deadline ──▶ remainder
//!
//! for truck in trucks (given order):
//!   ① forced:    remainder packages pinned to this truck, up to capacity
//!   ② grouped:   the complete group, only if it all fits
//!   ③ remainder: earliest deadline first, skipping packages pinned to a
//!                different truck that is part of this pass
//! ```
//!
//! Whatever is not loaded comes back as the new backlog, in the order it was
//! given.  The caller retries it after the next hub reload.
//!
//! # Group completeness
//!
//! The group only ships when every member still at the hub is present in the
//! backlog and available.  A member held back by a delay keeps the whole
//! group at the hub.  A group larger than any truck's free capacity is
//! deferred on every pass.

use std::collections::BTreeSet;

use tracing::debug;

use fleet_core::{PackageId, PackageTable, TimeOfDay, Truck, TruckId};

use crate::{ConstraintSet, DispatchError, DispatchResult};

/// Result of one loader pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Packages still waiting at the hub.
    pub backlog: Vec<PackageId>,
    /// `(truck, package)` in loading order.
    pub loaded:  Vec<(TruckId, PackageId)>,
}

impl LoadOutcome {
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// Load `backlog` onto `trucks` at time `now`.
///
/// Package statuses are updated in `packages` (`EnRoute` plus a loading
/// timestamp for loaded packages, `Delayed`/`AtHub` for held ones).  Fails
/// only if the backlog names a package missing from `packages`.
pub fn load_trucks(
    trucks:      &mut [Truck],
    backlog:     Vec<PackageId>,
    packages:    &mut PackageTable,
    constraints: &ConstraintSet,
    now:         TimeOfDay,
) -> DispatchResult<LoadOutcome> {
    // ── Partition ─────────────────────────────────────────────────────────
    let mut seen = BTreeSet::new();
    let mut eligible: Vec<PackageId> = Vec::with_capacity(backlog.len());
    let mut group: Vec<PackageId> = Vec::new();
    let mut remainder: Vec<(TimeOfDay, PackageId)> = Vec::new();
    let mut held = 0usize;

    for id in backlog {
        if !seen.insert(id) {
            continue;
        }
        let pkg = packages.get_mut(id).ok_or(DispatchError::UnknownPackage(id))?;
        if !pkg.status().is_at_hub() {
            continue;
        }
        eligible.push(id);

        // Availability is re-evaluated on every pass.
        match constraints.available_at(id) {
            Some(at) if at > now => {
                pkg.mark_delayed()?;
                held += 1;
                continue;
            }
            _ => pkg.mark_available()?,
        }

        if constraints.is_grouped(id) {
            group.push(id);
        } else {
            remainder.push((pkg.deadline, id));
        }
    }

    // Stable: equal deadlines keep backlog order.
    remainder.sort_by_key(|&(deadline, _)| deadline);

    let outstanding_members = constraints
        .grouped
        .iter()
        .filter(|&&id| packages.get(id).is_some_and(|p| p.status().is_at_hub()))
        .count();
    let mut group_pending = !group.is_empty() && group.len() == outstanding_members;

    // ── Fill trucks ───────────────────────────────────────────────────────
    let in_pass: Vec<TruckId> = trucks.iter().map(|t| t.id).collect();
    let reserved_elsewhere = |id: PackageId, truck: TruckId| {
        constraints
            .forced_truck_of(id)
            .is_some_and(|pinned| pinned != truck && in_pass.contains(&pinned))
    };

    let mut taken = vec![false; remainder.len()];
    let mut loaded = Vec::new();

    for truck in trucks.iter_mut() {
        // ① forced
        for (i, &(_, id)) in remainder.iter().enumerate() {
            if truck.remaining_capacity() == 0 {
                break;
            }
            if !taken[i] && constraints.forced_truck_of(id) == Some(truck.id) {
                load_one(truck, id, packages, now, &mut loaded)?;
                taken[i] = true;
            }
        }

        // ② grouped, all or nothing
        if group_pending && group.len() <= truck.remaining_capacity() {
            for &id in &group {
                load_one(truck, id, packages, now, &mut loaded)?;
            }
            group_pending = false;
        }

        // ③ remainder by deadline
        for (i, &(_, id)) in remainder.iter().enumerate() {
            if truck.remaining_capacity() == 0 {
                break;
            }
            if !taken[i] && !reserved_elsewhere(id, truck.id) {
                load_one(truck, id, packages, now, &mut loaded)?;
                taken[i] = true;
            }
        }
    }

    let backlog: Vec<PackageId> = eligible
        .into_iter()
        .filter(|&id| packages.get(id).is_some_and(|p| p.status().is_at_hub()))
        .collect();

    debug!(
        trucks = in_pass.len(),
        loaded = loaded.len(),
        held,
        left = backlog.len(),
        %now,
        "loader pass complete"
    );

    Ok(LoadOutcome { backlog, loaded })
}

/// Put `id` on `truck` and mark it en route.  Neither side changes unless
/// both do.
pub(crate) fn load_one(
    truck:    &mut Truck,
    id:       PackageId,
    packages: &mut PackageTable,
    now:      TimeOfDay,
    loaded:   &mut Vec<(TruckId, PackageId)>,
) -> DispatchResult<()> {
    let pkg = packages.get_mut(id).ok_or(DispatchError::UnknownPackage(id))?;
    if !truck.load(id) {
        return Err(DispatchError::TruckFull { truck: truck.id, package: id });
    }
    if let Err(e) = pkg.mark_loaded(now) {
        truck.unload(id);
        return Err(e.into());
    }
    loaded.push((truck.id, id));
    Ok(())
}
