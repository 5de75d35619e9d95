//! The `Sim` struct and its delivery loop.

use tracing::{debug, info, warn};

use fleet_core::{
    EventKind, NodeId, Package, PackageId, PackageStatus, PackageTable, SimClock, SimEvent,
    TimeOfDay, Truck,
};
use fleet_dispatch::{load_trucks, ConstraintSet, DispatchError};
use fleet_spatial::{Graph, Reach, Router};

use crate::{FleetConfig, SimObserver, SimResult};

// ── SimReport ─────────────────────────────────────────────────────────────────

/// Outcome of [`Sim::run`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimReport {
    pub delivered:   usize,
    /// Packages in the manifest.
    pub total:       usize,
    pub mileage:     f64,
    /// Clock time when the run stopped.
    pub finished_at: TimeOfDay,
    /// Final package states, ascending by id.
    pub packages:    Vec<Package>,
    pub events:      Vec<SimEvent>,
}

impl SimReport {
    pub fn all_delivered(&self) -> bool {
        self.delivered == self.total
    }

    /// Delivered packages that arrived after their deadline.
    pub fn late(&self) -> impl Iterator<Item = &Package> + '_ {
        self.packages.iter().filter(|p| p.on_time() == Some(false))
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The delivery engine.
///
/// `Sim<R>` owns the whole day's state and drives the outer loop:
///
/// 1. **Deliver**: each truck in fleet order delivers its contents,
///    nearest destination first (ties by package id), until it is empty,
///    only unreachable packages remain, or the clock refuses to advance.
/// 2. **Reload**: if packages remain at the hub, the truck closest to the
///    hub drives back and is refilled by [`load_trucks`].
/// 3. **Wait**: if that load comes up empty because every remaining package
///    is delayed, the clock jumps to the next availability time.
///
/// The loop ends once [`SimClock::is_over`] reports true, or when an
/// iteration makes no progress at all (logged as `Stalled`).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router> {
    pub config: FleetConfig,

    /// Global clock plus the event log.
    pub clock: SimClock,

    /// Read-only during the run.
    pub graph: Graph,

    pub packages: PackageTable,

    /// Fleet in dispatch order.
    pub trucks: Vec<Truck>,

    pub constraints: ConstraintSet,

    pub(crate) router:    R,
    pub(crate) hub:       NodeId,
    /// Packages not yet loaded, in manifest order.
    pub(crate) backlog:   Vec<PackageId>,
    /// One flag per `constraints.address_change` entry.
    pub(crate) corrected: Vec<bool>,
    pub(crate) started:   bool,
    pub(crate) finished:  bool,
}

impl<R: Router> Sim<R> {
    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn hub(&self) -> NodeId {
        self.hub
    }

    /// Packages still waiting at the hub.
    pub fn backlog(&self) -> &[PackageId] {
        &self.backlog
    }

    /// Run the day to completion and return the report.
    ///
    /// Calling `run` again after it has finished returns the same report
    /// without simulating anything.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SimReport> {
        if !self.finished {
            self.start(observer)?;

            let mut iteration = 0;
            while !self.clock.is_over() {
                let progressed = self.step(observer)?;
                observer.on_iteration_end(iteration, &self.clock);
                iteration += 1;
                if !progressed {
                    break;
                }
            }

            let (delivered, mileage) = (self.clock.delivered(), self.clock.mileage());
            info!(
                delivered,
                total = self.clock.target(),
                mileage,
                at = %self.clock.now(),
                iterations = iteration,
                "simulation finished"
            );
            self.log(EventKind::Finished { delivered, mileage }, observer);
            self.finished = true;
        }

        let report = self.report();
        observer.on_sim_end(&report);
        Ok(report)
    }

    /// Snapshot of the current state.
    pub fn report(&self) -> SimReport {
        SimReport {
            delivered:   self.clock.delivered(),
            total:       self.clock.target(),
            mileage:     self.clock.mileage(),
            finished_at: self.clock.now(),
            packages:    self.packages.iter().cloned().collect(),
            events:      self.clock.events().to_vec(),
        }
    }

    // ── Start of day ──────────────────────────────────────────────────────

    fn start<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let opening = self.config.opening_time;
        if self.clock.now() < opening {
            if !self.clock.advance_to(opening) {
                warn!(%opening, end = %self.clock.end(), "window closes before the hub opens");
                return Ok(());
            }
            self.log(EventKind::HubOpened, observer);
        }

        let now = self.clock.now();
        for truck in &mut self.trucks {
            truck.clock = now;
        }

        let backlog = self.packages.ids().collect();
        let outcome = load_trucks(&mut self.trucks, backlog, &mut self.packages, &self.constraints, now)?;
        self.backlog = outcome.backlog;

        info!(loaded = outcome.loaded.len(), left_at_hub = self.backlog.len(), %now, "initial load");
        let kind = EventKind::TrucksLoaded { loaded: outcome.loaded.len(), left_at_hub: self.backlog.len() };
        self.log(kind, observer);
        for i in 0..self.trucks.len() {
            let truck = &self.trucks[i];
            let kind = EventKind::TruckContents { truck: truck.id, packages: truck.contents().to_vec() };
            self.log(kind, observer);
        }
        let kind = EventKind::BacklogListed { packages: self.backlog.clone() };
        self.log(kind, observer);
        Ok(())
    }

    // ── Outer iteration ───────────────────────────────────────────────────

    /// One delivery sweep plus at most one reload.  Returns `false` when the
    /// run can't go any further.
    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let mut delivered = 0;
        for idx in 0..self.trucks.len() {
            delivered += self.deliver_contents(idx, observer)?;
        }
        if self.clock.is_over() {
            return Ok(true);
        }

        let reloaded = !self.backlog.is_empty() && self.reload(observer)?;
        if delivered > 0 || reloaded {
            return Ok(true);
        }
        if !self.clock.is_over() {
            let undeliverable = self.clock.target().saturating_sub(self.clock.delivered());
            warn!(undeliverable, at_hub = self.backlog.len(), at = %self.clock.now(), "no further progress possible");
            self.log(EventKind::Stalled { backlog: undeliverable }, observer);
        }
        Ok(false)
    }

    // ── Delivery ──────────────────────────────────────────────────────────

    /// Deliver truck `idx`'s packages, nearest first.  Returns the number
    /// delivered.
    fn deliver_contents<O: SimObserver>(&mut self, idx: usize, observer: &mut O) -> SimResult<usize> {
        let mut delivered = 0;

        while !self.clock.is_over() && !self.trucks[idx].is_empty() {
            let Some((package, dest, miles)) = self.nearest_delivery(idx) else {
                let truck = &self.trucks[idx];
                warn!(truck = %truck.id, remaining = truck.contents().len(), "remaining packages unreachable");
                let kind = EventKind::Unreachable { truck: truck.id, packages: truck.contents().to_vec() };
                self.log(kind, observer);
                break;
            };

            let secs = self.trucks[idx].travel_secs(miles);
            if !self.clock.advance(secs) {
                info!(truck = %self.trucks[idx].id, %package, "next delivery would pass the end of the window");
                break;
            }
            let now = self.clock.now();

            let truck = &mut self.trucks[idx];
            truck.location = dest;
            truck.clock = now;
            truck.unload(package);
            let truck_id = truck.id;

            let pkg = self.packages.get_mut(package).ok_or(DispatchError::UnknownPackage(package))?;
            pkg.mark_delivered(now)?;
            let address = pkg.address.clone();

            self.clock.record_delivery();
            self.clock.add_mileage(miles);
            self.log(EventKind::Delivered { truck: truck_id, package, address, miles }, observer);
            self.apply_corrections(observer);
            delivered += 1;
        }

        Ok(delivered)
    }

    /// The reachable package on truck `idx` with the shortest distance from
    /// the truck's location, as `(package, destination, miles)`.
    fn nearest_delivery(&self, idx: usize) -> Option<(PackageId, NodeId, f64)> {
        let truck = &self.trucks[idx];
        let paths = self.router.shortest_paths(&self.graph, truck.location);

        let mut best: Option<(PackageId, NodeId, f64)> = None;
        for &id in truck.contents() {
            let Some(dest) = self.packages.get(id).and_then(|p| self.graph.by_address(&p.address)) else {
                continue;
            };
            let Reach::Reachable(miles) = paths.get(dest) else { continue };
            let closer = best.is_none_or(|(best_id, _, best_miles)| {
                miles.total_cmp(&best_miles).then(id.cmp(&best_id)).is_lt()
            });
            if closer {
                best = Some((id, dest, miles));
            }
        }

        if let Some((id, _, miles)) = best {
            debug!(truck = %truck.id, package = %id, miles, "next stop");
        }
        best
    }

    /// Apply every pending address correction whose trigger time has been
    /// reached.  Each one fires at most once.
    fn apply_corrections<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.now();
        for i in 0..self.constraints.address_change.len() {
            let fix = &self.constraints.address_change[i];
            if self.corrected[i] || now < fix.trigger {
                continue;
            }
            self.corrected[i] = true;

            let Some(pkg) = self.packages.get_mut(fix.package) else { continue };
            pkg.correct_address(&fix.address, &fix.city, &fix.zip);
            info!(package = %fix.package, address = %fix.address, "address corrected");
            let kind = EventKind::AddressCorrected {
                package: fix.package,
                address: fix.address.clone(),
                city:    fix.city.clone(),
                zip:     fix.zip.clone(),
            };
            self.log(kind, observer);
        }
    }

    // ── Reload ────────────────────────────────────────────────────────────

    /// Send the truck closest to the hub back and refill it.  Returns `true`
    /// if anything was loaded or the fleet waited for delayed packages.
    fn reload<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let Some((idx, miles)) = self.closest_to_hub() else {
            warn!(at_hub = self.backlog.len(), "no truck with free capacity can reach the hub");
            return Ok(false);
        };

        if miles > 0.0 {
            let secs = self.trucks[idx].travel_secs(miles);
            if !self.clock.advance(secs) {
                info!(truck = %self.trucks[idx].id, "return to hub would pass the end of the window");
                return Ok(false);
            }
            self.trucks[idx].location = self.hub;
            self.clock.add_mileage(miles);
            let kind = EventKind::ReturnedToHub { truck: self.trucks[idx].id, miles };
            self.log(kind, observer);
        }

        let now = self.clock.now();
        self.trucks[idx].clock = now;

        let backlog = std::mem::take(&mut self.backlog);
        let outcome = load_trucks(
            std::slice::from_mut(&mut self.trucks[idx]),
            backlog,
            &mut self.packages,
            &self.constraints,
            now,
        )?;
        self.backlog = outcome.backlog;

        let loaded = outcome.loaded.len();
        if loaded > 0 {
            let truck = self.trucks[idx].id;
            info!(%truck, loaded, left_at_hub = self.backlog.len(), %now, "reloaded");
            self.log(EventKind::Reloaded { truck, loaded }, observer);
            return Ok(true);
        }

        Ok(self.wait_for_delayed(observer))
    }

    /// Index and hub distance of the reload candidate: the truck with free
    /// capacity nearest the hub.  Later trucks win ties.
    fn closest_to_hub(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, truck) in self.trucks.iter().enumerate() {
            if truck.remaining_capacity() == 0 {
                continue;
            }
            let paths = self.router.shortest_paths(&self.graph, truck.location);
            let Some(miles) = paths.distance(self.hub) else { continue };
            if best.is_none_or(|(_, d)| miles <= d) {
                best = Some((i, miles));
            }
        }
        best
    }

    /// Jump the clock to the next delayed-package availability time if any
    /// package at the hub is still delayed.  `Waiting` is only logged once
    /// the clock has actually moved.
    fn wait_for_delayed<O: SimObserver>(&mut self, observer: &mut O) -> bool {
        let now = self.clock.now();
        let any_delayed = self
            .backlog
            .iter()
            .any(|&id| self.packages.get(id).is_some_and(|p| p.status() == PackageStatus::Delayed));
        let until = match self.constraints.next_availability_after(now) {
            Some(t) if any_delayed => t,
            _ => return false,
        };

        if !self.clock.advance_to(until) {
            info!(%until, end = %self.clock.end(), "delayed packages arrive after the window closes");
            return false;
        }
        info!(%until, "waited at hub for delayed packages");
        self.log(EventKind::Waiting { until }, observer);
        true
    }

    fn log<O: SimObserver>(&mut self, kind: EventKind, observer: &mut O) {
        observer.on_event(self.clock.log(kind));
    }
}
