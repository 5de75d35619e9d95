//! Fluent builder for constructing a [`Sim`].

use fleet_core::{PackageTable, SimClock, TimeOfDay, Truck, TruckId};
use fleet_dispatch::{ConstraintSet, DispatchError};
use fleet_spatial::{normalize_address, Graph, Router};

use crate::{FleetConfig, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Required inputs
///
/// - [`FleetConfig`]: truck count, speed, capacity, hub address, opening time
/// - [`Graph`]: the distance graph, e.g. from
///   [`fleet_spatial::load_distance_matrix_csv`]
/// - [`PackageTable`]: the day's manifest
/// - [`ConstraintSet`]: loading rules (`ConstraintSet::new()` for none)
/// - `R: Router`: the routing algorithm (e.g. [`fleet_spatial::DijkstraRouter`])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                      |
/// |----------------------|----------------------------------------------|
/// | `.window(start, end)`| `config.opening_time` .. `TimeOfDay::END_OF_DAY` |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph, packages, ConstraintSet::wgups(), DijkstraRouter)
///     .window(TimeOfDay::from_hm(8, 0), TimeOfDay::from_hm(17, 0))
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router> {
    config:      FleetConfig,
    graph:       Graph,
    packages:    PackageTable,
    constraints: ConstraintSet,
    router:      R,
    window:      Option<(TimeOfDay, TimeOfDay)>,
}

impl<R: Router> SimBuilder<R> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:      FleetConfig,
        graph:       Graph,
        packages:    PackageTable,
        constraints: ConstraintSet,
        router:      R,
    ) -> Self {
        Self { config, graph, packages, constraints, router, window: None }
    }

    /// Simulate from `start` until at most `end`.
    pub fn window(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.window = Some((start, end));
        self
    }

    /// Validate inputs, place the fleet at the hub, and return a
    /// ready-to-run [`Sim`].
    ///
    /// Package and correction addresses are normalised and must all resolve
    /// to graph nodes, so the engine never meets an address it can't route.
    pub fn build(self) -> SimResult<Sim<R>> {
        let Self { config, graph, mut packages, mut constraints, router, window } = self;
        let (start, end) = window.unwrap_or((config.opening_time, TimeOfDay::END_OF_DAY));

        // ── Validate ──────────────────────────────────────────────────────
        if config.truck_count == 0 {
            return Err(SimError::EmptyFleet);
        }
        if start >= end {
            return Err(SimError::InvalidWindow { start, end });
        }

        let hub_address = normalize_address(&config.hub_address);
        let hub = graph.by_address(&hub_address).ok_or(SimError::NoHub(hub_address))?;

        let ids: Vec<_> = packages.ids().collect();
        for id in ids {
            let Some(pkg) = packages.get_mut(id) else { continue };
            pkg.address = normalize_address(&pkg.address);
            if graph.by_address(&pkg.address).is_none() {
                return Err(SimError::UnknownAddress { package: id, address: pkg.address.clone() });
            }
        }

        for fix in &mut constraints.address_change {
            if !packages.contains(fix.package) {
                return Err(DispatchError::UnknownPackage(fix.package).into());
            }
            fix.address = normalize_address(&fix.address);
            if graph.by_address(&fix.address).is_none() {
                return Err(SimError::UnknownAddress { package: fix.package, address: fix.address.clone() });
            }
        }

        // ── Fleet at the hub ──────────────────────────────────────────────
        let trucks = (1..=config.truck_count)
            .map(|i| {
                Truck::new(TruckId(i), hub, start)
                    .with_speed(config.speed_mph)
                    .with_capacity(config.capacity)
            })
            .collect();

        let clock = SimClock::new(start, end, packages.len());
        let corrected = vec![false; constraints.address_change.len()];

        Ok(Sim {
            config,
            clock,
            graph,
            packages,
            trucks,
            constraints,
            router,
            hub,
            backlog: Vec::new(),
            corrected,
            started: false,
            finished: false,
        })
    }
}
