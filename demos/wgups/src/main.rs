//! wgups — one delivery day for a two-truck parcel fleet.
//!
//! Simulates 40 packages over a 12-location distance table around Salt Lake
//! City with the reference rule set: four packages delayed until 09:05, four
//! pinned to truck 2, a six-package group that must ride together, and a
//! wrong address fixed at 10:30.
//!
//! ```text
//! wgups --start "8:00 AM" --end 17:00
//! wgups --packages my_packages.csv --distances my_distances.csv
//! RUST_LOG=fleet_sim=debug wgups
//! ```

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use fleet_core::{PackageTable, SimClock, SimEvent, TimeOfDay};
use fleet_dispatch::{load_packages_csv, load_packages_reader, ConstraintSet};
use fleet_sim::{FleetConfig, SimBuilder, SimObserver, SimReport};
use fleet_spatial::{load_distance_matrix_csv, load_distance_matrix_reader, DijkstraRouter, Graph};

// ── Embedded data ─────────────────────────────────────────────────────────────

const PACKAGES_CSV:  &str = include_str!("../data/packages.csv");
const DISTANCES_CSV: &str = include_str!("../data/distances.csv");

// ── Command line ──────────────────────────────────────────────────────────────

const START_ARG_NAME:     &str = "start";
const END_ARG_NAME:       &str = "end";
const PACKAGES_ARG_NAME:  &str = "packages";
const DISTANCES_ARG_NAME: &str = "distances";

fn cli() -> Command {
    Command::new("wgups")
        .about("Simulates one delivery day for a small parcel fleet")
        .arg(
            Arg::new(START_ARG_NAME)
                .help("Simulation start time (HH:MM or H:MM AM/PM)")
                .long(START_ARG_NAME)
                .default_value("08:00"),
        )
        .arg(
            Arg::new(END_ARG_NAME)
                .help("Simulation end time (HH:MM or H:MM AM/PM)")
                .long(END_ARG_NAME)
                .default_value("17:00"),
        )
        .arg(
            Arg::new(PACKAGES_ARG_NAME)
                .help("Package manifest CSV (defaults to the embedded data set)")
                .long(PACKAGES_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::new(DISTANCES_ARG_NAME)
                .help("Distance matrix CSV (defaults to the embedded data set)")
                .long(DISTANCES_ARG_NAME)
                .required(false),
        )
}

fn time_arg(matches: &ArgMatches, name: &str) -> Result<TimeOfDay> {
    let raw = matches.get_one::<String>(name).map(String::as_str).unwrap_or_default();
    TimeOfDay::parse(raw).with_context(|| format!("invalid --{name} value {raw:?}"))
}

// ── Observer: print the event log as it happens ───────────────────────────────

struct EventPrinter {
    iterations: usize,
}

impl SimObserver for EventPrinter {
    fn on_event(&mut self, event: &SimEvent) {
        println!("{event}");
    }

    fn on_iteration_end(&mut self, iteration: usize, _clock: &SimClock) {
        self.iterations = iteration + 1;
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn load_inputs(matches: &ArgMatches) -> Result<(Graph, PackageTable)> {
    let graph = match matches.get_one::<String>(DISTANCES_ARG_NAME) {
        Some(path) => load_distance_matrix_csv(Path::new(path))
            .with_context(|| format!("loading distances from {path}"))?,
        None => load_distance_matrix_reader(DISTANCES_CSV.as_bytes())?,
    };
    let packages = match matches.get_one::<String>(PACKAGES_ARG_NAME) {
        Some(path) => load_packages_csv(Path::new(path))
            .with_context(|| format!("loading packages from {path}"))?,
        None => load_packages_reader(PACKAGES_CSV.as_bytes())?,
    };
    Ok((graph, packages))
}

fn simulate<O: SimObserver>(
    graph:    Graph,
    packages: PackageTable,
    start:    TimeOfDay,
    end:      TimeOfDay,
    observer: &mut O,
) -> Result<SimReport> {
    let mut sim = SimBuilder::new(FleetConfig::default(), graph, packages, ConstraintSet::wgups(), DijkstraRouter)
        .window(start, end)
        .build()?;
    Ok(sim.run(observer)?)
}

fn print_packages(report: &SimReport) {
    println!(
        "{:<4} {:<34} {:<12} {:<9} {:<9} {:<9}",
        "ID", "Address", "Status", "Deadline", "Loaded", "Delivered"
    );
    println!("{}", "-".repeat(82));
    for p in &report.packages {
        let loaded = p.loaded_at().map(|t| t.to_string()).unwrap_or_else(|| "-".into());
        let delivered = p.delivered_at().map(|t| t.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "{:<4} {:<34} {:<12} {:<9} {:<9} {:<9}",
            p.id.0,
            p.address,
            p.status().as_str(),
            p.deadline.to_string(),
            loaded,
            delivered,
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let start = time_arg(&matches, START_ARG_NAME)?;
    let end = time_arg(&matches, END_ARG_NAME)?;

    // 1. Inputs.
    let (graph, packages) = load_inputs(&matches)?;
    println!("=== wgups — parcel fleet delivery ===");
    println!(
        "Locations: {}  |  Routes: {}  |  Packages: {}  |  Window: {start} – {end}",
        graph.node_count(),
        graph.edge_count(),
        packages.len()
    );
    println!();

    // 2. Run.
    let mut printer = EventPrinter { iterations: 0 };
    let t0 = Instant::now();
    let report = simulate(graph, packages, start, end, &mut printer)?;
    let elapsed = t0.elapsed();

    // 3. Summary.
    println!();
    println!(
        "Delivered {}/{} packages, {:.1} miles, finished at {} ({} iterations, {:.3} ms)",
        report.delivered,
        report.total,
        report.mileage,
        report.finished_at,
        printer.iterations,
        elapsed.as_secs_f64() * 1e3,
    );
    let late: Vec<String> = report.late().map(|p| p.id.0.to_string()).collect();
    if !late.is_empty() {
        println!("Late: {}", late.join(", "));
    }
    println!();

    // 4. Final package table.
    print_packages(&report);

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use fleet_core::{EventKind, PackageId, PackageStatus, TruckId};
    use fleet_sim::NoopObserver;

    use super::*;

    fn reference_day() -> SimReport {
        let graph = load_distance_matrix_reader(DISTANCES_CSV.as_bytes()).unwrap();
        let packages = load_packages_reader(PACKAGES_CSV.as_bytes()).unwrap();
        simulate(graph, packages, TimeOfDay::from_hm(8, 0), TimeOfDay::END_OF_DAY, &mut NoopObserver).unwrap()
    }

    fn delivering_truck(report: &SimReport, id: u32) -> TruckId {
        report
            .events
            .iter()
            .find_map(|e| match e.kind {
                EventKind::Delivered { truck, package, .. } if package == PackageId(id) => Some(truck),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn embedded_data_loads() {
        let graph = load_distance_matrix_reader(DISTANCES_CSV.as_bytes()).unwrap();
        let packages = load_packages_reader(PACKAGES_CSV.as_bytes()).unwrap();
        assert_eq!(graph.node_count(), 12);
        assert_eq!(graph.edge_count(), 66);
        assert_eq!(packages.len(), 40);
        assert!(graph.by_address("HUB").is_some());
        assert!(graph.by_address("410 South State St").is_some());
    }

    #[test]
    fn reference_day_delivers_everything() {
        let report = reference_day();
        assert!(report.all_delivered());
        assert!(report.finished_at < TimeOfDay::END_OF_DAY);
        assert!(report.packages.iter().all(|p| p.status() == PackageStatus::Delivered));
    }

    #[test]
    fn reference_rules_hold() {
        let report = reference_day();

        for id in [3, 18, 36, 38] {
            assert_eq!(delivering_truck(&report, id), TruckId(2), "package {id}");
        }

        let group_truck = delivering_truck(&report, 13);
        for id in [14, 15, 16, 19, 20] {
            assert_eq!(delivering_truck(&report, id), group_truck, "package {id}");
        }

        let nine_oh_five = TimeOfDay::from_hm(9, 5);
        for id in [6, 25, 28, 32] {
            let p = report.packages.iter().find(|p| p.id == PackageId(id)).unwrap();
            assert!(p.loaded_at().unwrap() >= nine_oh_five, "package {id}");
        }

        let corrections = report
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::AddressCorrected { .. }))
            .count();
        assert_eq!(corrections, 1);
        let p9 = report.packages.iter().find(|p| p.id == PackageId(9)).unwrap();
        assert_eq!(p9.address, "410 South State St");
        assert_eq!(p9.zip, "84111");
    }

    #[test]
    fn cli_defaults() {
        let matches = cli().try_get_matches_from(["wgups"]).unwrap();
        assert_eq!(time_arg(&matches, START_ARG_NAME).unwrap(), TimeOfDay::from_hm(8, 0));
        assert_eq!(time_arg(&matches, END_ARG_NAME).unwrap(), TimeOfDay::END_OF_DAY);
        assert!(matches.get_one::<String>(PACKAGES_ARG_NAME).is_none());
    }

    #[test]
    fn cli_accepts_twelve_hour_times() {
        let matches = cli()
            .try_get_matches_from(["wgups", "--start", "8:30 AM", "--end", "1:15 PM"])
            .unwrap();
        assert_eq!(time_arg(&matches, START_ARG_NAME).unwrap(), TimeOfDay::from_hm(8, 30));
        assert_eq!(time_arg(&matches, END_ARG_NAME).unwrap(), TimeOfDay::from_hm(13, 15));
    }

    #[test]
    fn cli_rejects_bad_times() {
        let matches = cli().try_get_matches_from(["wgups", "--start", "breakfast"]).unwrap();
        assert!(time_arg(&matches, START_ARG_NAME).is_err());
    }
}
