//! Unit tests for fleet-dispatch.

use fleet_core::{NodeId, Package, PackageId, PackageTable, TimeOfDay, Truck, TruckId};

// ── Helpers ───────────────────────────────────────────────────────────────────

const EIGHT: TimeOfDay = TimeOfDay::from_hm(8, 0);

fn pkg(id: u32, deadline: TimeOfDay) -> Package {
    Package::new(PackageId(id), format!("{id} Main St"), deadline)
}

fn eod(id: u32) -> Package {
    pkg(id, TimeOfDay::END_OF_DAY)
}

fn table(packages: impl IntoIterator<Item = Package>) -> PackageTable {
    packages.into_iter().collect()
}

fn truck(id: u16, capacity: usize) -> Truck {
    Truck::new(TruckId(id), NodeId(0), EIGHT).with_capacity(capacity)
}

fn ids(v: &[u32]) -> Vec<PackageId> {
    v.iter().map(|&i| PackageId(i)).collect()
}

fn contents(t: &Truck) -> Vec<u32> {
    t.contents().iter().map(|p| p.0).collect()
}

// ── ConstraintSet ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod constraints {
    use super::*;
    use crate::ConstraintSet;

    #[test]
    fn reference_rules() {
        let c = ConstraintSet::wgups();
        assert_eq!(c.available_at(PackageId(25)), Some(TimeOfDay::from_hm(9, 5)));
        assert_eq!(c.available_at(PackageId(1)), None);
        assert_eq!(c.forced_truck_of(PackageId(36)), Some(TruckId(2)));
        assert!(c.is_grouped(PackageId(19)));
        assert!(!c.is_grouped(PackageId(9)));
        assert_eq!(c.address_change.len(), 1);
        assert_eq!(c.address_change[0].package, PackageId(9));
    }

    #[test]
    fn latest_delay_wins() {
        let c = ConstraintSet::new()
            .delay(TimeOfDay::from_hm(9, 0), ids(&[1]))
            .delay(TimeOfDay::from_hm(10, 0), ids(&[1]));
        assert_eq!(c.available_at(PackageId(1)), Some(TimeOfDay::from_hm(10, 0)));
    }

    #[test]
    fn next_availability() {
        let c = ConstraintSet::new()
            .delay(TimeOfDay::from_hm(9, 5), ids(&[1]))
            .delay(TimeOfDay::from_hm(11, 0), ids(&[2]));
        assert_eq!(c.next_availability_after(EIGHT), Some(TimeOfDay::from_hm(9, 5)));
        assert_eq!(c.next_availability_after(TimeOfDay::from_hm(9, 5)), Some(TimeOfDay::from_hm(11, 0)));
        assert_eq!(c.next_availability_after(TimeOfDay::from_hm(11, 0)), None);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use fleet_core::PackageStatus;

    use super::*;
    use crate::{load_trucks, ConstraintSet, DispatchError};

    #[test]
    fn forced_package_rides_its_truck() {
        let mut packages = table([pkg(1, TimeOfDay::from_hm(9, 0))]);
        let mut trucks = vec![truck(1, 16), truck(2, 1)];
        let c = ConstraintSet::new().force(TruckId(2), ids(&[1]));

        let out = load_trucks(&mut trucks, ids(&[1]), &mut packages, &c, EIGHT).unwrap();

        assert!(out.backlog.is_empty());
        assert!(trucks[0].is_empty());
        assert_eq!(contents(&trucks[1]), vec![1]);
        let p = packages.get(PackageId(1)).unwrap();
        assert_eq!(p.status(), PackageStatus::EnRoute);
        assert_eq!(p.loaded_at(), Some(EIGHT));
    }

    #[test]
    fn delayed_package_is_held() {
        let mut packages = table([eod(6)]);
        let mut trucks = vec![truck(1, 16)];
        let c = ConstraintSet::new().delay(TimeOfDay::from_hm(9, 5), ids(&[6]));

        let out = load_trucks(&mut trucks, ids(&[6]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(out.backlog, ids(&[6]));
        assert!(trucks[0].is_empty());
        assert_eq!(packages.get(PackageId(6)).unwrap().status(), PackageStatus::Delayed);
    }

    #[test]
    fn delay_is_re_evaluated_each_pass() {
        let mut packages = table([eod(6)]);
        let c = ConstraintSet::new().delay(TimeOfDay::from_hm(9, 5), ids(&[6]));

        let mut trucks = vec![truck(1, 16)];
        let out = load_trucks(&mut trucks, ids(&[6]), &mut packages, &c, EIGHT).unwrap();
        assert_eq!(out.backlog, ids(&[6]));

        let later = TimeOfDay::from_hm(9, 5);
        let out = load_trucks(&mut trucks, out.backlog, &mut packages, &c, later).unwrap();
        assert!(out.backlog.is_empty());
        assert_eq!(contents(&trucks[0]), vec![6]);
        assert_eq!(packages.get(PackageId(6)).unwrap().loaded_at(), Some(later));
    }

    #[test]
    fn remainder_loads_by_deadline_stably() {
        let mut packages = table([
            eod(1),
            pkg(2, TimeOfDay::from_hm(10, 30)),
            eod(3),
            pkg(4, TimeOfDay::from_hm(9, 0)),
            pkg(5, TimeOfDay::from_hm(10, 30)),
        ]);
        let mut trucks = vec![truck(1, 3), truck(2, 3)];
        let c = ConstraintSet::new();

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3, 4, 5]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![4, 2, 5]);
        assert_eq!(contents(&trucks[1]), vec![1, 3]);
        assert!(out.backlog.is_empty());
    }

    #[test]
    fn leftovers_return_in_backlog_order() {
        let mut packages = table([eod(7), pkg(3, TimeOfDay::from_hm(9, 0)), eod(5)]);
        let mut trucks = vec![truck(1, 1)];
        let c = ConstraintSet::new();

        let out = load_trucks(&mut trucks, ids(&[7, 3, 5]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![3]);
        assert_eq!(out.backlog, ids(&[7, 5]));
    }

    #[test]
    fn group_loads_atomically() {
        let mut packages = table((1..=5).map(eod));
        let mut trucks = vec![truck(1, 2), truck(2, 4)];
        let c = ConstraintSet::new().group(ids(&[1, 2, 3]));

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3, 4, 5]), &mut packages, &c, EIGHT).unwrap();

        // Truck 1 can't take all three, so it fills from the remainder.
        assert_eq!(contents(&trucks[0]), vec![4, 5]);
        assert_eq!(contents(&trucks[1]), vec![1, 2, 3]);
        assert!(out.backlog.is_empty());
    }

    #[test]
    fn oversized_group_is_deferred() {
        let mut packages = table((1..=4).map(eod));
        let mut trucks = vec![truck(1, 2), truck(2, 2)];
        let c = ConstraintSet::new().group(ids(&[1, 2, 3]));

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3, 4]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![4]);
        assert!(trucks[1].is_empty());
        assert_eq!(out.backlog, ids(&[1, 2, 3]));
        for id in 1..=3 {
            assert_eq!(packages.get(PackageId(id)).unwrap().status(), PackageStatus::AtHub);
        }
    }

    #[test]
    fn delayed_member_holds_the_group() {
        let mut packages = table((1..=3).map(eod));
        let mut trucks = vec![truck(1, 16)];
        let c = ConstraintSet::new()
            .group(ids(&[1, 2]))
            .delay(TimeOfDay::from_hm(9, 5), ids(&[2]));

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![3]);
        assert_eq!(out.backlog, ids(&[1, 2]));
    }

    #[test]
    fn forced_comes_before_group_and_remainder() {
        let mut packages = table([
            pkg(1, TimeOfDay::from_hm(9, 0)),
            eod(2),
            eod(3),
            eod(4),
        ]);
        let mut trucks = vec![truck(2, 3)];
        let c = ConstraintSet::new()
            .force(TruckId(2), ids(&[4]))
            .group(ids(&[2, 3]));

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3, 4]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![4, 2, 3]);
        assert_eq!(out.backlog, ids(&[1]));
    }

    #[test]
    fn pinned_package_is_not_taken_by_other_trucks_in_pass() {
        let mut packages = table([pkg(1, TimeOfDay::from_hm(9, 0)), pkg(2, TimeOfDay::from_hm(9, 0)), eod(3)]);
        let mut trucks = vec![truck(1, 5), truck(2, 1)];
        let c = ConstraintSet::new().force(TruckId(2), ids(&[1, 2]));

        let out = load_trucks(&mut trucks, ids(&[1, 2, 3]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![3]);
        assert_eq!(contents(&trucks[1]), vec![1]);
        // Excess forced package waits for a later pass.
        assert_eq!(out.backlog, ids(&[2]));
    }

    #[test]
    fn pinned_package_is_ordinary_when_its_truck_is_away() {
        let mut packages = table([eod(1)]);
        let mut trucks = vec![truck(1, 5)];
        let c = ConstraintSet::new().force(TruckId(2), ids(&[1]));

        let out = load_trucks(&mut trucks, ids(&[1]), &mut packages, &c, EIGHT).unwrap();

        assert_eq!(contents(&trucks[0]), vec![1]);
        assert!(out.backlog.is_empty());
    }

    #[test]
    fn dispatched_packages_are_never_reselected() {
        let mut packages = table([eod(1), eod(2)]);
        let mut trucks = vec![truck(1, 1)];
        let c = ConstraintSet::new();

        let out = load_trucks(&mut trucks, ids(&[1, 2]), &mut packages, &c, EIGHT).unwrap();
        assert_eq!(out.backlog, ids(&[2]));

        // Feeding the en-route package back in must not load it twice.
        let mut second = vec![truck(2, 5)];
        let out = load_trucks(&mut second, ids(&[1, 2, 2]), &mut packages, &c, EIGHT).unwrap();
        assert_eq!(contents(&second[0]), vec![2]);
        assert!(out.backlog.is_empty());
        assert_eq!(out.loaded, vec![(TruckId(2), PackageId(2))]);
    }

    #[test]
    fn full_truck_leaves_package_at_hub() {
        let mut packages = table([eod(1), eod(2)]);
        let mut t = truck(1, 1);
        let mut loaded = Vec::new();

        crate::loader::load_one(&mut t, PackageId(1), &mut packages, EIGHT, &mut loaded).unwrap();
        let err = crate::loader::load_one(&mut t, PackageId(2), &mut packages, EIGHT, &mut loaded).unwrap_err();

        assert!(matches!(err, DispatchError::TruckFull { truck: TruckId(1), package: PackageId(2) }));
        assert_eq!(contents(&t), vec![1]);
        assert_eq!(loaded, vec![(TruckId(1), PackageId(1))]);
        let p = packages.get(PackageId(2)).unwrap();
        assert_eq!(p.status(), PackageStatus::AtHub);
        assert_eq!(p.loaded_at(), None);
    }

    #[test]
    fn rejected_status_change_keeps_truck_unchanged() {
        let mut packages = table([eod(1)]);
        let mut t = truck(1, 4);
        let mut loaded = Vec::new();
        packages.get_mut(PackageId(1)).unwrap().mark_loaded(EIGHT).unwrap();

        let err = crate::loader::load_one(&mut t, PackageId(1), &mut packages, EIGHT, &mut loaded).unwrap_err();

        assert!(matches!(err, DispatchError::Core(_)));
        assert!(t.is_empty());
        assert!(loaded.is_empty());
    }

    #[test]
    fn unknown_package_is_an_error() {
        let mut packages = table([eod(1)]);
        let mut trucks = vec![truck(1, 1)];
        let err = load_trucks(&mut trucks, ids(&[99]), &mut packages, &ConstraintSet::new(), EIGHT).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownPackage(PackageId(99))));
    }

    #[test]
    fn reference_day_initial_load() {
        let mut packages = table((1..=40).map(eod));
        let mut trucks = vec![truck(1, 16), truck(2, 16)];
        let c = ConstraintSet::wgups();
        let backlog: Vec<PackageId> = packages.ids().collect();

        let out = load_trucks(&mut trucks, backlog, &mut packages, &c, EIGHT).unwrap();

        let t2 = contents(&trucks[1]);
        for forced in [3, 18, 36, 38] {
            assert!(t2.contains(&forced), "package {forced} should be on truck 2");
        }
        let group = [13, 14, 15, 16, 19, 20];
        let on_one = contents(&trucks[0]).iter().filter(|id| group.contains(id)).count();
        let on_two = t2.iter().filter(|id| group.contains(id)).count();
        assert!((on_one == 6 && on_two == 0) || (on_one == 0 && on_two == 6));
        for delayed in [6, 25, 28, 32] {
            assert!(out.backlog.contains(&PackageId(delayed)));
        }
        assert_eq!(out.loaded_count() + out.backlog.len(), 40);
    }
}

// ── Loader properties ─────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_props {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::{load_trucks, ConstraintSet};

    fn arb_case() -> impl Strategy<Value = (Vec<u32>, Vec<usize>, Vec<u32>, Vec<u32>)> {
        (
            proptest::collection::vec(0u32..600, 1..30),    // deadlines in minutes past 08:00
            proptest::collection::vec(0usize..8, 1..4),     // truck capacities
            proptest::collection::vec(0u32..30, 0..6),      // grouped indices
            proptest::collection::vec(0u32..30, 0..6),      // delayed indices
        )
    }

    proptest! {
        #[test]
        fn conservation_and_grouping((deadlines, caps, grouped, delayed) in arb_case()) {
            let n = deadlines.len() as u32;
            let mut packages: PackageTable = deadlines
                .iter()
                .enumerate()
                .map(|(i, &m)| pkg(i as u32 + 1, TimeOfDay::from_hm(8, 0).plus_secs(m * 60)))
                .collect();
            let group: BTreeSet<PackageId> = grouped.iter().map(|&g| PackageId(g % n + 1)).collect();
            let c = ConstraintSet::new()
                .group(group.iter().copied())
                .delay(TimeOfDay::from_hm(9, 5), delayed.iter().map(|&d| PackageId(d % n + 1)));
            let mut trucks: Vec<Truck> = caps
                .iter()
                .enumerate()
                .map(|(i, &cap)| truck(i as u16 + 1, cap))
                .collect();
            let backlog: Vec<PackageId> = packages.ids().collect();

            let out = load_trucks(&mut trucks, backlog, &mut packages, &c, EIGHT).unwrap();

            // Nothing loaded twice, nothing lost.
            let mut all: Vec<PackageId> = trucks.iter().flat_map(|t| t.contents().iter().copied()).collect();
            let loaded = all.len();
            all.extend(out.backlog.iter().copied());
            all.sort();
            all.dedup();
            prop_assert_eq!(all.len(), n as usize);
            prop_assert_eq!(loaded + out.backlog.len(), n as usize);

            for t in &trucks {
                prop_assert!(t.contents().len() <= t.max_capacity);
                let members = t.contents().iter().filter(|id| group.contains(id)).count();
                prop_assert!(members == 0 || members == group.len());
            }
        }
    }
}

// ── Manifest CSV ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod records {
    use std::io::Cursor;

    use fleet_core::PackageStatus;

    use super::*;
    use crate::{load_packages_reader, DispatchError};

    const CSV: &[u8] = b"\
Package ID,Address,City,State,Zip,Delivery Deadline,Weight,Special Notes\n\
1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21,\n\
9,300 State St,Salt Lake City,UT,84103,EOD,2,Wrong address listed\n\
6,3060 Lester St,West Valley City,UT,84119,10:30,88,Delayed on flight\n\
";

    #[test]
    fn loads_all_rows() {
        let packages = load_packages_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages.count_with(PackageStatus::AtHub), 3);
    }

    #[test]
    fn fields_are_parsed() {
        let packages = load_packages_reader(Cursor::new(CSV)).unwrap();
        let p1 = packages.get(PackageId(1)).unwrap();
        assert_eq!(p1.address, "195 West Oakland Ave");
        assert_eq!(p1.city, "Salt Lake City");
        assert_eq!(p1.zip, "84115");
        assert_eq!(p1.weight, 21);
        assert_eq!(p1.deadline, TimeOfDay::from_hm(10, 30));
        assert_eq!(p1.special_notes, None);

        let p9 = packages.get(PackageId(9)).unwrap();
        assert_eq!(p9.deadline, TimeOfDay::END_OF_DAY);
        assert_eq!(p9.special_notes.as_deref(), Some("Wrong address listed"));
    }

    #[test]
    fn bad_deadline_is_a_parse_error() {
        let csv = b"Package ID,Address,City,State,Zip,Delivery Deadline,Weight,Special Notes\n1,1 Main St,SLC,UT,84101,noonish,1,\n";
        let err = load_packages_reader(Cursor::new(&csv[..])).unwrap_err();
        assert!(matches!(err, DispatchError::Parse(_)));
    }

    #[test]
    fn duplicate_id_is_an_error() {
        let csv = b"Package ID,Address,City,State,Zip,Delivery Deadline,Weight,Special Notes\n1,1 Main St,SLC,UT,84101,EOD,1,\n1,2 Main St,SLC,UT,84101,EOD,1,\n";
        let err = load_packages_reader(Cursor::new(&csv[..])).unwrap_err();
        assert!(matches!(err, DispatchError::DuplicatePackage(PackageId(1))));
    }
}
