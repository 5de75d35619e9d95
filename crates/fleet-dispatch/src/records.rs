//! CSV package manifest loader.
//!
//! # CSV format
//!
//! One row per package:
//!
//! ```csv
//! Package ID,Address,City,State,Zip,Delivery Deadline,Weight,Special Notes
//! 1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21,
//! 9,300 State St,Salt Lake City,UT,84103,EOD,2,Wrong address listed
//! ```
//!
//! **`Delivery Deadline`** field:
//!
//! | Value        | Meaning                                   |
//! |--------------|-------------------------------------------|
//! | `EOD`        | end of day, `TimeOfDay::END_OF_DAY` (17:00) |
//! | `10:30 AM`   | 12-hour clock time                        |
//! | `10:30`      | 24-hour clock time                        |
//!
//! Addresses are normalised with [`normalize_address`] so they match the
//! distance table.  An empty `Special Notes` cell becomes `None`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use fleet_core::{Package, PackageId, PackageTable, TimeOfDay};
use fleet_spatial::normalize_address;

use crate::{DispatchError, DispatchResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PackageRecord {
    #[serde(rename = "Package ID")]
    id:       u32,
    #[serde(rename = "Address")]
    address:  String,
    #[serde(rename = "City")]
    city:     String,
    #[serde(rename = "State")]
    state:    String,
    #[serde(rename = "Zip")]
    zip:      String,
    #[serde(rename = "Delivery Deadline")]
    deadline: String,
    #[serde(rename = "Weight")]
    weight:   u32,
    #[serde(rename = "Special Notes", default)]
    notes:    Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the package manifest from a CSV file.
pub fn load_packages_csv(path: &Path) -> DispatchResult<PackageTable> {
    let file = std::fs::File::open(path).map_err(DispatchError::Io)?;
    load_packages_reader(file)
}

/// Like [`load_packages_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded data sets.
pub fn load_packages_reader<R: Read>(reader: R) -> DispatchResult<PackageTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut table = PackageTable::new();

    for result in csv_reader.deserialize::<PackageRecord>() {
        let row = result.map_err(|e| DispatchError::Parse(e.to_string()))?;
        let id = PackageId(row.id);

        let mut package = Package::new(id, normalize_address(&row.address), parse_deadline(&row.deadline)?);
        package.city = row.city;
        package.state = row.state;
        package.zip = row.zip;
        package.weight = row.weight;
        package.special_notes = row.notes.filter(|n| !n.is_empty());

        if table.insert(package).is_some() {
            return Err(DispatchError::DuplicatePackage(id));
        }
    }

    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_deadline(s: &str) -> DispatchResult<TimeOfDay> {
    if s.trim().eq_ignore_ascii_case("EOD") {
        return Ok(TimeOfDay::END_OF_DAY);
    }
    TimeOfDay::parse(s).map_err(|_| {
        DispatchError::Parse(format!(
            "invalid deadline {s:?}: expected \"EOD\" or a clock time"
        ))
    })
}
