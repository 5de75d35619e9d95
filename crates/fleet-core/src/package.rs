//! Packages and the package table.
//!
//! # Status lifecycle
//!
//! ```text
//!   AtHub ⇄ Delayed          (re-evaluated on every loader pass)
//!     │        │
//!     └──┬─────┘
//!        ▼
//!     EnRoute ──▶ Delivered
//! ```
//!
//! Transitions only move along these arrows.  Once a package is `EnRoute` it
//! belongs to exactly one truck, and a `Delivered` package is never touched
//! again.

use std::collections::BTreeMap;
use std::fmt;

use crate::{CoreError, CoreResult, PackageId, TimeOfDay};

// ── PackageStatus ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageStatus {
    #[default]
    AtHub,
    /// Not at the hub yet; becomes `AtHub` at its availability time.
    Delayed,
    EnRoute,
    Delivered,
}

impl PackageStatus {
    /// `true` while the package may still be picked by the loader.
    #[inline]
    pub fn is_at_hub(self) -> bool {
        matches!(self, PackageStatus::AtHub | PackageStatus::Delayed)
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_become(self, next: PackageStatus) -> bool {
        use PackageStatus::*;
        matches!(
            (self, next),
            (AtHub, Delayed) | (Delayed, AtHub) | (AtHub, EnRoute) | (Delayed, EnRoute) | (EnRoute, Delivered)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackageStatus::AtHub     => "at the hub",
            PackageStatus::Delayed   => "delayed",
            PackageStatus::EnRoute   => "en route",
            PackageStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Package ───────────────────────────────────────────────────────────────────

/// One package on the day's manifest.
///
/// Status is private so every change goes through a checked transition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub id:            PackageId,
    pub address:       String,
    pub city:          String,
    pub state:         String,
    pub zip:           String,
    pub weight:        u32,
    pub deadline:      TimeOfDay,
    pub special_notes: Option<String>,
    status:            PackageStatus,
    loaded_at:         Option<TimeOfDay>,
    delivered_at:      Option<TimeOfDay>,
}

impl Package {
    /// A package sitting at the hub with no notes.
    pub fn new(id: PackageId, address: impl Into<String>, deadline: TimeOfDay) -> Self {
        Self {
            id,
            address: address.into(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            weight: 0,
            deadline,
            special_notes: None,
            status: PackageStatus::AtHub,
            loaded_at: None,
            delivered_at: None,
        }
    }

    #[inline]
    pub fn status(&self) -> PackageStatus {
        self.status
    }

    #[inline]
    pub fn loaded_at(&self) -> Option<TimeOfDay> {
        self.loaded_at
    }

    #[inline]
    pub fn delivered_at(&self) -> Option<TimeOfDay> {
        self.delivered_at
    }

    fn transition(&mut self, next: PackageStatus) -> CoreResult<()> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_become(next) {
            return Err(CoreError::InvalidTransition { package: self.id, from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }

    /// Hold the package back until its availability time.
    pub fn mark_delayed(&mut self) -> CoreResult<()> {
        self.transition(PackageStatus::Delayed)
    }

    /// A delayed package has arrived at the hub.
    pub fn mark_available(&mut self) -> CoreResult<()> {
        self.transition(PackageStatus::AtHub)
    }

    /// Loaded onto a truck at `now`.
    pub fn mark_loaded(&mut self, now: TimeOfDay) -> CoreResult<()> {
        if self.status == PackageStatus::EnRoute {
            return Err(CoreError::InvalidTransition { package: self.id, from: self.status, to: PackageStatus::EnRoute });
        }
        self.transition(PackageStatus::EnRoute)?;
        self.loaded_at = Some(now);
        Ok(())
    }

    /// Handed to the recipient at `now`.
    pub fn mark_delivered(&mut self, now: TimeOfDay) -> CoreResult<()> {
        if self.status == PackageStatus::Delivered {
            return Err(CoreError::InvalidTransition { package: self.id, from: self.status, to: PackageStatus::Delivered });
        }
        self.transition(PackageStatus::Delivered)?;
        self.delivered_at = Some(now);
        Ok(())
    }

    /// Replace the destination.  The status is left alone.
    pub fn correct_address(&mut self, address: &str, city: &str, zip: &str) {
        self.address = address.to_string();
        self.city = city.to_string();
        self.zip = zip.to_string();
    }

    /// Whether the package arrived by its deadline (`None` until delivered).
    pub fn on_time(&self) -> Option<bool> {
        self.delivered_at.map(|t| t <= self.deadline)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, status {}, deadline {}", self.id, self.address, self.status, self.deadline)?;
        if let Some(t) = self.delivered_at {
            write!(f, ", delivered {t}")?;
        }
        if let Some(notes) = &self.special_notes {
            write!(f, ", notes: {notes}")?;
        }
        Ok(())
    }
}

// ── PackageTable ──────────────────────────────────────────────────────────────

/// All packages of a run keyed by id.  Iteration is in ascending id order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageTable {
    packages: BTreeMap<PackageId, Package>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `package`, returning the package previously stored under its id.
    pub fn insert(&mut self, package: Package) -> Option<Package> {
        self.packages.insert(package.id, package)
    }

    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn get_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.packages.get_mut(&id)
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.packages.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.packages.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> + '_ {
        self.packages.values()
    }

    /// Number of packages currently in `status`.
    pub fn count_with(&self, status: PackageStatus) -> usize {
        self.packages.values().filter(|p| p.status() == status).count()
    }
}

impl FromIterator<Package> for PackageTable {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut table = PackageTable::new();
        for p in iter {
            table.insert(p);
        }
        table
    }
}
