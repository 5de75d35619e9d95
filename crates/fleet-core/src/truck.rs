//! Delivery trucks.

use crate::{travel_secs, NodeId, PackageId, TimeOfDay, TruckId};

/// A truck holding an ordered list of loaded package ids.
///
/// Capacity is counted in packages, not weight.  The invariant
/// `contents.len() <= max_capacity` is enforced by [`Truck::load`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Truck {
    pub id:           TruckId,
    /// The hub or the destination of the last delivery.
    pub location:     NodeId,
    pub speed_mph:    f64,
    pub max_capacity: usize,
    /// Truck-local time, synchronised to the global clock after every move.
    pub clock:        TimeOfDay,
    contents:         Vec<PackageId>,
}

impl Truck {
    pub const DEFAULT_SPEED_MPH: f64 = 18.0;
    pub const DEFAULT_CAPACITY: usize = 16;

    pub fn new(id: TruckId, location: NodeId, clock: TimeOfDay) -> Self {
        Self {
            id,
            location,
            speed_mph: Self::DEFAULT_SPEED_MPH,
            max_capacity: Self::DEFAULT_CAPACITY,
            clock,
            contents: Vec::new(),
        }
    }

    pub fn with_speed(mut self, speed_mph: f64) -> Self {
        self.speed_mph = speed_mph;
        self
    }

    pub fn with_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    #[inline]
    pub fn contents(&self) -> &[PackageId] {
        &self.contents
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.max_capacity.saturating_sub(self.contents.len())
    }

    /// Put `package` on board.  Returns `false` if the truck is full.
    pub fn load(&mut self, package: PackageId) -> bool {
        if self.remaining_capacity() == 0 {
            return false;
        }
        self.contents.push(package);
        true
    }

    /// Take `package` off the truck.  Returns `false` if it was not aboard.
    pub fn unload(&mut self, package: PackageId) -> bool {
        match self.contents.iter().position(|&p| p == package) {
            Some(i) => {
                self.contents.remove(i);
                true
            }
            None => false,
        }
    }

    /// Seconds this truck needs to cover `miles`.
    #[inline]
    pub fn travel_secs(&self, miles: f64) -> u32 {
        travel_secs(miles, self.speed_mph)
    }
}
