//! Simulation time model.
//!
//! # Design
//!
//! Time is a `TimeOfDay` counting whole seconds since midnight.  Integer
//! seconds keep clock arithmetic exact (no floating-point drift) and make
//! comparisons O(1).  Travel times computed from fractional miles are rounded
//! **up** to the next second so a truck never arrives early.
//!
//! `SimClock` owns the single global timeline of a run: the current time, the
//! end-of-window bound, the delivery counters and the append-only event log.
//! It only moves forward, and never past the bound:
//!
//! ```text
//! advance(Δ):  now + Δ ≤ end  →  now += Δ, returns true
//!              now + Δ > end  →  rejected, now unchanged, clock exhausted
//! ```

use std::fmt;

use crate::{CoreError, CoreResult, EventKind, SimEvent};

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// Seconds since midnight.
///
/// Values past 24:00 are representable (a late window plus a long drive) and
/// simply print with an hour ≥ 24.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay(pub u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Deadline used for packages marked `EOD`.
    pub const END_OF_DAY: TimeOfDay = TimeOfDay::from_hms(17, 0, 0);

    #[inline]
    pub const fn from_hms(hour: u32, minute: u32, second: u32) -> TimeOfDay {
        TimeOfDay(hour * 3_600 + minute * 60 + second)
    }

    #[inline]
    pub const fn from_hm(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::from_hms(hour, minute, 0)
    }

    /// Break into `(hour, minute, second)`.
    pub fn hms(self) -> (u32, u32, u32) {
        (self.0 / 3_600, (self.0 % 3_600) / 60, self.0 % 60)
    }

    /// The time `secs` seconds after `self` (saturating).
    #[inline]
    pub fn plus_secs(self, secs: u32) -> TimeOfDay {
        TimeOfDay(self.0.saturating_add(secs))
    }

    /// Seconds from `self` until `later`; zero if `later` is not after `self`.
    #[inline]
    pub fn secs_until(self, later: TimeOfDay) -> u32 {
        later.0.saturating_sub(self.0)
    }

    /// Parse `HH:MM`, `HH:MM:SS`, or a 12-hour `H:MM AM/PM` string.
    ///
    /// ```
    /// use fleet_core::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::parse("10:30 AM").unwrap(), TimeOfDay::from_hm(10, 30));
    /// assert_eq!(TimeOfDay::parse("13:05").unwrap(), TimeOfDay::from_hm(13, 5));
    /// assert_eq!(TimeOfDay::parse("12:15 am").unwrap(), TimeOfDay::from_hm(0, 15));
    /// ```
    pub fn parse(input: &str) -> CoreResult<TimeOfDay> {
        let err = || CoreError::TimeParse(input.to_string());
        let text = input.trim().to_ascii_uppercase();

        let (clock, meridiem) = if let Some(rest) = text.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = text.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (text.as_str(), None)
        };

        let mut parts = clock.split(':');
        let mut field = |max: u32| -> CoreResult<Option<u32>> {
            match parts.next() {
                None => Ok(None),
                Some(p) => {
                    let v: u32 = p.trim().parse().map_err(|_| err())?;
                    if v > max {
                        return Err(err());
                    }
                    Ok(Some(v))
                }
            }
        };

        let hour = field(23)?.ok_or_else(err)?;
        let minute = field(59)?.ok_or_else(err)?;
        let second = field(59)?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(err());
        }

        let hour = match meridiem {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => return Err(err()),
            Some(false) => hour % 12,
            Some(true) => hour % 12 + 12,
        };

        Ok(TimeOfDay::from_hms(hour, minute, second))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Whole seconds needed to drive `miles` at `speed_mph`, rounded up.
///
/// The duration is snapped to the millisecond before rounding up, so
/// floating-point noise in a decimal distance never adds a spurious second.
/// A non-positive speed yields `u32::MAX`, which the clock always rejects.
pub fn travel_secs(miles: f64, speed_mph: f64) -> u32 {
    if speed_mph <= 0.0 {
        return u32::MAX;
    }
    let millis = (miles * 3_600_000.0 / speed_mph).round();
    let secs = (millis / 1_000.0).ceil();
    if secs >= u32::MAX as f64 { u32::MAX } else { secs.max(0.0) as u32 }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Global clock, delivery counters, and event log for one simulation run.
#[derive(Clone, Debug)]
pub struct SimClock {
    now:       TimeOfDay,
    end:       TimeOfDay,
    /// Set once an advance has been rejected; the run cannot make progress
    /// past this point.
    exhausted: bool,
    delivered: usize,
    /// Delivered-count at which the run is complete.
    target:    usize,
    mileage:   f64,
    events:    Vec<SimEvent>,
}

impl SimClock {
    /// Create a clock at `start` bounded by `end`, complete once `target`
    /// deliveries have been recorded.
    pub fn new(start: TimeOfDay, end: TimeOfDay, target: usize) -> Self {
        Self {
            now: start,
            end,
            exhausted: false,
            delivered: 0,
            target,
            mileage: 0.0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> TimeOfDay {
        self.now
    }

    #[inline]
    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Move the clock forward by `secs`.
    ///
    /// Returns `false` (and leaves the time untouched) if the move would
    /// cross the end bound.  A rejected advance marks the clock exhausted.
    pub fn advance(&mut self, secs: u32) -> bool {
        let next = self.now.plus_secs(secs);
        if next > self.end {
            self.exhausted = true;
            return false;
        }
        self.now = next;
        true
    }

    /// Move the clock forward to `at`.  A target in the past is a no-op that
    /// succeeds.
    pub fn advance_to(&mut self, at: TimeOfDay) -> bool {
        self.advance(self.now.secs_until(at))
    }

    pub fn record_delivery(&mut self) {
        self.delivered += 1;
    }

    pub fn add_mileage(&mut self, miles: f64) {
        self.mileage += miles;
    }

    #[inline]
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline]
    pub fn mileage(&self) -> f64 {
        self.mileage
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// `true` once the window has closed, an advance has been rejected, or
    /// every package has been delivered.
    pub fn is_over(&self) -> bool {
        self.exhausted || self.now >= self.end || self.delivered >= self.target
    }

    /// Append an event stamped with the current time.
    pub fn log(&mut self, kind: EventKind) -> &SimEvent {
        self.events.push(SimEvent { at: self.now, kind });
        &self.events[self.events.len() - 1]
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (end {}, {}/{} delivered, {:.1} mi)",
            self.now, self.end, self.delivered, self.target, self.mileage
        )
    }
}
