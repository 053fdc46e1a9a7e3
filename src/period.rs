// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Half-open time intervals.
//!
//! An [`Interval`] is the unit of binning: bin `i` of a binned series is
//! `[start_i, start_i + size_i)`.

use super::{Time, TimeInstant, TimeScale};
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the half-open interval `[start, end)` between two instants.
///
/// # Examples
///
/// ```
/// use tempoch_series::{Interval, ModifiedJulianDate};
/// use qtty::Days;
///
/// let bin = Interval::new(ModifiedJulianDate::new(59000.0), ModifiedJulianDate::new(59001.5));
/// assert_eq!(bin.duration(), Days::new(1.5));
/// assert!(bin.contains(&ModifiedJulianDate::new(59000.0)));
/// assert!(!bin.contains(&ModifiedJulianDate::new(59001.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Time-scale interval alias: `Period<MJD>`, `Period<JD>`, ...
pub type Period<S> = Interval<Time<S>>;

impl<T: TimeInstant> Interval<T> {
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Build the interval `[start, start + duration)`.
    pub fn from_duration(start: T, duration: T::Duration) -> Self {
        Interval::new(start, start.add_duration(duration))
    }

    /// `end - start`.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Midpoint `start + duration / 2`.
    pub fn center(&self) -> T {
        use crate::instant::TimeSpan;
        self.start.add_duration(self.duration().mul_f64(0.5))
    }

    /// `true` when `start <= t < end`.
    pub fn contains(&self, t: &T) -> bool {
        self.start.cmp_instant(t).is_le() && t.cmp_instant(&self.end).is_lt()
    }

    /// Returns the overlapping sub-interval between `self` and `other`.
    ///
    /// Intervals that only touch (`a.end == b.start`) do not intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = match self.start.cmp_instant(&other.start) {
            Ordering::Less => other.start,
            _ => self.start,
        };
        let end = match self.end.cmp_instant(&other.end) {
            Ordering::Greater => other.end,
            _ => self.end,
        };
        start
            .cmp_instant(&end)
            .is_lt()
            .then(|| Self::new(start, end))
    }
}

impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl<S: TimeScale> Interval<Time<S>> {
    /// Re-express both endpoints on another time scale.
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Period<T> {
        Interval::new(self.start.to::<T>(), self.end.to::<T>())
    }
}
