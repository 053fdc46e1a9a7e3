// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time values and durations as seen by the series engine.
//!
//! The engine never looks inside a time value.  Everything it needs is
//! captured by two traits:
//!
//! - [`TimeInstant`] — a totally ordered point in time that can be
//!   subtracted from another instant (yielding a duration) and shifted by a
//!   duration.
//! - [`TimeSpan`] — the signed, real-valued duration produced by that
//!   subtraction.
//!
//! [`Time<S>`] is the crate's own instant type: a single [`Days`] quantity
//! whose meaning is fixed by the compile-time marker `S: TimeScale`.
//! `chrono::DateTime<Utc>` is supported as well, and both duration types
//! ([`Days`] and `chrono::Duration`) are instants in their own right so a
//! folded series can use "time since epoch" as its time axis.

use chrono::{DateTime, Utc};
use qtty::Days;
use std::cmp::Ordering;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// Scales and scale-tagged instants
// ═══════════════════════════════════════════════════════════════════════════

/// A day-count axis, tied to the Julian Date in TT.
///
/// Implemented by the zero-sized markers in this crate ([`JD`](crate::JD),
/// [`MJD`](crate::MJD), ...).
pub trait TimeScale: Copy + Clone + Debug + PartialEq + PartialOrd + 'static {
    /// Prefix printed before the day count.
    const LABEL: &'static str;

    /// Day count on this scale → JD(TT).
    fn to_jd_tt(value: Days) -> Days;

    /// JD(TT) → day count on this scale.
    fn from_jd_tt(jd_tt: Days) -> Days;
}

/// A day count on scale `S`.
///
/// Same size as an `f64`.  Two `Time`s only compare or subtract within one
/// scale; use [`Time::to`] to move between scales.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeScale> {
    days: Days,
    scale: PhantomData<S>,
}

impl<S: TimeScale> Time<S> {
    #[inline]
    pub const fn new(days: f64) -> Self {
        Self::from_days(Days::new(days))
    }

    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self {
            days,
            scale: PhantomData,
        }
    }

    #[inline]
    pub const fn quantity(&self) -> Days {
        self.days
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.days.value()
    }

    /// The same instant on scale `T`.
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Time<T> {
        Time::from_days(T::from_jd_tt(S::to_jd_tt(self.days)))
    }
}

impl<S: TimeScale> fmt::Display for Time<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", S::LABEL, self.days)
    }
}

/// Serialised as the bare day count; the scale lives in the type.
#[cfg(feature = "serde")]
impl<S: TimeScale> Serialize for Time<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.value().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeScale> Deserialize<'de> for Time<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::new)
    }
}

impl<S: TimeScale> Add<Days> for Time<S> {
    type Output = Self;

    #[inline]
    fn add(self, offset: Days) -> Self {
        Self::from_days(self.days + offset)
    }
}

impl<S: TimeScale> Sub<Days> for Time<S> {
    type Output = Self;

    #[inline]
    fn sub(self, offset: Days) -> Self {
        Self::from_days(self.days - offset)
    }
}

impl<S: TimeScale> Sub for Time<S> {
    type Output = Days;

    #[inline]
    fn sub(self, earlier: Self) -> Days {
        self.days - earlier.days
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeSpan trait
// ═══════════════════════════════════════════════════════════════════════════

/// A signed, real-valued duration between two instants.
pub trait TimeSpan:
    Copy + Clone + Debug + PartialEq + PartialOrd + Add<Output = Self> + Sub<Output = Self>
{
    /// The zero-length duration.
    fn zero() -> Self;

    /// How many `unit`s fit in `self` (`self / unit`, unitless).
    fn div_span(&self, unit: &Self) -> f64;

    /// `self * factor`.
    fn mul_f64(&self, factor: f64) -> Self;

    /// Euclidean remainder of `self` by a positive `period`, in `[0, period)`.
    fn rem_span(&self, period: &Self) -> Self;

    /// `true` when the duration is strictly greater than zero.
    #[inline]
    fn is_positive(&self) -> bool {
        *self > Self::zero()
    }
}

impl TimeSpan for Days {
    #[inline]
    fn zero() -> Self {
        Days::new(0.0)
    }

    #[inline]
    fn div_span(&self, unit: &Self) -> f64 {
        self.value() / unit.value()
    }

    #[inline]
    fn mul_f64(&self, factor: f64) -> Self {
        Days::new(self.value() * factor)
    }

    fn rem_span(&self, period: &Self) -> Self {
        let r = self.value().rem_euclid(period.value());
        // `rem_euclid` rounds a tiny negative input up to `period` itself
        if r < period.value() {
            Days::new(r)
        } else {
            Days::new(0.0)
        }
    }
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Exact length of `d` in nanoseconds; never overflows.
fn total_nanos(d: &chrono::Duration) -> i128 {
    i128::from(d.num_seconds()) * NANOS_PER_SEC + i128::from(d.subsec_nanos())
}

/// Inverse of [`total_nanos`], saturating at the representable range.
fn from_total_nanos(nanos: i128) -> chrono::Duration {
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let sub = nanos.rem_euclid(NANOS_PER_SEC) as i64;
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|d| d.checked_add(&chrono::Duration::nanoseconds(sub)))
        .unwrap_or(if nanos < 0 {
            chrono::Duration::MIN
        } else {
            chrono::Duration::MAX
        })
}

impl TimeSpan for chrono::Duration {
    #[inline]
    fn zero() -> Self {
        chrono::Duration::zero()
    }

    fn div_span(&self, unit: &Self) -> f64 {
        total_nanos(self) as f64 / total_nanos(unit) as f64
    }

    fn mul_f64(&self, factor: f64) -> Self {
        // Integral factors (bin and period multiples) stay exact.
        if factor.fract() == 0.0 {
            if factor.abs() <= i32::MAX as f64 {
                if let Some(product) = self.checked_mul(factor as i32) {
                    return product;
                }
            }
            if let Some(product) = total_nanos(self).checked_mul(factor as i128) {
                return from_total_nanos(product);
            }
        }
        from_total_nanos((total_nanos(self) as f64 * factor).round() as i128)
    }

    fn rem_span(&self, period: &Self) -> Self {
        from_total_nanos(total_nanos(self).rem_euclid(total_nanos(period)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// A point on a series' time axis.
///
/// Implementors must provide a **total** order through [`cmp_instant`]
/// (float-backed instants use `f64::total_cmp`), so sorting and binary
/// search never depend on `PartialOrd` returning `None`.
///
/// [`cmp_instant`]: TimeInstant::cmp_instant
pub trait TimeInstant: Copy + Clone + Debug + PartialEq + PartialOrd + Sized {
    /// What subtracting two instants yields.
    type Duration: TimeSpan;

    /// Total order between two instants.
    fn cmp_instant(&self, other: &Self) -> Ordering;

    /// `self - other`.
    fn difference(&self, other: &Self) -> Self::Duration;

    /// `self + duration`.
    fn add_duration(&self, duration: Self::Duration) -> Self;

    /// `self - duration`.
    fn sub_duration(&self, duration: Self::Duration) -> Self;
}

/// Instant types whose arithmetic is plain `+`/`-` against their duration.
macro_rules! arithmetic_instant {
    ($({$($generics:tt)*})? $ty:ty, $duration:ty, |$a:ident, $b:ident| $cmp:expr) => {
        impl$(<$($generics)*>)? TimeInstant for $ty {
            type Duration = $duration;

            #[inline]
            fn cmp_instant(&self, other: &Self) -> Ordering {
                let ($a, $b) = (self, other);
                $cmp
            }

            #[inline]
            fn difference(&self, other: &Self) -> $duration {
                *self - *other
            }

            #[inline]
            fn add_duration(&self, duration: $duration) -> Self {
                *self + duration
            }

            #[inline]
            fn sub_duration(&self, duration: $duration) -> Self {
                *self - duration
            }
        }
    };
}

arithmetic_instant!({S: TimeScale} Time<S>, Days, |a, b| a.value().total_cmp(&b.value()));
arithmetic_instant!(DateTime<Utc>, chrono::Duration, |a, b| a.cmp(b));

// A duration measured from some epoch is itself a valid time axis; folded
// series rely on this.
arithmetic_instant!(Days, Days, |a, b| a.value().total_cmp(&b.value()));
arithmetic_instant!(chrono::Duration, chrono::Duration, |a, b| a.cmp(b));
