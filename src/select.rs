// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Label-based (`loc`) and sorted-positional (`iloc`) row selection.
//!
//! [`RangeResolver`] turns a time, a time range or a sorted position into
//! storage rows by binary search over a [`SortedIndex`].  Results always
//! come back in time order, whatever the storage order is.
//!
//! [`TimeIndexed`] lifts the resolver onto whole series: any type exposing
//! a time axis, its index and a row gather gets `loc`, `loc_between`,
//! `loc_range` and `iloc_range` for free.
//!
//! # Boundaries
//!
//! - `loc_between(start, end)` is inclusive on both ends; `None` leaves a
//!   side open.
//! - `loc_range` accepts any [`RangeBounds`], so `a..b` is half-open and
//!   `a..=b` inclusive.
//! - Positions count from the end when negative.  A scalar position must
//!   fall in `[0, N)`, a range bound in `[0, N]`; anything else is
//!   [`SeriesError::IndexOutOfRange`].  Reversed ranges select nothing.

use crate::error::{Result, SeriesError};
use crate::index::SortedIndex;
use crate::instant::TimeInstant;
use std::ops::{Bound, RangeBounds};

/// Resolves time and position queries against a sorted index.
#[derive(Debug, Clone, Copy)]
pub struct RangeResolver<'a, T: TimeInstant> {
    index: &'a SortedIndex,
    times: &'a [T],
}

impl<'a, T: TimeInstant> RangeResolver<'a, T> {
    /// Pair an index with the time column it was built from.
    pub fn new(index: &'a SortedIndex, times: &'a [T]) -> Result<Self> {
        index.check(times)?;
        Ok(Self { index, times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Rows whose time equals `t`, in storage order among themselves.
    pub fn at(&self, t: &T) -> Vec<usize> {
        let range = self.index.equal_range(self.times, t);
        self.index.as_slice()[range].to_vec()
    }

    /// Rows with `start <= time <= end`; `None` leaves that side open.
    pub fn between(&self, start: Option<&T>, end: Option<&T>) -> Vec<usize> {
        let lo = start.map_or(Bound::Unbounded, Bound::Included);
        let hi = end.map_or(Bound::Unbounded, Bound::Included);
        self.range((lo, hi))
    }

    /// Rows whose time lies in `range`, in time order.
    pub fn range<R: RangeBounds<T>>(&self, range: R) -> Vec<usize> {
        let lo = match range.start_bound() {
            Bound::Included(t) => self.index.lower_bound(self.times, t),
            Bound::Excluded(t) => self.index.upper_bound(self.times, t),
            Bound::Unbounded => 0,
        };
        let hi = match range.end_bound() {
            Bound::Included(t) => self.index.upper_bound(self.times, t),
            Bound::Excluded(t) => self.index.lower_bound(self.times, t),
            Bound::Unbounded => self.len(),
        };
        if lo >= hi {
            return Vec::new();
        }
        self.index.as_slice()[lo..hi].to_vec()
    }

    /// Storage row at sorted position `pos`.
    pub fn position(&self, pos: isize) -> Result<usize> {
        let resolved = resolve_position(pos, self.len(), false)?;
        Ok(self.index.as_slice()[resolved])
    }

    /// Storage rows at the sorted positions in `range`.
    pub fn positions<R: RangeBounds<isize>>(&self, range: R) -> Result<Vec<usize>> {
        let len = self.len();
        let lo = match range.start_bound() {
            Bound::Included(&i) => resolve_position(i, len, true)?,
            Bound::Excluded(&i) => resolve_position(i, len, true)? + 1,
            Bound::Unbounded => 0,
        };
        let hi = match range.end_bound() {
            Bound::Excluded(&j) => resolve_position(j, len, true)?,
            Bound::Included(&j) => resolve_position(j, len, false)? + 1,
            Bound::Unbounded => len,
        };
        if lo >= hi {
            return Ok(Vec::new());
        }
        Ok(self.index.as_slice()[lo..hi].to_vec())
    }
}

/// Map a possibly negative position onto `[0, len)` (or `[0, len]` when
/// `allow_end` is set).
fn resolve_position(pos: isize, len: usize, allow_end: bool) -> Result<usize> {
    let resolved = if pos < 0 {
        len as isize + pos
    } else {
        pos
    };
    let in_range = resolved >= 0
        && if allow_end {
            resolved as usize <= len
        } else {
            (resolved as usize) < len
        };
    if !in_range {
        return Err(SeriesError::IndexOutOfRange {
            position: pos,
            len,
        });
    }
    Ok(resolved as usize)
}

/// A container whose rows are addressed through a sorted time axis.
pub trait TimeIndexed: Sized {
    type Instant: TimeInstant;

    /// Time of every row in storage order (sample times or bin starts).
    fn time_axis(&self) -> &[Self::Instant];

    fn sorted_index(&self) -> &SortedIndex;

    /// New container made of `rows` (storage positions), in that order.
    fn take_rows(&self, rows: &[usize]) -> Self;

    fn resolver(&self) -> Result<RangeResolver<'_, Self::Instant>> {
        RangeResolver::new(self.sorted_index(), self.time_axis())
    }

    /// Earliest time on the axis.
    fn earliest(&self) -> Option<Self::Instant> {
        self.sorted_index()
            .first()
            .and_then(|row| self.time_axis().get(row).copied())
    }

    /// Latest time on the axis.
    fn latest(&self) -> Option<Self::Instant> {
        self.sorted_index()
            .last()
            .and_then(|row| self.time_axis().get(row).copied())
    }

    /// All rows stamped exactly `t`.
    fn loc(&self, t: Self::Instant) -> Result<Self> {
        let rows = self.resolver()?.at(&t);
        Ok(self.take_rows(&rows))
    }

    /// Rows with `start <= time <= end`, sorted by time.
    fn loc_between(
        &self,
        start: Option<Self::Instant>,
        end: Option<Self::Instant>,
    ) -> Result<Self> {
        let rows = self.resolver()?.between(start.as_ref(), end.as_ref());
        Ok(self.take_rows(&rows))
    }

    /// Rows whose time lies in `range`, sorted by time.
    fn loc_range<R: RangeBounds<Self::Instant>>(&self, range: R) -> Result<Self> {
        let rows = self.resolver()?.range(range);
        Ok(self.take_rows(&rows))
    }

    /// Rows at sorted positions `range`.
    fn iloc_range<R: RangeBounds<isize>>(&self, range: R) -> Result<Self> {
        let rows = self.resolver()?.positions(range)?;
        Ok(self.take_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Time, MJD};

    fn fixture() -> (Vec<Time<MJD>>, SortedIndex) {
        // storage: 30, 10, 20, 20, 40
        let times: Vec<_> = [30.0, 10.0, 20.0, 20.0, 40.0]
            .iter()
            .map(|&v| Time::<MJD>::new(v))
            .collect();
        let index = SortedIndex::build(&times);
        (times, index)
    }

    fn t(v: f64) -> Time<MJD> {
        Time::<MJD>::new(v)
    }

    #[test]
    fn test_at_returns_duplicates_in_storage_order() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert_eq!(resolver.at(&t(20.0)), vec![2, 3]);
        assert_eq!(resolver.at(&t(30.0)), vec![0]);
        assert!(resolver.at(&t(25.0)).is_empty());
    }

    #[test]
    fn test_between_is_inclusive_on_both_ends() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert_eq!(resolver.between(Some(&t(20.0)), Some(&t(30.0))), vec![2, 3, 0]);
        assert_eq!(resolver.between(None, Some(&t(10.0))), vec![1]);
        assert_eq!(resolver.between(Some(&t(40.0)), None), vec![4]);
        assert_eq!(resolver.between(None, None), vec![1, 2, 3, 0, 4]);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert!(resolver.between(Some(&t(30.0)), Some(&t(20.0))).is_empty());
    }

    #[test]
    fn test_half_open_range_excludes_upper_boundary() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert_eq!(resolver.range(t(20.0)..t(30.0)), vec![2, 3]);
        assert_eq!(resolver.range(t(20.0)..=t(30.0)), vec![2, 3, 0]);
        assert_eq!(resolver.range(..), vec![1, 2, 3, 0, 4]);
    }

    #[test]
    fn test_positions_follow_time_order() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert_eq!(resolver.position(0).unwrap(), 1);
        assert_eq!(resolver.position(-1).unwrap(), 4);
        assert_eq!(resolver.positions(0..2).unwrap(), vec![1, 2]);
        assert_eq!(resolver.positions(-2..).unwrap(), vec![0, 4]);
        assert_eq!(resolver.positions(1..=2).unwrap(), vec![2, 3]);
        assert_eq!(resolver.positions(..).unwrap().len(), 5);
        assert!(resolver.positions(3..1).unwrap().is_empty());
        assert!(resolver.positions(5..5).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_positions_fail() {
        let (times, index) = fixture();
        let resolver = RangeResolver::new(&index, &times).unwrap();
        assert_eq!(
            resolver.position(5),
            Err(SeriesError::IndexOutOfRange {
                position: 5,
                len: 5
            })
        );
        assert!(resolver.position(-6).is_err());
        assert!(resolver.positions(0..6).is_err());
        assert!(resolver.positions(0..=5).is_err());
        assert!(resolver.positions(-7..).is_err());
    }

    #[test]
    fn test_stale_index_is_rejected() {
        let (mut times, index) = fixture();
        times.pop();
        assert!(matches!(
            RangeResolver::new(&index, &times),
            Err(SeriesError::IndexStale { .. })
        ));
    }
}
