// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sorted view over a time column.
//!
//! A [`SortedIndex`] is a permutation of storage rows such that the times
//! read in that order never decrease.  It is built with a stable sort, so
//! rows sharing a time stamp keep their storage order; this is what makes
//! `iloc` and folding deterministic when time stamps repeat.
//!
//! The index does not own the times it describes.  Every lookup takes the
//! time slice again and callers must pass the same column the index was
//! built from; [`SortedIndex::check`] catches the common mistake of using an
//! index after rows were added or removed.

use crate::error::{Result, SeriesError};
use crate::instant::TimeInstant;
use std::cmp::Ordering;
use std::ops::Range;

/// Stable time-ordered permutation of row positions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortedIndex {
    order: Vec<usize>,
}

impl SortedIndex {
    /// Build the index for `times`. O(N log N).
    pub fn build<T: TimeInstant>(times: &[T]) -> Self {
        let mut order: Vec<usize> = (0..times.len()).collect();
        // `sort_by` is a stable merge sort.
        order.sort_by(|&a, &b| times[a].cmp_instant(&times[b]));
        Self { order }
    }

    /// Identity permutation, for columns already known to be sorted.
    pub(crate) fn identity(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Storage rows in time order.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Storage row found at sorted position `pos`.
    pub fn row_at(&self, pos: usize) -> Option<usize> {
        self.order.get(pos).copied()
    }

    /// Storage row holding the earliest time.
    pub fn first(&self) -> Option<usize> {
        self.order.first().copied()
    }

    /// Storage row holding the latest time.
    pub fn last(&self) -> Option<usize> {
        self.order.last().copied()
    }

    /// Fail with [`SeriesError::IndexStale`] unless the index covers `times`.
    pub fn check<T: TimeInstant>(&self, times: &[T]) -> Result<()> {
        if self.order.len() != times.len() {
            return Err(SeriesError::IndexStale {
                indexed: self.order.len(),
                rows: times.len(),
            });
        }
        Ok(())
    }

    /// First sorted position whose time is `>= t`.
    pub fn lower_bound<T: TimeInstant>(&self, times: &[T], t: &T) -> usize {
        self.order
            .partition_point(|&row| times[row].cmp_instant(t) == Ordering::Less)
    }

    /// First sorted position whose time is `> t`.
    pub fn upper_bound<T: TimeInstant>(&self, times: &[T], t: &T) -> usize {
        self.order
            .partition_point(|&row| times[row].cmp_instant(t) != Ordering::Greater)
    }

    /// Sorted positions whose time equals `t`.
    pub fn equal_range<T: TimeInstant>(&self, times: &[T], t: &T) -> Range<usize> {
        let lo = self.lower_bound(times, t);
        let hi = lo
            + self.order[lo..]
                .partition_point(|&row| times[row].cmp_instant(t) == Ordering::Equal);
        lo..hi
    }
}
