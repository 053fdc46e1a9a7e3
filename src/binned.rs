// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Binned time series: each row covers `[start, start + size)`.
//!
//! Only bin starts and bin sizes are stored.  Bin centers and ends are
//! recomputed from them on every call, so they can never drift out of sync
//! with the stored axis.

use crate::error::{Result, SeriesError};
use crate::index::SortedIndex;
use crate::instant::{TimeInstant, TimeSpan};
use crate::period::Interval;
use crate::select::TimeIndexed;
use crate::table::{Column, Row, Table};

/// Width of the bins of a [`BinnedTimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub enum BinSizes<D> {
    /// Every bin has the same width.
    Uniform(D),
    /// One width per bin, in storage order.
    PerBin(Vec<D>),
}

/// A table of data columns attached to time bins.
///
/// Bins are not required to be sorted, contiguous or disjoint, but every
/// bin must have a strictly positive width.
///
/// # Examples
///
/// ```
/// use qtty::Days;
/// use tempoch_series::{BinnedTimeSeries, Column, ModifiedJulianDate};
///
/// let bins = BinnedTimeSeries::regular(
///     ModifiedJulianDate::new(59000.0),
///     Days::new(0.5),
///     3,
///     vec![Column::new("flux", vec![1.0, 4.0, 3.0])],
/// )
/// .unwrap();
///
/// assert_eq!(bins.end(2), Some(ModifiedJulianDate::new(59001.5)));
/// assert_eq!(bins.center(0), Some(ModifiedJulianDate::new(59000.25)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedTimeSeries<T: TimeInstant> {
    start: Vec<T>,
    size: BinSizes<T::Duration>,
    table: Table,
    index: SortedIndex,
}

fn check_positive<D: TimeSpan>(size: &D) -> Result<()> {
    if size.is_positive() {
        Ok(())
    } else {
        Err(SeriesError::InvalidBinSize(format!("{size:?}")))
    }
}

impl<T: TimeInstant> BinnedTimeSeries<T> {
    /// Build bins from explicit starts and a uniform or per-bin size.
    pub fn new(start: Vec<T>, size: BinSizes<T::Duration>, columns: Vec<Column>) -> Result<Self> {
        match &size {
            BinSizes::Uniform(d) => check_positive(d)?,
            BinSizes::PerBin(sizes) => {
                if sizes.len() != start.len() {
                    return Err(SeriesError::ShapeMismatch {
                        column: "time_bin_size".into(),
                        expected: start.len(),
                        actual: sizes.len(),
                    });
                }
                sizes.iter().try_for_each(check_positive)?;
            }
        }
        let table = Table::from_columns(start.len(), columns)?;
        Ok(Self::from_parts(start, size, table))
    }

    /// `n_bins` contiguous bins of equal width starting at `start`.
    pub fn regular(
        start: T,
        size: T::Duration,
        n_bins: usize,
        columns: Vec<Column>,
    ) -> Result<Self> {
        check_positive(&size)?;
        let starts = (0..n_bins)
            .map(|k| start.add_duration(size.mul_f64(k as f64)))
            .collect();
        Self::new(starts, BinSizes::Uniform(size), columns)
    }

    /// Contiguous bins of varying width: bin `k` starts where bin `k - 1`
    /// ends, the first one at `start`.
    pub fn contiguous_from_sizes(
        start: T,
        sizes: Vec<T::Duration>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let mut starts = Vec::with_capacity(sizes.len());
        let mut offset = T::Duration::zero();
        for size in &sizes {
            starts.push(start.add_duration(offset));
            offset = offset + *size;
        }
        Self::new(starts, BinSizes::PerBin(sizes), columns)
    }

    /// Contiguous bins of varying width: each bin ends at the next start,
    /// the last one at `end`.
    pub fn contiguous(start: Vec<T>, end: T, columns: Vec<Column>) -> Result<Self> {
        let sizes = start
            .iter()
            .enumerate()
            .map(|(i, s)| start.get(i + 1).unwrap_or(&end).difference(s))
            .collect();
        Self::new(start, BinSizes::PerBin(sizes), columns)
    }

    /// Arbitrary bins given by their start and end times.
    pub fn from_starts_and_ends(start: Vec<T>, end: Vec<T>, columns: Vec<Column>) -> Result<Self> {
        if end.len() != start.len() {
            return Err(SeriesError::ShapeMismatch {
                column: "time_bin_end".into(),
                expected: start.len(),
                actual: end.len(),
            });
        }
        let sizes = start.iter().zip(&end).map(|(s, e)| e.difference(s)).collect();
        Self::new(start, BinSizes::PerBin(sizes), columns)
    }

    pub(crate) fn from_parts(start: Vec<T>, size: BinSizes<T::Duration>, table: Table) -> Self {
        let index = SortedIndex::build(&start);
        Self {
            start,
            size,
            table,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// Bin start times in storage order.
    pub fn starts(&self) -> &[T] {
        &self.start
    }

    pub fn bin_sizes(&self) -> &BinSizes<T::Duration> {
        &self.size
    }

    /// Width of bin `i`.
    pub fn size(&self, i: usize) -> Option<T::Duration> {
        if i >= self.len() {
            return None;
        }
        match &self.size {
            BinSizes::Uniform(d) => Some(*d),
            BinSizes::PerBin(sizes) => sizes.get(i).copied(),
        }
    }

    /// Width of every bin, in storage order.
    pub fn sizes(&self) -> Vec<T::Duration> {
        match &self.size {
            BinSizes::Uniform(d) => vec![*d; self.len()],
            BinSizes::PerBin(sizes) => sizes.clone(),
        }
    }

    /// `start(i) + size(i) / 2`.
    pub fn center(&self, i: usize) -> Option<T> {
        self.bin(i).map(|b| b.center())
    }

    /// `start(i) + size(i)`.
    pub fn end(&self, i: usize) -> Option<T> {
        self.bin(i).map(|b| b.end)
    }

    pub fn centers(&self) -> Vec<T> {
        (0..self.len()).filter_map(|i| self.center(i)).collect()
    }

    pub fn ends(&self) -> Vec<T> {
        (0..self.len()).filter_map(|i| self.end(i)).collect()
    }

    /// Bin `i` as a half-open interval.
    pub fn bin(&self, i: usize) -> Option<Interval<T>> {
        let start = *self.start.get(i)?;
        Some(Interval::from_duration(start, self.size(i)?))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.column(name)
    }

    pub fn index(&self) -> &SortedIndex {
        &self.index
    }

    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.table.add_column(column)
    }

    pub fn replace_column(&mut self, column: Column) -> Result<Column> {
        self.table.replace_column(column)
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        self.table.remove_column(name)
    }

    /// Bin at sorted position `pos` (sorted by start time).
    pub fn iloc(&self, pos: isize) -> Result<Row<'_, Interval<T>>> {
        let row = self.resolver()?.position(pos)?;
        let bin = Interval::from_duration(self.start[row], self.sizes_at(row));
        Ok(Row::new(bin, row, &self.table))
    }

    /// Bins whose interval contains `t`, sorted by start time.
    pub fn containing(&self, t: &T) -> Result<Self> {
        // Only bins starting at or before `t` can contain it.
        let candidates = self.resolver()?.between(None, Some(t));
        let rows: Vec<usize> = candidates
            .into_iter()
            .filter(|&r| Interval::from_duration(self.start[r], self.sizes_at(r)).contains(t))
            .collect();
        Ok(self.take_rows(&rows))
    }

    /// Bins sharing a non-empty span with `interval`, sorted by start time.
    pub fn overlapping(&self, interval: &Interval<T>) -> Result<Self> {
        let candidates = self.resolver()?.range(..interval.end);
        let rows: Vec<usize> = candidates
            .into_iter()
            .filter(|&r| {
                Interval::from_duration(self.start[r], self.sizes_at(r))
                    .intersection(interval)
                    .is_some()
            })
            .collect();
        Ok(self.take_rows(&rows))
    }

    fn sizes_at(&self, row: usize) -> T::Duration {
        match &self.size {
            BinSizes::Uniform(d) => *d,
            BinSizes::PerBin(sizes) => sizes[row],
        }
    }
}

impl<T: TimeInstant> TimeIndexed for BinnedTimeSeries<T> {
    type Instant = T;

    fn time_axis(&self) -> &[T] {
        &self.start
    }

    fn sorted_index(&self) -> &SortedIndex {
        &self.index
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        let start = rows.iter().map(|&r| self.start[r]).collect();
        let size = match &self.size {
            BinSizes::Uniform(d) => BinSizes::Uniform(*d),
            BinSizes::PerBin(sizes) => BinSizes::PerBin(rows.iter().map(|&r| sizes[r]).collect()),
        };
        Self::from_parts(start, size, self.table.take(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Time, MJD};
    use qtty::Days;

    fn t(v: f64) -> Time<MJD> {
        Time::<MJD>::new(v)
    }

    fn data() -> Vec<Column> {
        vec![Column::new("a", vec![1.0, 4.0, 3.0])]
    }

    #[test]
    fn test_even_contiguous() {
        let ts = BinnedTimeSeries::regular(t(10.0), Days::new(3.0), 3, data()).unwrap();
        assert_eq!(ts.starts(), &[t(10.0), t(13.0), t(16.0)]);
        assert_eq!(ts.ends(), vec![t(13.0), t(16.0), t(19.0)]);
        assert_eq!(ts.centers(), vec![t(11.5), t(14.5), t(17.5)]);
        assert_eq!(ts.size(1), Some(Days::new(3.0)));
        assert_eq!(ts.size(3), None);
    }

    #[test]
    fn test_uneven_contiguous_from_end() {
        let ts = BinnedTimeSeries::contiguous(vec![t(31.0), t(32.0), t(40.0)], t(55.0), data())
            .unwrap();
        assert_eq!(ts.ends(), vec![t(32.0), t(40.0), t(55.0)]);
        assert_eq!(
            ts.sizes(),
            vec![Days::new(1.0), Days::new(8.0), Days::new(15.0)]
        );
    }

    #[test]
    fn test_uneven_contiguous_from_sizes() {
        let sizes = vec![Days::new(1.0), Days::new(2.0), Days::new(4.0)];
        let ts = BinnedTimeSeries::contiguous_from_sizes(t(0.0), sizes, data()).unwrap();
        assert_eq!(ts.starts(), &[t(0.0), t(1.0), t(3.0)]);
        assert_eq!(ts.end(2), Some(t(7.0)));
    }

    #[test]
    fn test_uneven_non_contiguous() {
        let ts = BinnedTimeSeries::new(
            vec![t(31.0), t(38.0), t(280.0)],
            BinSizes::PerBin(vec![Days::new(5.0), Days::new(100.0), Days::new(2.0)]),
            data(),
        )
        .unwrap();
        assert_eq!(ts.ends(), vec![t(36.0), t(138.0), t(282.0)]);

        let full = BinnedTimeSeries::from_starts_and_ends(
            vec![t(31.0), t(33.0), t(40.0)],
            vec![t(32.0), t(35.0), t(41.0)],
            data(),
        )
        .unwrap();
        assert_eq!(full.ends(), vec![t(32.0), t(35.0), t(41.0)]);
    }

    #[test]
    fn test_shape_and_size_validation() {
        let err = BinnedTimeSeries::new(
            vec![t(0.0), t(1.0)],
            BinSizes::PerBin(vec![Days::new(1.0)]),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SeriesError::ShapeMismatch { expected: 2, actual: 1, .. }));

        assert!(matches!(
            BinnedTimeSeries::regular(t(0.0), Days::new(0.0), 2, Vec::new()),
            Err(SeriesError::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinnedTimeSeries::from_starts_and_ends(vec![t(2.0)], vec![t(1.0)], Vec::new()),
            Err(SeriesError::InvalidBinSize(_))
        ));
        assert!(matches!(
            BinnedTimeSeries::regular(t(0.0), Days::new(1.0), 2, data()),
            Err(SeriesError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_derived_times_follow_replaced_data() {
        let mut ts = BinnedTimeSeries::regular(t(0.0), Days::new(2.0), 3, data()).unwrap();
        ts.replace_column(Column::new("a", vec![0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(ts.center(1), Some(t(3.0)));
    }

    #[test]
    fn test_lookups_use_bin_start_order() {
        let ts = BinnedTimeSeries::new(
            vec![t(20.0), t(0.0), t(10.0)],
            BinSizes::Uniform(Days::new(10.0)),
            data(),
        )
        .unwrap();
        let first = ts.iloc(0).unwrap();
        assert_eq!(first.key(), Interval::new(t(0.0), t(10.0)));
        assert_eq!(first.get("a"), Some(4.0));

        let sel = ts.iloc_range(1..).unwrap();
        assert_eq!(sel.starts(), &[t(10.0), t(20.0)]);
        assert_eq!(sel.column("a").unwrap().values(), &[Some(3.0), Some(1.0)]);

        let exact = ts.loc(t(10.0)).unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn test_containing_respects_half_open_bins() {
        let ts = BinnedTimeSeries::new(
            vec![t(0.0), t(5.0), t(3.0)],
            BinSizes::PerBin(vec![Days::new(5.0), Days::new(5.0), Days::new(10.0)]),
            data(),
        )
        .unwrap();
        let hit = ts.containing(&t(5.0)).unwrap();
        assert_eq!(hit.starts(), &[t(3.0), t(5.0)]);

        let none = ts.containing(&t(13.0)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_overlapping_excludes_touching_bins() {
        let ts = BinnedTimeSeries::regular(t(0.0), Days::new(1.0), 3, data()).unwrap();
        let sel = ts.overlapping(&Interval::new(t(1.0), t(2.0))).unwrap();
        assert_eq!(sel.starts(), &[t(1.0)]);
        assert!(matches!(sel.bin_sizes(), BinSizes::Uniform(_)));
    }
}
