// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Sampled time series: one time stamp per row.

use crate::binned::BinnedTimeSeries;
use crate::downsample::{downsample, Aggregator, DownsampleOptions};
use crate::error::{Result, SeriesError};
use crate::fold::{fold, FoldOptions};
use crate::index::SortedIndex;
use crate::instant::{TimeInstant, TimeSpan};
use crate::select::TimeIndexed;
use crate::table::{Column, Row, Table};

/// A table of data columns sharing one time column.
///
/// Stored times may be unsorted and may repeat.  Every lookup goes through
/// the series' own [`SortedIndex`], which each mutating method rebuilds
/// before returning, so the index always describes the stored times.
///
/// # Examples
///
/// ```
/// use tempoch_series::{Column, ModifiedJulianDate, TimeIndexed, TimeSeries};
///
/// let times = vec![
///     ModifiedJulianDate::new(3.0),
///     ModifiedJulianDate::new(1.0),
///     ModifiedJulianDate::new(2.0),
/// ];
/// let ts = TimeSeries::new(times, vec![Column::new("flux", vec![5.0, 1.0, 4.0])]).unwrap();
///
/// let first_two = ts.iloc_range(0..2).unwrap();
/// assert_eq!(first_two.column("flux").unwrap().get(0), Some(1.0));
/// assert_eq!(first_two.column("flux").unwrap().get(1), Some(4.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T: TimeInstant> {
    time: Vec<T>,
    table: Table,
    index: SortedIndex,
}

impl<T: TimeInstant> TimeSeries<T> {
    /// Build a series from explicit time stamps and data columns.
    ///
    /// Fails with [`SeriesError::ShapeMismatch`] if any column length
    /// differs from the number of time stamps.
    pub fn new(time: Vec<T>, columns: Vec<Column>) -> Result<Self> {
        let table = Table::from_columns(time.len(), columns)?;
        Ok(Self::from_parts(time, table))
    }

    /// A series with time stamps only.
    pub fn from_times(time: Vec<T>) -> Self {
        let table = Table::new(time.len());
        Self::from_parts(time, table)
    }

    /// Regular grid: `n_samples` stamps `start, start + step, ...`.
    pub fn regular(
        start: T,
        step: T::Duration,
        n_samples: usize,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let time = (0..n_samples)
            .map(|k| start.add_duration(step.mul_f64(k as f64)))
            .collect();
        Self::new(time, columns)
    }

    /// Irregular grid: the first sample sits at `start` and sample `k`
    /// at `start + steps[0] + ... + steps[k - 1]`.
    ///
    /// One step per sample is expected; the last step is not used.
    pub fn from_steps(start: T, steps: &[T::Duration], columns: Vec<Column>) -> Result<Self> {
        let mut time = Vec::with_capacity(steps.len());
        let mut offset = T::Duration::zero();
        for step in steps {
            time.push(start.add_duration(offset));
            offset = offset + *step;
        }
        Self::new(time, columns)
    }

    pub(crate) fn from_parts(time: Vec<T>, table: Table) -> Self {
        debug_assert_eq!(time.len(), table.len());
        let index = SortedIndex::build(&time);
        Self { time, table, index }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time stamps in storage order.
    pub fn time(&self) -> &[T] {
        &self.time
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

    /// Time stamps in sorted order.
    pub fn sorted_times(&self) -> Vec<T> {
        self.index.as_slice().iter().map(|&r| self.time[r]).collect()
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

    /// Replace the time stamps, keeping row alignment.
    pub fn set_time(&mut self, time: Vec<T>) -> Result<()> {
        if time.len() != self.len() {
            return Err(SeriesError::ShapeMismatch {
                column: "time".into(),
                expected: self.len(),
                actual: time.len(),
            });
        }
        self.time = time;
        self.rebuild_index();
        Ok(())
    }

    /// Append one row; `values` follows column order.
    pub fn insert_row(&mut self, time: T, values: &[Option<f64>]) -> Result<()> {
        self.table.push_row(values)?;
        self.time.push(time);
        self.rebuild_index();
        Ok(())
    }

    /// Append every row of `other`. Columns are matched by name.
    pub fn append(&mut self, other: &TimeSeries<T>) -> Result<()> {
        self.table.extend(&other.table)?;
        self.time.extend_from_slice(&other.time);
        self.rebuild_index();
        Ok(())
    }

    /// Drop the rows at storage positions `rows`.
    pub fn remove_rows(&mut self, rows: &[usize]) -> Result<()> {
        let len = self.len();
        let mut drop = vec![false; len];
        for &row in rows {
            if row >= len {
                return Err(SeriesError::IndexOutOfRange {
                    position: row as isize,
                    len,
                });
            }
            drop[row] = true;
        }
        let keep: Vec<usize> = (0..len).filter(|&r| !drop[r]).collect();
        *self = self.take_rows(&keep);
        Ok(())
    }

    /// Reorder storage so rows are stored in time order (stable).
    pub fn sort_in_place(&mut self) {
        let order = self.index.as_slice().to_vec();
        self.time = order.iter().map(|&r| self.time[r]).collect();
        self.table = self.table.take(&order);
        self.index = SortedIndex::identity(self.time.len());
    }

    /// Row at sorted position `pos` (negative counts from the end).
    pub fn iloc(&self, pos: isize) -> Result<Row<'_, T>> {
        let row = self.resolver()?.position(pos)?;
        Ok(Row::new(self.time[row], row, &self.table))
    }

    /// Aggregate into fixed-width bins; see [`downsample`].
    pub fn downsample<A>(
        &self,
        options: &DownsampleOptions<T>,
        aggregator: &A,
    ) -> Result<BinnedTimeSeries<T>>
    where
        A: Aggregator + ?Sized,
    {
        downsample(self, options, aggregator)
    }

    /// Fold onto a period; see [`fold`].
    pub fn fold(&self, options: &FoldOptions<T>) -> Result<TimeSeries<T::Duration>>
    where
        T::Duration: TimeInstant<Duration = T::Duration>,
    {
        fold(self, options)
    }

    fn rebuild_index(&mut self) {
        self.index = SortedIndex::build(&self.time);
    }
}

impl<T: TimeInstant> TimeIndexed for TimeSeries<T> {
    type Instant = T;

    fn time_axis(&self) -> &[T] {
        &self.time
    }

    fn sorted_index(&self) -> &SortedIndex {
        &self.index
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        let time = rows.iter().map(|&r| self.time[r]).collect();
        Self::from_parts(time, self.table.take(rows))
    }
}
