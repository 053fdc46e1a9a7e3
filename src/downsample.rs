// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Aggregation of a sampled series into fixed-width bins.
//!
//! The bin layout is fixed before any data is looked at: `n_bins`
//! contiguous half-open bins `[start + k·size, start + (k+1)·size)`.  Rows
//! are then dropped into those bins; rows before the first bin or past the
//! last one are left out.  Each data column is reduced bin by bin with a
//! caller-supplied [`Aggregator`].
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use tempoch_series::{Aggregate, Column, DownsampleOptions, TimeSeries};
//!
//! let t0 = Utc.with_ymd_and_hms(2016, 3, 22, 12, 30, 31).unwrap();
//! let ts = TimeSeries::regular(
//!     t0,
//!     Duration::seconds(3),
//!     5,
//!     vec![Column::new("flux", vec![1.0, 4.0, 5.0, 3.0, 2.0])],
//! )
//! .unwrap();
//!
//! let binned = ts
//!     .downsample(&DownsampleOptions::new(Duration::seconds(6)), &Aggregate::Mean)
//!     .unwrap();
//! assert_eq!(
//!     binned.column("flux").unwrap().values(),
//!     &[Some(2.5), Some(4.0), Some(2.0)]
//! );
//! ```

use crate::binned::{BinSizes, BinnedTimeSeries};
use crate::error::{Result, SeriesError};
use crate::instant::{TimeInstant, TimeSpan};
use crate::sampled::TimeSeries;
use crate::select::TimeIndexed;
use crate::table::{Column, Table};
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reduces the values that fell into one bin to a single value.
///
/// Masked source values are skipped before the call, so `values` holds
/// only present data, in time order.  It may be empty; returning `None`
/// marks the output cell as masked.
pub trait Aggregator {
    fn aggregate(&self, values: &[f64]) -> Option<f64>;
}

impl<F> Aggregator for F
where
    F: Fn(&[f64]) -> Option<f64>,
{
    fn aggregate(&self, values: &[f64]) -> Option<f64> {
        self(values)
    }
}

/// Built-in reductions. All of them return `None` on an empty bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Aggregate {
    Mean,
    Median,
    Min,
    Max,
    Sum,
    Count,
    First,
    Last,
}

impl Aggregator for Aggregate {
    fn aggregate(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        Some(match self {
            Aggregate::Mean => values.iter().sum::<f64>() / n,
            Aggregate::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Aggregate::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Sum => values.iter().sum(),
            Aggregate::Count => n,
            Aggregate::First => values[0],
            Aggregate::Last => values[values.len() - 1],
        })
    }
}

/// Bin layout for [`downsample`].
///
/// `start_time` defaults to the earliest sample; `n_bins` defaults to the
/// fewest bins that reach the latest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownsampleOptions<T: TimeInstant> {
    pub bin_size: T::Duration,
    pub start_time: Option<T>,
    pub n_bins: Option<usize>,
}

impl<T: TimeInstant> DownsampleOptions<T> {
    pub fn new(bin_size: T::Duration) -> Self {
        Self {
            bin_size,
            start_time: None,
            n_bins: None,
        }
    }

    pub fn start_time(mut self, start_time: T) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn n_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = Some(n_bins);
        self
    }
}

/// Fixed grid of contiguous bins.
struct BinGrid<T: TimeInstant> {
    start: T,
    size: T::Duration,
}

impl<T: TimeInstant> BinGrid<T> {
    fn edge(&self, k: usize) -> T {
        self.start.add_duration(self.size.mul_f64(k as f64))
    }

    /// Bin holding `t` among the first `limit` bins, or `None` when `t`
    /// precedes the grid or lies past bin `limit - 1`.
    ///
    /// The floored ratio is checked against the edges the output will
    /// report, so a sample lying exactly on an edge always lands in the bin
    /// that starts there.
    fn bin_of(&self, t: &T, limit: usize) -> Option<usize> {
        if t.cmp_instant(&self.start).is_lt() {
            return None;
        }
        let ratio = t.difference(&self.start).div_span(&self.size);
        // one bin of slack for rounding; the edge checks below settle it
        if !ratio.is_finite() || ratio >= limit as f64 + 1.0 {
            return None;
        }
        let mut k = (ratio.max(0.0).floor() as usize).min(limit);
        while k > 0 && self.edge(k).cmp_instant(t).is_gt() {
            k -= 1;
        }
        while k < limit && self.edge(k + 1).cmp_instant(t).is_le() {
            k += 1;
        }
        (k < limit).then_some(k)
    }
}

/// Aggregate `series` into the bins described by `options`.
///
/// Fails with [`SeriesError::InvalidBinSize`] for a non-positive bin size,
/// and with [`SeriesError::EmptySeries`] when the series has no rows and no
/// `start_time` was given.  Bins that receive no row still call the
/// aggregator, with an empty slice.
pub fn downsample<T, A>(
    series: &TimeSeries<T>,
    options: &DownsampleOptions<T>,
    aggregator: &A,
) -> Result<BinnedTimeSeries<T>>
where
    T: TimeInstant,
    A: Aggregator + ?Sized,
{
    if !options.bin_size.is_positive() {
        return Err(SeriesError::InvalidBinSize(format!(
            "{:?}",
            options.bin_size
        )));
    }
    series.index().check(series.time())?;
    let start = options
        .start_time
        .or_else(|| series.earliest())
        .ok_or(SeriesError::EmptySeries)?;
    let grid = BinGrid {
        start,
        size: options.bin_size,
    };
    let n_bins = match options.n_bins {
        Some(n) => n,
        None => series
            .index()
            .as_slice()
            .iter()
            .rev()
            .find_map(|&row| grid.bin_of(&series.time()[row], usize::MAX))
            .map_or(0, |k| k + 1),
    };
    debug!(
        "downsampling {} rows into {} bins of {:?} from {:?}",
        series.len(),
        n_bins,
        options.bin_size,
        start
    );

    let time = series.time();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_bins];
    let mut excluded = 0usize;
    for &row in series.index().as_slice() {
        match grid.bin_of(&time[row], n_bins) {
            Some(k) => members[k].push(row),
            None => excluded += 1,
        }
    }
    if excluded > 0 {
        trace!("{excluded} rows fall outside the bin grid");
    }

    let mut table = Table::new(n_bins);
    let mut buffer = Vec::new();
    for column in series.table().columns() {
        let values = members
            .iter()
            .map(|rows| {
                buffer.clear();
                buffer.extend(rows.iter().filter_map(|&r| column.get(r)));
                aggregator.aggregate(&buffer)
            })
            .collect();
        table.add_column(Column::masked(column.name(), values))?;
    }

    let starts = (0..n_bins).map(|k| grid.edge(k)).collect();
    Ok(BinnedTimeSeries::from_parts(
        starts,
        BinSizes::Uniform(options.bin_size),
        table,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Time, MJD};
    use qtty::Days;

    fn t(v: f64) -> Time<MJD> {
        Time::<MJD>::new(v)
    }

    fn series(times: &[f64], flux: &[f64]) -> TimeSeries<Time<MJD>> {
        TimeSeries::new(
            times.iter().map(|&v| t(v)).collect(),
            vec![Column::new("flux", flux.to_vec())],
        )
        .unwrap()
    }

    fn flux<T: TimeInstant>(binned: &BinnedTimeSeries<T>) -> Vec<Option<f64>> {
        binned.column("flux").unwrap().values().to_vec()
    }

    #[test]
    fn test_builtin_aggregates() {
        let v = [3.0, 1.0, 4.0, 1.5];
        assert_eq!(Aggregate::Mean.aggregate(&v), Some(2.375));
        assert_eq!(Aggregate::Median.aggregate(&v), Some(2.25));
        assert_eq!(Aggregate::Median.aggregate(&v[..3]), Some(3.0));
        assert_eq!(Aggregate::Min.aggregate(&v), Some(1.0));
        assert_eq!(Aggregate::Max.aggregate(&v), Some(4.0));
        assert_eq!(Aggregate::Sum.aggregate(&v), Some(9.5));
        assert_eq!(Aggregate::Count.aggregate(&v), Some(4.0));
        assert_eq!(Aggregate::First.aggregate(&v), Some(3.0));
        assert_eq!(Aggregate::Last.aggregate(&v), Some(1.5));
        for agg in [Aggregate::Mean, Aggregate::Count, Aggregate::Median] {
            assert_eq!(agg.aggregate(&[]), None);
        }
    }

    #[test]
    fn test_mean_over_default_layout() {
        let ts = series(&[0.0, 0.75, 1.5, 2.25, 3.0], &[1.0, 4.0, 5.0, 3.0, 2.0]);
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(1.5)), &Aggregate::Mean)
            .unwrap();
        assert_eq!(binned.len(), 3);
        assert_eq!(binned.starts(), &[t(0.0), t(1.5), t(3.0)]);
        assert_eq!(flux(&binned), vec![Some(2.5), Some(4.0), Some(2.0)]);
        assert_eq!(binned.size(2), Some(Days::new(1.5)));
    }

    #[test]
    fn test_storage_order_does_not_matter() {
        let ts = series(&[3.0, 0.75, 0.0, 2.25, 1.5], &[2.0, 4.0, 1.0, 3.0, 5.0]);
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(1.5)), &Aggregate::First)
            .unwrap();
        assert_eq!(flux(&binned), vec![Some(1.0), Some(5.0), Some(2.0)]);
    }

    #[test]
    fn test_empty_bins_are_masked() {
        let ts = series(&[0.0, 5.0], &[1.0, 2.0]);
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(2.0)), &Aggregate::Mean)
            .unwrap();
        assert_eq!(flux(&binned), vec![Some(1.0), None, Some(2.0)]);
    }

    #[test]
    fn test_explicit_layout_excludes_rows_outside() {
        let ts = series(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[1.0; 6]);
        let opts = DownsampleOptions::new(Days::new(2.0))
            .start_time(t(1.0))
            .n_bins(2);
        let binned = ts.downsample(&opts, &Aggregate::Count).unwrap();
        assert_eq!(binned.len(), 2);
        // row at 0 precedes the grid, row at 5 is past its end
        assert_eq!(flux(&binned), vec![Some(2.0), Some(2.0)]);
    }

    #[test]
    fn test_more_bins_than_data() {
        let ts = series(&[0.0], &[7.0]);
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(1.0)).n_bins(4), &Aggregate::Sum)
            .unwrap();
        assert_eq!(flux(&binned), vec![Some(7.0), None, None, None]);
    }

    #[test]
    fn test_empty_series_with_start() {
        let ts = series(&[], &[]);
        let opts = DownsampleOptions::new(Days::new(1.0)).start_time(t(0.0)).n_bins(3);
        let binned = ts.downsample(&opts, &Aggregate::Mean).unwrap();
        assert_eq!(binned.len(), 3);
        assert_eq!(flux(&binned), vec![None, None, None]);
    }

    #[test]
    fn test_empty_series_without_start_fails() {
        let ts = series(&[], &[]);
        assert_eq!(
            ts.downsample(&DownsampleOptions::new(Days::new(1.0)), &Aggregate::Mean),
            Err(SeriesError::EmptySeries)
        );
    }

    #[test]
    fn test_non_positive_bin_size_fails() {
        let ts = series(&[0.0], &[1.0]);
        for size in [0.0, -1.0] {
            assert!(matches!(
                ts.downsample(&DownsampleOptions::new(Days::new(size)), &Aggregate::Mean),
                Err(SeriesError::InvalidBinSize(_))
            ));
        }
    }

    #[test]
    fn test_closures_see_every_bin() {
        let ts = series(&[0.0, 2.0], &[1.0, 2.0]);
        let calls = std::cell::Cell::new(0);
        let counting = |values: &[f64]| {
            calls.set(calls.get() + 1);
            Some(values.len() as f64)
        };
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(1.0)), &counting)
            .unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(flux(&binned), vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_masked_values_are_skipped() {
        let ts = TimeSeries::new(
            vec![t(0.0), t(0.5)],
            vec![Column::masked("flux", vec![None, Some(3.0)])],
        )
        .unwrap();
        let binned = ts
            .downsample(&DownsampleOptions::new(Days::new(1.0)), &Aggregate::Count)
            .unwrap();
        assert_eq!(flux(&binned), vec![Some(1.0)]);
    }

    #[test]
    fn test_far_rows_outside_sub_millisecond_grid_are_skipped() {
        use chrono::{Duration, TimeZone, Utc};

        let start = Utc.with_ymd_and_hms(1700, 1, 1, 0, 0, 0).unwrap();
        let far = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let ts = TimeSeries::new(
            vec![far, start + Duration::microseconds(600), start],
            vec![Column::new("flux", vec![9.0, 2.0, 1.0])],
        )
        .unwrap();
        let binned = ts
            .downsample(
                &DownsampleOptions::new(Duration::microseconds(500))
                    .start_time(start)
                    .n_bins(4),
                &Aggregate::Count,
            )
            .unwrap();
        assert_eq!(binned.len(), 4);
        assert_eq!(flux(&binned), vec![Some(1.0), Some(1.0), None, None]);
    }

    #[test]
    fn test_nan_time_is_left_out_of_the_grid() {
        let ts = series(&[0.0, f64::NAN, 1.5], &[1.0, 2.0, 3.0]);
        let binned = ts
            .downsample(
                &DownsampleOptions::new(Days::new(1.0)).n_bins(2),
                &Aggregate::Sum,
            )
            .unwrap();
        assert_eq!(flux(&binned), vec![Some(1.0), Some(3.0)]);

        let sized_by_data = ts
            .downsample(&DownsampleOptions::new(Days::new(1.0)), &Aggregate::Sum)
            .unwrap();
        assert_eq!(flux(&sized_by_data), vec![Some(1.0), Some(3.0)]);
    }
}
