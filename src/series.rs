// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Either kind of series behind one type.

use crate::binned::BinnedTimeSeries;
use crate::instant::TimeInstant;
use crate::sampled::TimeSeries;
use crate::table::Table;

/// A sampled or a binned series.
///
/// Both variants hold exactly one time-axis entry per table row.
#[derive(Debug, Clone, PartialEq)]
pub enum Series<T: TimeInstant> {
    Sampled(TimeSeries<T>),
    Binned(BinnedTimeSeries<T>),
}

impl<T: TimeInstant> Series<T> {
    pub fn len(&self) -> usize {
        match self {
            Series::Sampled(ts) => ts.len(),
            Series::Binned(bins) => bins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self) -> &Table {
        match self {
            Series::Sampled(ts) => ts.table(),
            Series::Binned(bins) => bins.table(),
        }
    }

    /// Sample times, or bin starts for a binned series.
    pub fn time_axis(&self) -> &[T] {
        match self {
            Series::Sampled(ts) => ts.time(),
            Series::Binned(bins) => bins.starts(),
        }
    }

    pub fn as_sampled(&self) -> Option<&TimeSeries<T>> {
        match self {
            Series::Sampled(ts) => Some(ts),
            Series::Binned(_) => None,
        }
    }

    pub fn as_binned(&self) -> Option<&BinnedTimeSeries<T>> {
        match self {
            Series::Binned(bins) => Some(bins),
            Series::Sampled(_) => None,
        }
    }
}

impl<T: TimeInstant> From<TimeSeries<T>> for Series<T> {
    fn from(ts: TimeSeries<T>) -> Self {
        Series::Sampled(ts)
    }
}

impl<T: TimeInstant> From<BinnedTimeSeries<T>> for Series<T> {
    fn from(bins: BinnedTimeSeries<T>) -> Self {
        Series::Binned(bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use crate::{Time, MJD};
    use qtty::Days;

    fn t(v: f64) -> Time<MJD> {
        Time::<MJD>::new(v)
    }

    #[test]
    fn test_both_kinds_expose_axis_and_table() {
        let sampled: Series<_> = TimeSeries::new(
            vec![t(2.0), t(1.0)],
            vec![Column::new("flux", vec![1.0, 2.0])],
        )
        .unwrap()
        .into();
        let binned: Series<_> = BinnedTimeSeries::regular(
            t(0.0),
            Days::new(1.0),
            3,
            vec![Column::new("flux", vec![1.0, 2.0, 3.0])],
        )
        .unwrap()
        .into();

        assert_eq!(sampled.len(), 2);
        assert_eq!(sampled.time_axis(), &[t(2.0), t(1.0)]);
        assert!(sampled.as_sampled().is_some());
        assert!(sampled.as_binned().is_none());

        assert_eq!(binned.len(), 3);
        assert_eq!(binned.table().len(), 3);
        assert_eq!(binned.time_axis(), &[t(0.0), t(1.0), t(2.0)]);
        assert!(binned.as_binned().is_some());
        assert!(!binned.is_empty());
    }
}
