// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Phase folding of a sampled series.
//!
//! Every time stamp `t` is replaced by its phase: the offset `t - epoch`
//! wrapped into one period.  The folded series is indexed by that offset,
//! so its time axis is the duration type of the input axis.

use crate::error::{Result, SeriesError};
use crate::instant::{TimeInstant, TimeSpan};
use crate::sampled::TimeSeries;
use crate::select::TimeIndexed;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Range the folded phase is reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhaseWrap {
    /// `[0, period)`.
    #[default]
    Positive,
    /// `[-period/2, period/2)`; the epoch sits at the middle of the cycle.
    Centered,
}

/// Parameters for [`fold`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldOptions<T: TimeInstant> {
    pub period: T::Duration,
    /// Reference time of phase zero; the earliest sample when `None`.
    pub epoch: Option<T>,
    pub wrap: PhaseWrap,
}

impl<T: TimeInstant> FoldOptions<T> {
    pub fn new(period: T::Duration) -> Self {
        Self {
            period,
            epoch: None,
            wrap: PhaseWrap::default(),
        }
    }

    pub fn epoch(mut self, epoch: T) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn wrap(mut self, wrap: PhaseWrap) -> Self {
        self.wrap = wrap;
        self
    }
}

fn phase_of<D: TimeSpan>(offset: D, period: D, wrap: PhaseWrap) -> D {
    match wrap {
        PhaseWrap::Positive => offset.rem_span(&period),
        PhaseWrap::Centered => {
            let half = period.mul_f64(0.5);
            (offset + half).rem_span(&period) - half
        }
    }
}

/// Fold `series` onto `options.period`.
///
/// The result keeps every data column, stores its rows sorted by phase
/// (ties keep their original time order) and carries a fresh index.
///
/// Fails with [`SeriesError::InvalidPeriod`] when the period is not
/// strictly positive.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use tempoch_series::{FoldOptions, PhaseWrap, TimeSeries};
///
/// let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
/// let times = [0, 1, 3, 4, 7].map(|s| t0 + Duration::seconds(s)).to_vec();
/// let folded = TimeSeries::from_times(times)
///     .fold(&FoldOptions::new(Duration::seconds(3)).wrap(PhaseWrap::Positive))
///     .unwrap();
///
/// let phases: Vec<i64> = folded.time().iter().map(|d| d.num_seconds()).collect();
/// assert_eq!(phases, vec![0, 0, 1, 1, 1]);
/// ```
pub fn fold<T>(series: &TimeSeries<T>, options: &FoldOptions<T>) -> Result<TimeSeries<T::Duration>>
where
    T: TimeInstant,
    T::Duration: TimeInstant<Duration = T::Duration>,
{
    if !options.period.is_positive() {
        return Err(SeriesError::InvalidPeriod(format!("{:?}", options.period)));
    }
    let Some(epoch) = options.epoch.or_else(|| series.earliest()) else {
        return Ok(TimeSeries::from_parts(Vec::new(), series.table().clone()));
    };
    debug!(
        "folding {} rows on period {:?} from epoch {:?} ({:?})",
        series.len(),
        options.period,
        epoch,
        options.wrap
    );

    let phases = series
        .time()
        .iter()
        .map(|t| phase_of(t.difference(&epoch), options.period, options.wrap))
        .collect();
    let mut folded = TimeSeries::from_parts(phases, series.table().clone());
    folded.sort_in_place();
    Ok(folded)
}
