// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-indexed series
//!
//! Tables of `f64` data columns whose rows are addressed by time, with
//! time-range selection, downsampling into bins and phase folding.
//!
//! # Core types
//!
//! - [`TimeSeries<T>`] — one time stamp per row.
//! - [`BinnedTimeSeries<T>`] — one half-open time bin per row.
//! - [`Series<T>`] — either of the two.
//! - [`TimeInstant`] — what a time axis is made of.  Implemented for
//!   [`Time<S>`], `chrono::DateTime<Utc>`, and the duration types
//!   `qtty::Days` and `chrono::Duration` (the axis of a folded series).
//! - [`SortedIndex`] / [`RangeResolver`] — time-ordered access to rows
//!   stored in any order.
//! - [`Interval<T>`] — a half-open `[start, end)` span; one bin.
//!
//! # Time scales
//!
//! | Marker | Scale |
//! |--------|-------|
//! | [`JD`] | Julian Date |
//! | [`MJD`] | Modified Julian Date |
//! | [`TT`] | Terrestrial Time |
//! | [`TDB`] | Barycentric Dynamical Time (taken equal to TT) |
//! | [`UnixTime`] | Unix / POSIX time, in days |
//!
//! # Selection
//!
//! Every series implements [`TimeIndexed`], which provides `loc`,
//! `loc_between`, `loc_range` and `iloc_range`.  Selections always come
//! back in time order, even when the rows are stored out of order.
//!
//! # Logging
//!
//! Downsampling and folding report what they do through the [`log`]
//! facade at `debug` level; install any logger to see it.

mod binned;
mod downsample;
mod error;
mod fold;
mod index;
pub(crate) mod instant;
mod period;
mod sampled;
pub(crate) mod scales;
mod select;
mod series;
mod table;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use binned::{BinSizes, BinnedTimeSeries};
pub use downsample::{downsample, Aggregate, Aggregator, DownsampleOptions};
pub use error::{Result, SeriesError};
pub use fold::{fold, FoldOptions, PhaseWrap};
pub use index::SortedIndex;
pub use instant::{Time, TimeInstant, TimeScale, TimeSpan};
pub use period::{Interval, Period};
pub use sampled::TimeSeries;
pub use scales::{UnixTime, JD, MJD, TDB, TT};
pub use select::{RangeResolver, TimeIndexed};
pub use series::Series;
pub use table::{Column, Row, Table, RESERVED_NAMES};

// ── Type aliases ──────────────────────────────────────────────────────────

/// Julian Date — continuous count of days since the Julian Period.
pub type JulianDate = Time<JD>;

/// Modified Julian Date — `JD − 2 400 000.5`.
pub type ModifiedJulianDate = Time<MJD>;
