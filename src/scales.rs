// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale markers for light-curve time stamps.
//!
//! Mission products stamp their cadences as day counts on a handful of
//! axes.  Each marker below ties one of those counts to the canonical
//! **Julian Date in TT** by a constant offset, which is all the series
//! engine needs: ordering and differences are computed inside one scale,
//! and [`Time::to`](super::instant::Time::to) moves between scales.
//!
//! | Marker | Description | Epoch (JD) |
//! |--------|-------------|------------|
//! | [`JD`] | Julian Date | 0.0 |
//! | [`MJD`] | Modified Julian Date | 2 400 000.5 |
//! | [`TT`] | Terrestrial Time (JD count) | 0.0 |
//! | [`TDB`] | Barycentric Dynamical Time (JD count, TDB ≈ TT) | 0.0 |
//! | [`UnixTime`] | Days since 1970-01-01 | 2 440 587.5 |

use super::instant::{Time, TimeScale};
use qtty::Days;

/// Declare a marker whose day count sits a constant `$epoch` days after
/// JD 0 on the TT axis.
macro_rules! offset_scale {
    ($(#[$meta:meta])* $name:ident, $label:literal, $epoch:expr) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
        pub struct $name;

        impl TimeScale for $name {
            const LABEL: &'static str = $label;

            #[inline(always)]
            fn to_jd_tt(value: Days) -> Days {
                value + Days::new($epoch)
            }

            #[inline(always)]
            fn from_jd_tt(jd_tt: Days) -> Days {
                jd_tt - Days::new($epoch)
            }
        }
    };
}

offset_scale!(
    /// Julian Date, the reference axis.
    JD, "Julian Day:", 0.0
);
offset_scale!(
    /// Modified Julian Date: `JD - 2 400 000.5`.
    MJD, "MJD", 2_400_000.5
);
offset_scale!(
    /// Terrestrial Time, counted in Julian days.
    TT, "TT", 0.0
);
offset_scale!(
    /// Barycentric Dynamical Time, counted in Julian days.
    ///
    /// Kepler and TESS light curves are stamped in TDB.  The ≈1.7 ms periodic
    /// TDB − TT term is far below any cadence and is not applied.
    TDB, "TDB", 0.0
);
offset_scale!(
    /// Days since 1970-01-01T00:00 (JD 2 440 587.5).
    UnixTime, "Unix", 2_440_587.5
);

/// `From` in both directions between every pair of listed scales.
macro_rules! scale_pairs {
    ($last:ty) => {};
    ($head:ty, $($tail:ty),+) => {
        $(
            impl From<Time<$head>> for Time<$tail> {
                fn from(t: Time<$head>) -> Self {
                    t.to()
                }
            }

            impl From<Time<$tail>> for Time<$head> {
                fn from(t: Time<$tail>) -> Self {
                    t.to()
                }
            }
        )+
        scale_pairs!($($tail),+);
    };
}

scale_pairs!(JD, MJD, TT, TDB, UnixTime);
