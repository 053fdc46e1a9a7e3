// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every series operation.

use thiserror::Error;

/// Failures raised by series construction, lookup and transforms.
///
/// Every variant is a local, deterministic condition of the call that
/// returned it; none is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// A column (or the bin-size vector) does not match the series length.
    #[error("length of '{column}' ({actual}) should match series length ({expected})")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A bin size is zero or negative, or a bin ends before it starts.
    #[error("bin size must be strictly positive, got {0}")]
    InvalidBinSize(String),

    /// The folding period is zero or negative.
    #[error("folding period must be strictly positive, got {0}")]
    InvalidPeriod(String),

    /// A positional lookup fell outside the series.
    #[error("position {position} is out of range for {len} rows")]
    IndexOutOfRange { position: isize, len: usize },

    /// The sorted index does not describe the time column it is used with.
    #[error("sorted index covers {indexed} rows but the time column has {rows}")]
    IndexStale { indexed: usize, rows: usize },

    /// No binning origin can be inferred from a series without rows.
    #[error("cannot infer a start time from an empty series")]
    EmptySeries,

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// The name belongs to the time axis and cannot hold data.
    #[error("'{0}' is reserved for the time axis")]
    ReservedColumn(String),
}

/// Crate-wide result alias.
pub type Result<T, E = SeriesError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_names_the_column() {
        let err = SeriesError::ShapeMismatch {
            column: "flux".into(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "length of 'flux' (2) should match series length (3)"
        );
    }
}
