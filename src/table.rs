// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Row-aligned named data columns.
//!
//! This is the minimal container the series types need around their time
//! axis: every column holds one optional `f64` per row (`None` marks a
//! masked value), columns keep insertion order, and rows can be gathered by
//! index to build selections.

use crate::error::{Result, SeriesError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column names owned by the time axis of a series.
pub const RESERVED_NAMES: [&str; 3] = ["time", "time_bin_start", "time_bin_size"];

/// A named column of masked `f64` values.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

impl Column {
    /// Build a fully populated column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// Build a column where `None` entries are masked.
    pub fn masked(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at storage row `row`; `None` when masked or out of range.
    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied().flatten()
    }

    /// Gather `rows` (storage positions) into a new column.
    pub(crate) fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            values: rows.iter().map(|&r| self.values[r]).collect(),
        }
    }
}

/// An ordered set of equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    rows: usize,
    columns: Vec<Column>,
}

impl Table {
    /// An empty table expecting `rows` rows per column.
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    /// Build a table from `columns`, each of which must hold `rows` values.
    pub fn from_columns(rows: usize, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new(rows);
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn check_length(&self, column: &Column) -> Result<()> {
        if column.len() != self.rows {
            return Err(SeriesError::ShapeMismatch {
                column: column.name.clone(),
                expected: self.rows,
                actual: column.len(),
            });
        }
        Ok(())
    }

    /// Append a new column at the end.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if RESERVED_NAMES.contains(&column.name()) {
            return Err(SeriesError::ReservedColumn(column.name));
        }
        if self.position(&column.name).is_some() {
            return Err(SeriesError::DuplicateColumn(column.name));
        }
        self.check_length(&column)?;
        self.columns.push(column);
        Ok(())
    }

    /// Replace the column with the same name, returning the previous one.
    pub fn replace_column(&mut self, column: Column) -> Result<Column> {
        let idx = self
            .position(&column.name)
            .ok_or_else(|| SeriesError::MissingColumn(column.name.clone()))?;
        self.check_length(&column)?;
        Ok(std::mem::replace(&mut self.columns[idx], column))
    }

    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let idx = self
            .position(name)
            .ok_or_else(|| SeriesError::MissingColumn(name.to_owned()))?;
        Ok(self.columns.remove(idx))
    }

    /// Gather `rows` (storage positions, any order, repeats allowed).
    pub(crate) fn take(&self, rows: &[usize]) -> Self {
        Self {
            rows: rows.len(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
        }
    }

    /// Push one row; `values` follows column order.
    pub(crate) fn push_row(&mut self, values: &[Option<f64>]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(SeriesError::ShapeMismatch {
                column: "row".into(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.push(*value);
        }
        self.rows += 1;
        Ok(())
    }

    /// Append every row of `other`, matching columns by name.
    ///
    /// Both tables must carry the same set of column names; nothing is
    /// modified on error.
    pub(crate) fn extend(&mut self, other: &Table) -> Result<()> {
        if other.columns.len() != self.columns.len() {
            let missing = other
                .column_names()
                .find(|n| self.position(n).is_none())
                .or_else(|| self.column_names().find(|n| other.position(n).is_none()))
                .unwrap_or_default();
            return Err(SeriesError::MissingColumn(missing.to_owned()));
        }
        let mut sources = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let src = other
                .column(&column.name)
                .ok_or_else(|| SeriesError::MissingColumn(column.name.clone()))?;
            sources.push(src);
        }
        for (column, src) in self.columns.iter_mut().zip(sources) {
            column.values.extend_from_slice(&src.values);
        }
        self.rows += other.rows;
        Ok(())
    }
}

/// A borrowed view of one row, keyed by its time (or bin).
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, K> {
    key: K,
    row: usize,
    table: &'a Table,
}

impl<'a, K: Copy> Row<'a, K> {
    pub(crate) fn new(key: K, row: usize, table: &'a Table) -> Self {
        Self { key, row, table }
    }

    /// Time stamp (sampled series) or bin interval (binned series).
    pub fn key(&self) -> K {
        self.key
    }

    /// Position of the row in storage order.
    pub fn storage_row(&self) -> usize {
        self.row
    }

    /// Value of `column` in this row; `None` if masked or unknown.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.table.column(column).and_then(|c| c.get(self.row))
    }
}
