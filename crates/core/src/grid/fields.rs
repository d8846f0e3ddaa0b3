//! Column field storage
//!
//! All per-cell quantities (emission mask, ambient density, tracer mixing ratio)
//! share one dense layout: `ncols` columns of `nlevs` levels, stored as a flat
//! `Vec<f64>` with each column contiguous (`col * nlevs + lev`). Keeping columns
//! contiguous lets column-parallel kernels hand each worker one chunk.

use crate::error::{EruptionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a column field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Number of columns
    pub ncols: usize,
    /// Number of vertical levels per column
    pub nlevs: usize,
}

impl FieldLayout {
    /// Create a layout of `ncols` columns by `nlevs` levels
    #[must_use]
    pub const fn new(ncols: usize, nlevs: usize) -> Self {
        Self { ncols, nlevs }
    }

    /// Total number of cells
    #[must_use]
    pub const fn num_cells(&self) -> usize {
        self.ncols * self.nlevs
    }

    /// Flat index of `(col, lev)`
    #[inline]
    #[must_use]
    pub const fn index(&self, col: usize, lev: usize) -> usize {
        col * self.nlevs + lev
    }

    /// Check that `other` has this shape
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::ShapeMismatch`] naming `field` if the shapes differ.
    pub fn check_matches(&self, field: &str, other: FieldLayout) -> Result<()> {
        if *self == other {
            Ok(())
        } else {
            Err(EruptionError::ShapeMismatch {
                field: field.to_string(),
                expected: *self,
                actual: other,
            })
        }
    }
}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} cols x {} levs)", self.ncols, self.nlevs)
    }
}

/// Dense `ncols x nlevs` field of f64 values
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnField {
    /// Field values, column-contiguous (`col * nlevs + lev`)
    data: Vec<f64>,
    layout: FieldLayout,
}

impl ColumnField {
    /// Create a new field with the given layout, initialized to zero
    #[must_use]
    pub fn new(layout: FieldLayout) -> Self {
        Self::with_value(layout, 0.0)
    }

    /// Create a new field with the given layout, initialized to a value
    ///
    /// # Arguments
    ///
    /// * `layout` - Number of columns and levels
    /// * `value` - Initial value for all cells
    #[must_use]
    pub fn with_value(layout: FieldLayout, value: f64) -> Self {
        Self {
            data: vec![value; layout.num_cells()],
            layout,
        }
    }

    /// Wrap existing column-contiguous data
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidGrid`] if `data.len()` is not
    /// `layout.num_cells()`.
    pub fn from_vec(layout: FieldLayout, data: Vec<f64>) -> Result<Self> {
        if data.len() != layout.num_cells() {
            return Err(EruptionError::InvalidGrid {
                message: format!(
                    "field data has {} values, layout {layout} needs {}",
                    data.len(),
                    layout.num_cells()
                ),
            });
        }
        Ok(Self { data, layout })
    }

    /// Field shape
    #[must_use]
    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    /// Number of columns
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.layout.ncols
    }

    /// Number of levels per column
    #[must_use]
    pub fn nlevs(&self) -> usize {
        self.layout.nlevs
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Values of one column, top level first
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of bounds
    #[must_use]
    pub fn column(&self, col: usize) -> &[f64] {
        assert!(col < self.layout.ncols, "Column out of bounds");
        let start = col * self.layout.nlevs;
        &self.data[start..start + self.layout.nlevs]
    }

    /// Get value at `(col, lev)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, col: usize, lev: usize) -> f64 {
        assert!(
            col < self.layout.ncols && lev < self.layout.nlevs,
            "Coordinates out of bounds"
        );
        self.data[self.layout.index(col, lev)]
    }

    /// Set value at `(col, lev)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, col: usize, lev: usize, value: f64) {
        assert!(
            col < self.layout.ncols && lev < self.layout.nlevs,
            "Coordinates out of bounds"
        );
        let idx = self.layout.index(col, lev);
        self.data[idx] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}
