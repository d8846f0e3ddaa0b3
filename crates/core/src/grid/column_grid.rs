//! Physics column grid
//!
//! A grid is a set of `ncols` horizontal locations, each carrying a stack of
//! `nlevs` vertical levels. Geometry is stored in degrees exactly as the host
//! delivers it; conversion to radians happens in the kernels that need it.

use super::fields::FieldLayout;
use crate::core_types::Degrees;
use crate::error::{EruptionError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Read-only view of the grid geometry a process may query at setup
pub trait GridProvider: Send + Sync {
    /// Grid name, used in log output
    fn name(&self) -> &str;

    /// Number of columns
    fn num_columns(&self) -> usize;

    /// Number of vertical levels per column
    fn num_levels(&self) -> usize;

    /// Per-column latitude in degrees (length `num_columns()`)
    fn latitudes(&self) -> &[Degrees];

    /// Per-column longitude in degrees (length `num_columns()`)
    fn longitudes(&self) -> &[Degrees];

    /// Shape of a 3D scalar field on this grid
    fn layout(&self) -> FieldLayout {
        FieldLayout::new(self.num_columns(), self.num_levels())
    }
}

/// Unstructured list of physics columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGrid {
    name: String,
    nlevs: usize,
    lat: Vec<Degrees>,
    lon: Vec<Degrees>,
}

impl ColumnGrid {
    /// Create a grid from per-column coordinates
    ///
    /// # Arguments
    ///
    /// * `name` - Grid name
    /// * `nlevs` - Levels per column
    /// * `coords` - `(lat, lon)` pairs in degrees, one per column
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidGrid`] if there are no columns, no levels,
    /// or any coordinate is not finite.
    pub fn new(name: &str, nlevs: usize, coords: &[(f64, f64)]) -> Result<Self> {
        let (lat, lon): (Vec<_>, Vec<_>) = coords
            .iter()
            .map(|&(lat, lon)| (Degrees::new(lat), Degrees::new(lon)))
            .unzip();
        Self::from_geometry(name, nlevs, lat, lon)
    }

    /// Create a grid from separate latitude and longitude arrays
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidGrid`] if the arrays differ in length, are
    /// empty, contain non-finite values, or `nlevs` is zero.
    pub fn from_geometry(
        name: &str,
        nlevs: usize,
        lat: Vec<Degrees>,
        lon: Vec<Degrees>,
    ) -> Result<Self> {
        let invalid = |message: String| EruptionError::InvalidGrid { message };

        if lat.len() != lon.len() {
            return Err(invalid(format!(
                "{} latitudes but {} longitudes",
                lat.len(),
                lon.len()
            )));
        }
        if lat.is_empty() {
            return Err(invalid("grid has no columns".to_string()));
        }
        if nlevs == 0 {
            return Err(invalid("grid has no levels".to_string()));
        }
        if let Some(col) = lat
            .iter()
            .zip(&lon)
            .position(|(la, lo)| !la.is_finite() || !lo.is_finite())
        {
            return Err(invalid(format!("column {col} has non-finite coordinates")));
        }

        debug!("Built grid '{}' with {} columns x {} levels", name, lat.len(), nlevs);

        Ok(Self {
            name: name.to_string(),
            nlevs,
            lat,
            lon,
        })
    }

    /// Regular lat/lon patch centred on a point
    ///
    /// Produces `n_lat * n_lon` columns spaced `spacing` degrees apart, ordered
    /// latitude-major. Used by drivers that need a synthetic grid around a source.
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidGrid`] if either count is zero or the
    /// spacing is not positive.
    pub fn regular_patch(
        name: &str,
        nlevs: usize,
        center: (Degrees, Degrees),
        n_lat: usize,
        n_lon: usize,
        spacing: Degrees,
    ) -> Result<Self> {
        if n_lat == 0 || n_lon == 0 {
            return Err(EruptionError::InvalidGrid {
                message: format!("patch must have at least one row and column, got {n_lat}x{n_lon}"),
            });
        }
        if spacing.is_nan() || *spacing <= 0.0 {
            return Err(EruptionError::InvalidGrid {
                message: format!("patch spacing must be positive, got {spacing}"),
            });
        }

        let half_lat = (n_lat - 1) as f64 / 2.0;
        let half_lon = (n_lon - 1) as f64 / 2.0;
        let mut lat = Vec::with_capacity(n_lat * n_lon);
        let mut lon = Vec::with_capacity(n_lat * n_lon);
        for i in 0..n_lat {
            for j in 0..n_lon {
                lat.push(Degrees::new(*center.0 + (i as f64 - half_lat) * *spacing));
                lon.push(Degrees::new(*center.1 + (j as f64 - half_lon) * *spacing));
            }
        }
        Self::from_geometry(name, nlevs, lat, lon)
    }

    /// Copy of this grid with the columns reordered by `order`
    ///
    /// `order[k]` is the source column placed at position `k`.
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidGrid`] if `order` is not a permutation of
    /// the column indices.
    pub fn permuted(&self, order: &[usize]) -> Result<Self> {
        let ncols = self.lat.len();
        let mut seen = vec![false; ncols];
        for &col in order {
            if col >= ncols || std::mem::replace(&mut seen[col], true) {
                return Err(EruptionError::InvalidGrid {
                    message: format!("column order is not a permutation of 0..{ncols}"),
                });
            }
        }
        if order.len() != ncols {
            return Err(EruptionError::InvalidGrid {
                message: format!("column order has {} entries, grid has {ncols}", order.len()),
            });
        }

        Ok(Self {
            name: self.name.clone(),
            nlevs: self.nlevs,
            lat: order.iter().map(|&c| self.lat[c]).collect(),
            lon: order.iter().map(|&c| self.lon[c]).collect(),
        })
    }
}

impl GridProvider for ColumnGrid {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_columns(&self) -> usize {
        self.lat.len()
    }

    fn num_levels(&self) -> usize {
        self.nlevs
    }

    fn latitudes(&self) -> &[Degrees] {
        &self.lat
    }

    fn longitudes(&self) -> &[Degrees] {
        &self.lon
    }
}
