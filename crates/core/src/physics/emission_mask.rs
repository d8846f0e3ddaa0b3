//! Static emission footprint
//!
//! The mask marks the grid cells that receive ash: every column whose centre lies
//! within the plume radius of the vent, at the emission level only. It is built
//! once at setup and never changes afterwards.
//!
//! Distances use a flat-Earth, small-angle approximation:
//!
//! d = R × √(Δφ² + Δλ²)
//!
//! with Δφ, Δλ the latitude/longitude differences in radians. Longitude is not
//! scaled by cos φ.

use super::source::{PhysicalConstants, SourceSpec};
use crate::core_types::{Kilometers, Radians};
use crate::error::{EruptionError, Result};
use crate::grid::{ColumnField, FieldLayout, GridProvider};
use rayon::prelude::*;
use tracing::{info, warn};

/// Planar angular distance between two points, scaled by the planet radius
///
/// # Arguments
///
/// * `point` - `(lat, lon)` of the column centre
/// * `source` - `(lat, lon)` of the vent
/// * `planet_radius` - Planetary radius in the unit the result should carry
#[inline]
#[must_use]
pub fn planar_distance(
    point: (Radians, Radians),
    source: (Radians, Radians),
    planet_radius: Kilometers,
) -> Kilometers {
    let delta_lat = *point.0 - *source.0;
    let delta_lon = *point.1 - *source.1;
    planet_radius * (delta_lat * delta_lat + delta_lon * delta_lon).sqrt()
}

/// Read-only 0/1 field marking the emitting cells
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionMask {
    field: ColumnField,
    target_level: usize,
    masked_columns: Vec<usize>,
}

impl EmissionMask {
    /// Mask values, 1.0 where ash is injected and 0.0 elsewhere
    #[must_use]
    pub fn as_field(&self) -> &ColumnField {
        &self.field
    }

    /// Shape of the mask
    #[must_use]
    pub fn layout(&self) -> FieldLayout {
        self.field.layout()
    }

    /// Whether `(col, lev)` belongs to the source
    #[must_use]
    pub fn is_emitting(&self, col: usize, lev: usize) -> bool {
        self.field.get(col, lev) != 0.0
    }

    /// Number of emitting cells
    #[must_use]
    pub fn count(&self) -> usize {
        self.masked_columns.len()
    }

    /// Indices of the emitting columns, ascending
    #[must_use]
    pub fn masked_columns(&self) -> &[usize] {
        &self.masked_columns
    }

    /// Level that receives the emission
    #[must_use]
    pub fn target_level(&self) -> usize {
        self.target_level
    }
}

/// Build the emission mask for `source` on `grid`
///
/// Columns are independent, so they are evaluated in parallel; the result does
/// not depend on column order.
///
/// # Errors
///
/// - [`EruptionError::InvalidParameter`] if the emission level is outside the
///   grid, or the plume or planetary radius is not finite and positive
/// - [`EruptionError::InvalidGrid`] if the grid's geometry arrays do not have one
///   entry per column
///
/// Both are reported before the mask is allocated.
pub fn build_mask(
    grid: &dyn GridProvider,
    source: &SourceSpec,
    constants: &PhysicalConstants,
) -> Result<EmissionMask> {
    source.validate_for(grid)?;
    if !constants.earth_radius.is_finite() || *constants.earth_radius <= 0.0 {
        return Err(EruptionError::invalid_parameter(
            "earth_radius",
            format!("must be finite and positive, got {}", *constants.earth_radius),
        ));
    }

    let layout = grid.layout();
    let lat = grid.latitudes();
    let lon = grid.longitudes();
    if lat.len() != layout.ncols || lon.len() != layout.ncols {
        return Err(EruptionError::InvalidGrid {
            message: format!(
                "grid '{}' reports {} columns but has {} latitudes and {} longitudes",
                grid.name(),
                layout.ncols,
                lat.len(),
                lon.len()
            ),
        });
    }

    let vent = (source.latitude().to_radians(), source.longitude().to_radians());
    let planet_radius = constants.earth_radius_km();
    let radius = source.radius();
    let level = source.target_level();

    let mut field = ColumnField::new(layout);
    field
        .as_mut_slice()
        .par_chunks_mut(layout.nlevs)
        .enumerate()
        .for_each(|(col, column)| {
            let point = (lat[col].to_radians(), lon[col].to_radians());
            if planar_distance(point, vent, planet_radius) < radius {
                column[level] = 1.0;
            }
        });

    let masked_columns: Vec<usize> = (0..layout.ncols)
        .filter(|&col| field.get(col, level) != 0.0)
        .collect();

    if masked_columns.is_empty() {
        warn!(
            "No column of grid '{}' lies within {} of ({}, {}); the source will not inject",
            grid.name(),
            radius,
            source.latitude(),
            source.longitude()
        );
    } else {
        info!(
            "Emission mask: {} of {} columns within {} at level {}",
            masked_columns.len(),
            layout.ncols,
            radius,
            level
        );
    }

    Ok(EmissionMask {
        field,
        target_level: level,
        masked_columns,
    })
}
