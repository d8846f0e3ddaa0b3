//! Time-decaying ash emission and conservative tracer update
//!
//! Each step the source emits a single scalar rate, a pure function of the days
//! elapsed since onset:
//!
//! rate(d) = 0                 for d ≤ 0
//! rate(d) = R₀ × exp(k × d)   for d > 0
//!
//! The step's mass increment Δm = dt × rate is added to every masked cell. The
//! tracer is carried as a mixing ratio q, so the increment is applied to the
//! cell mass and converted back:
//!
//! q' = (q × ρ + Δm × mask) / ρ
//!
//! which injects the same absolute mass into every masked cell whatever its air
//! density. Adding Δm to q directly would not.

use super::emission_mask::EmissionMask;
use super::source::EmissionProfile;
use crate::core_types::{Days, Seconds};
use crate::error::{EruptionError, Result};
use crate::grid::ColumnField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Emission rate `days_since_eruption` days after onset
///
/// Zero at and before onset, strictly positive and decreasing afterwards for a
/// positive peak rate and negative decay exponent.
#[must_use]
pub fn ash_emission_rate(profile: &EmissionProfile, days_since_eruption: Days) -> f64 {
    if *days_since_eruption <= 0.0 {
        return 0.0;
    }
    profile.peak_rate * (*days_since_eruption * profile.decay_per_day).exp()
}

/// Summary of one emission step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Days from onset to the end of the step
    pub elapsed: Days,
    /// Emission rate evaluated at the end of the step
    pub rate: f64,
    /// Mass added to each masked cell, dt × rate
    pub mass_increment: f64,
    /// Number of cells that received the increment
    pub injected_cells: usize,
}

impl StepReport {
    /// Total mass injected over all masked cells
    #[must_use]
    pub fn total_injected(&self) -> f64 {
        self.mass_increment * self.injected_cells as f64
    }
}

/// Check that every density value is finite and strictly positive
///
/// # Errors
///
/// Returns [`EruptionError::NonPhysicalDensity`] naming the first offending cell
/// in storage order.
pub fn validate_density(density: &ColumnField) -> Result<()> {
    let bad = density
        .as_slice()
        .par_iter()
        .position_first(|&rho| !(rho.is_finite() && rho > 0.0));

    match bad {
        None => Ok(()),
        Some(idx) => {
            let nlevs = density.nlevs();
            Err(EruptionError::NonPhysicalDensity {
                col: idx / nlevs,
                lev: idx % nlevs,
                value: density.as_slice()[idx],
            })
        }
    }
}

/// Check that a step length is finite and non-negative
///
/// # Errors
///
/// Returns [`EruptionError::InvalidParameter`] for `dt` otherwise.
pub fn validate_time_step(dt: Seconds) -> Result<()> {
    if !dt.is_finite() || *dt < 0.0 {
        return Err(EruptionError::invalid_parameter(
            "dt",
            format!("time step must be finite and non-negative, got {dt}"),
        ));
    }
    Ok(())
}

/// Add one step of emission to the tracer mixing ratio in place
///
/// # Arguments
///
/// * `mask` - Emission footprint
/// * `profile` - Emission-rate constants
/// * `elapsed` - Days from onset to the end of the step
/// * `dt` - Step length
/// * `density` - Ambient air density, read only
/// * `tracer` - Tracer mixing ratio, updated in place
///
/// # Errors
///
/// - [`EruptionError::InvalidParameter`] if `dt` is negative or not finite
/// - [`EruptionError::ShapeMismatch`] if `density` or `tracer` differ in shape from the mask
/// - [`EruptionError::NonPhysicalDensity`] if any density value is not finite and positive
///
/// The tracer is untouched when an error is returned.
pub fn apply_emission(
    mask: &EmissionMask,
    profile: &EmissionProfile,
    elapsed: Days,
    dt: Seconds,
    density: &ColumnField,
    tracer: &mut ColumnField,
) -> Result<StepReport> {
    validate_time_step(dt)?;

    let layout = mask.layout();
    layout.check_matches("ambient density", density.layout())?;
    layout.check_matches("tracer", tracer.layout())?;
    validate_density(density)?;

    let rate = ash_emission_rate(profile, elapsed);
    let mass_increment = *dt * rate;

    let nlevs = layout.nlevs;
    tracer
        .as_mut_slice()
        .par_chunks_mut(nlevs)
        .zip(density.as_slice().par_chunks(nlevs))
        .zip(mask.as_field().as_slice().par_chunks(nlevs))
        .for_each(|((q_col, rho_col), mask_col)| {
            for ((q, &rho), &m) in q_col.iter_mut().zip(rho_col).zip(mask_col) {
                let tracer_mass = *q * rho;
                *q = (tracer_mass + mass_increment * m) / rho;
            }
        });

    Ok(StepReport {
        elapsed,
        rate,
        mass_increment,
        injected_cells: mask.count(),
    })
}

/// Tracer mass per unit volume in one column, Σ q × ρ over its levels
///
/// # Panics
///
/// Panics if `col` is out of bounds for either field.
#[must_use]
pub fn column_tracer_mass(tracer: &ColumnField, density: &ColumnField, col: usize) -> f64 {
    tracer
        .column(col)
        .iter()
        .zip(density.column(col))
        .map(|(q, rho)| q * rho)
        .sum()
}

/// Tracer mass summed over all cells, Σ q × ρ
///
/// # Errors
///
/// Returns [`EruptionError::ShapeMismatch`] if the fields differ in shape.
pub fn total_tracer_mass(tracer: &ColumnField, density: &ColumnField) -> Result<f64> {
    tracer
        .layout()
        .check_matches("ambient density", density.layout())?;
    Ok(tracer
        .as_slice()
        .par_iter()
        .zip(density.as_slice().par_iter())
        .map(|(q, rho)| q * rho)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Degrees, TimeStamp};
    use crate::grid::{ColumnGrid, FieldLayout};
    use crate::physics::emission_mask::build_mask;
    use crate::physics::source::{PhysicalConstants, SourceSpec};
    use approx::assert_relative_eq;

    fn two_column_mask(nlevs: usize, level: usize) -> EmissionMask {
        let grid = ColumnGrid::new("Physics", nlevs, &[(40.8214, 14.4260), (0.0, 0.0)]).unwrap();
        let spec = SourceSpec::new(
            (Degrees::new(40.8214), Degrees::new(14.4260)),
            5.0,
            level,
            TimeStamp::parse("2000-01-01").unwrap(),
        )
        .unwrap();
        build_mask(&grid, &spec, &PhysicalConstants::default()).unwrap()
    }

    fn density(layout: FieldLayout) -> ColumnField {
        let values = (0..layout.num_cells()).map(|i| 0.2 + 0.05 * i as f64).collect();
        ColumnField::from_vec(layout, values).unwrap()
    }

    #[test]
    fn test_rate_reference_values() {
        let profile = EmissionProfile::default();
        assert_relative_eq!(
            ash_emission_rate(&profile, Days::new(1.0)),
            1002.588437228037,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            ash_emission_rate(&profile, Days::new(10.0)),
            1.026187963170189e-6,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_rate_zero_before_and_at_onset() {
        let profile = EmissionProfile::default();
        for d in [0.0, -1e-9, -0.5, -365.0] {
            assert_eq!(ash_emission_rate(&profile, Days::new(d)), 0.0);
        }
    }

    #[test]
    fn test_rate_strictly_decreasing_after_onset() {
        let profile = EmissionProfile::default();
        let days = [1e-6, 0.01, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
        for pair in days.windows(2) {
            let earlier = ash_emission_rate(&profile, Days::new(pair[0]));
            let later = ash_emission_rate(&profile, Days::new(pair[1]));
            assert!(later > 0.0);
            assert!(earlier > later, "rate({}) <= rate({})", pair[0], pair[1]);
        }
        // Continuous from the right at onset
        assert_relative_eq!(
            ash_emission_rate(&profile, Days::new(1e-12)),
            profile.peak_rate,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_update_injects_same_mass_regardless_of_density() {
        let mask = two_column_mask(4, 2);
        let layout = mask.layout();
        let rho = density(layout);
        let mut q = ColumnField::with_value(layout, 1e-3);
        let before = q.clone();
        let dt = Seconds::new(1800.0);

        let report = apply_emission(
            &mask,
            &EmissionProfile::default(),
            Days::new(1.0),
            dt,
            &rho,
            &mut q,
        )
        .unwrap();

        assert_relative_eq!(report.mass_increment, 1800.0 * report.rate);
        assert_eq!(report.injected_cells, 1);

        for col in 0..layout.ncols {
            for lev in 0..layout.nlevs {
                let added = (q.get(col, lev) - before.get(col, lev)) * rho.get(col, lev);
                if mask.is_emitting(col, lev) {
                    assert_relative_eq!(added, report.mass_increment, max_relative = 1e-12);
                } else {
                    assert!(added.abs() < 1e-15, "unmasked ({col},{lev}) changed by {added}");
                }
            }
        }
    }

    #[test]
    fn test_zero_dt_and_pre_onset_leave_tracer_unchanged() {
        let mask = two_column_mask(3, 0);
        let layout = mask.layout();
        let rho = density(layout);
        let original = ColumnField::with_value(layout, 0.37);

        for (elapsed, dt) in [(Days::new(1.0), 0.0), (Days::new(-2.0), 3600.0), (Days::new(0.0), 60.0)] {
            let mut q = original.clone();
            let report = apply_emission(
                &mask,
                &EmissionProfile::default(),
                elapsed,
                Seconds::new(dt),
                &rho,
                &mut q,
            )
            .unwrap();
            assert_eq!(report.mass_increment, 0.0);
            for (a, b) in q.as_slice().iter().zip(original.as_slice()) {
                assert_relative_eq!(*a, *b, max_relative = 1e-14);
            }
        }
    }

    #[test]
    fn test_shape_mismatch_rejected_without_writing() {
        let mask = two_column_mask(3, 0);
        let rho = ColumnField::with_value(FieldLayout::new(2, 4), 1.0);
        let mut q = ColumnField::with_value(mask.layout(), 0.5);
        let err = apply_emission(
            &mask,
            &EmissionProfile::default(),
            Days::new(1.0),
            Seconds::new(60.0),
            &rho,
            &mut q,
        )
        .unwrap_err();
        assert!(matches!(err, EruptionError::ShapeMismatch { ref field, .. } if field == "ambient density"));
        assert!(q.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_non_physical_density_rejected() {
        let mask = two_column_mask(3, 0);
        let mut rho = ColumnField::with_value(mask.layout(), 1.2);
        rho.set(1, 2, 0.0);
        let mut q = ColumnField::new(mask.layout());
        let err = apply_emission(
            &mask,
            &EmissionProfile::default(),
            Days::new(1.0),
            Seconds::new(60.0),
            &rho,
            &mut q,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EruptionError::NonPhysicalDensity {
                col: 1,
                lev: 2,
                value: 0.0
            }
        );

        rho.set(1, 2, f64::NAN);
        assert!(validate_density(&rho).is_err());
        rho.set(1, 2, -1.0);
        assert!(validate_density(&rho).is_err());
    }

    #[test]
    fn test_negative_dt_rejected() {
        let mask = two_column_mask(3, 0);
        let rho = ColumnField::with_value(mask.layout(), 1.2);
        let mut q = ColumnField::new(mask.layout());
        let err = apply_emission(
            &mask,
            &EmissionProfile::default(),
            Days::new(1.0),
            Seconds::new(-60.0),
            &rho,
            &mut q,
        )
        .unwrap_err();
        assert!(matches!(err, EruptionError::InvalidParameter { ref name, .. } if name == "dt"));
    }

    #[test]
    fn test_tracer_mass_diagnostics() {
        let layout = FieldLayout::new(2, 2);
        let q = ColumnField::from_vec(layout, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let rho = ColumnField::from_vec(layout, vec![0.5, 0.5, 2.0, 1.0]).unwrap();
        assert_eq!(column_tracer_mass(&q, &rho, 0), 1.5);
        assert_eq!(column_tracer_mass(&q, &rho, 1), 10.0);
        assert_eq!(total_tracer_mass(&q, &rho).unwrap(), 11.5);
        assert!(total_tracer_mass(&q, &ColumnField::new(FieldLayout::new(1, 4))).is_err());
    }
}
