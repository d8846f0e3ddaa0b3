//! Volcanic ash injection process
//!
//! Setup reads the eruption configuration and builds the emission mask once for
//! the run's grid. Each step evaluates the emission rate at the end of the step
//! and adds the resulting mass to the masked cells of the tracer.

use super::r#trait::ColumnProcess;
use crate::config::{EruptionConfig, ParameterList};
use crate::core_types::{Seconds, TimeStamp};
use crate::error::Result;
use crate::grid::{ColumnField, GridProvider};
use crate::physics::{apply_emission, build_mask, validate_time_step, EmissionMask, StepReport};
use crate::simulation::{FieldRegistry, FieldRequest};
use tracing::{debug, info};

/// Units of the ambient density field
pub const DENSITY_UNITS: &str = "kg/m3";
/// Units of the tracer mixing ratio
pub const TRACER_UNITS: &str = "kg/kg";

/// Ash injection from a single volcanic source
#[derive(Debug, Clone)]
pub struct EruptionProcess {
    config: EruptionConfig,
    mask: EmissionMask,
    last_report: Option<StepReport>,
}

impl EruptionProcess {
    /// Name reported in logs
    pub const NAME: &'static str = "volcanic_eruption";

    /// Configure the process from a parameter list and build its mask
    ///
    /// # Errors
    ///
    /// Any configuration error from [`EruptionConfig::from_parameters`], or an
    /// out-of-range emission level for `grid`.
    pub fn setup(grid: &dyn GridProvider, params: &ParameterList) -> Result<Self> {
        let config = EruptionConfig::from_parameters(params)?;
        Self::from_config(grid, config)
    }

    /// Build the process from an already validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::EruptionError::InvalidParameter`] if the emission level
    /// is out of range for `grid`, or [`crate::EruptionError::InvalidGrid`] for
    /// inconsistent geometry.
    pub fn from_config(grid: &dyn GridProvider, config: EruptionConfig) -> Result<Self> {
        let mask = build_mask(grid, &config.source, &config.constants)?;
        info!(
            "{} set up on grid '{}': vent ({}, {}), radius {}, level {}, onset {}",
            Self::NAME,
            grid.name(),
            config.source.latitude(),
            config.source.longitude(),
            config.source.radius(),
            config.source.target_level(),
            config.source.eruption_start()
        );
        Ok(Self {
            config,
            mask,
            last_report: None,
        })
    }

    /// Add one step of emission to `tracer`
    ///
    /// The rate is evaluated at `start + dt`, the end of the step.
    ///
    /// # Errors
    ///
    /// - [`crate::EruptionError::InvalidParameter`] if `dt` is negative, not
    ///   finite, or puts the end of the step outside the calendar range
    /// - otherwise see [`apply_emission`]
    ///
    /// The tracer is untouched on error.
    pub fn step(
        &self,
        start: TimeStamp,
        dt: Seconds,
        density: &ColumnField,
        tracer: &mut ColumnField,
    ) -> Result<StepReport> {
        validate_time_step(dt)?;
        let end = start.checked_add(dt)?;
        let elapsed = end.days_from(&self.config.source.eruption_start());
        let report = apply_emission(
            &self.mask,
            &self.config.profile,
            elapsed,
            dt,
            density,
            tracer,
        )?;
        debug!(
            "{} step from {}: elapsed {}, rate {:.6e}, increment {:.6e} into {} cells",
            Self::NAME,
            start,
            report.elapsed,
            report.rate,
            report.mass_increment,
            report.injected_cells
        );
        Ok(report)
    }

    /// Validated configuration
    #[must_use]
    pub fn config(&self) -> &EruptionConfig {
        &self.config
    }

    /// Emission footprint built at setup
    #[must_use]
    pub fn mask(&self) -> &EmissionMask {
        &self.mask
    }

    /// Report of the most recent successful step
    #[must_use]
    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }
}

impl ColumnProcess for EruptionProcess {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn field_requests(&self) -> Vec<FieldRequest> {
        vec![
            FieldRequest::input(&self.config.density_name, DENSITY_UNITS),
            FieldRequest::updated(&self.config.tracer_name, TRACER_UNITS),
        ]
    }

    fn run(&mut self, start: TimeStamp, dt: Seconds, fields: &mut FieldRegistry) -> Result<()> {
        let (density, tracer) =
            fields.get_pair_mut(&self.config.density_name, &self.config.tracer_name)?;
        let report = self.step(start, dt, density, tracer)?;
        self.last_report = Some(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Degrees;
    use crate::grid::ColumnGrid;
    use crate::simulation::FieldIntent;
    use crate::EruptionError;
    use approx::assert_relative_eq;

    fn grid() -> ColumnGrid {
        ColumnGrid::new(
            "Physics",
            8,
            &[(40.8214, 14.4260), (40.83, 14.43), (41.5, 15.0)],
        )
        .unwrap()
    }

    fn params() -> ParameterList {
        ParameterList::new()
            .with("eruption_date", "2000-01-01-00000")
            .with("plume_radius", 5.0)
            .with("emission_level", 3_i64)
    }

    #[test]
    fn test_setup_builds_mask() {
        let process = EruptionProcess::setup(&grid(), &params()).unwrap();
        assert_eq!(process.mask().masked_columns(), &[0, 1]);
        assert_eq!(process.mask().target_level(), 3);
        assert_eq!(process.config().source.latitude(), Degrees::new(40.8214));
        assert!(process.last_report().is_none());
    }

    #[test]
    fn test_level_out_of_range_fails_setup() {
        let params = params().with("emission_level", 8_i64);
        assert!(matches!(
            EruptionProcess::setup(&grid(), &params),
            Err(EruptionError::InvalidParameter { ref name, .. }) if name == "emission_level"
        ));
    }

    #[test]
    fn test_field_requests() {
        let process = EruptionProcess::setup(&grid(), &params()).unwrap();
        let requests = process.field_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].name, "air_density");
        assert_eq!(requests[0].intent, FieldIntent::Input);
        assert_eq!(requests[1].name, "ash");
        assert_eq!(requests[1].intent, FieldIntent::Updated);
    }

    #[test]
    fn test_rate_evaluated_at_end_of_step() {
        let grid = grid();
        let process = EruptionProcess::setup(&grid, &params()).unwrap();
        let layout = grid.layout();
        let density = ColumnField::with_value(layout, 1.0);
        let mut tracer = ColumnField::new(layout);

        let start = TimeStamp::parse("2000-01-01-00000").unwrap();
        let report = process
            .step(start, Seconds::new(86_400.0), &density, &mut tracer)
            .unwrap();
        assert_relative_eq!(*report.elapsed, 1.0);
        assert_relative_eq!(report.rate, 1e4 * (-2.3_f64).exp());
        assert_relative_eq!(tracer.get(0, 3), 86_400.0 * report.rate);
        assert_eq!(tracer.get(2, 3), 0.0);
    }

    #[test]
    fn test_steps_before_onset_inject_nothing() {
        let grid = grid();
        let process = EruptionProcess::setup(&grid, &params()).unwrap();
        let density = ColumnField::with_value(grid.layout(), 1.0);
        let mut tracer = ColumnField::new(grid.layout());

        let start = TimeStamp::parse("1999-12-31-00000").unwrap();
        let report = process
            .step(start, Seconds::new(3600.0), &density, &mut tracer)
            .unwrap();
        assert_eq!(report.rate, 0.0);
        assert!(tracer.as_slice().iter().all(|&q| q == 0.0));
    }

    #[test]
    fn test_oversized_step_is_an_error_not_a_panic() {
        let grid = grid();
        let process = EruptionProcess::setup(&grid, &params()).unwrap();
        let density = ColumnField::with_value(grid.layout(), 1.0);
        let mut tracer = ColumnField::with_value(grid.layout(), 0.25);

        let start = TimeStamp::parse("2000-01-02-00000").unwrap();
        for dt in [1e15, -1.0, f64::INFINITY] {
            let err = process
                .step(start, Seconds::new(dt), &density, &mut tracer)
                .unwrap_err();
            assert!(
                matches!(err, EruptionError::InvalidParameter { ref name, .. } if name == "dt"),
                "dt = {dt} gave {err:?}"
            );
        }
        assert!(tracer.as_slice().iter().all(|&q| q == 0.25));
    }

    #[test]
    fn test_run_through_registry() {
        let grid = grid();
        let mut process = EruptionProcess::setup(&grid, &params()).unwrap();
        let mut fields = FieldRegistry::new(grid.layout());
        for request in process.field_requests() {
            fields.register(&request).unwrap();
        }
        fields.get_mut("air_density").unwrap().fill(0.5);

        let start = TimeStamp::parse("2000-01-02-00000").unwrap();
        process
            .run(start, Seconds::new(600.0), &mut fields)
            .unwrap();

        let report = *process.last_report().unwrap();
        assert_eq!(report.injected_cells, 2);
        let ash = fields.get("ash").unwrap();
        assert_relative_eq!(ash.get(1, 3) * 0.5, report.mass_increment);
    }

    #[test]
    fn test_run_fails_on_missing_field() {
        let grid = grid();
        let mut process = EruptionProcess::setup(&grid, &params()).unwrap();
        let mut fields = FieldRegistry::new(grid.layout());
        let start = TimeStamp::parse("2000-01-02-00000").unwrap();
        assert!(matches!(
            process.run(start, Seconds::new(600.0), &mut fields),
            Err(EruptionError::UnknownField { .. })
        ));
        assert!(process.last_report().is_none());
    }
}
