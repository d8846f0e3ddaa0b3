//! Eruption process configuration
//!
//! Required keys: `eruption_date`, `plume_radius` (km), `emission_level`.
//! Optional keys fall back to the reference eruption (Vesuvius, 79 AD profile):
//! `volcano_lat`, `volcano_lon`, `initial_emission`, `decay_rate`,
//! `earth_radius` (m), `tracer_name`, `density_name`.

use super::parameters::ParameterList;
use crate::core_types::{Degrees, Meters, TimeStamp};
use crate::error::{EruptionError, Result};
use crate::physics::{EmissionProfile, PhysicalConstants, SourceSpec, VESUVIUS_LAT, VESUVIUS_LON};
use serde::{Deserialize, Serialize};

/// Default name of the carried tracer field
pub const DEFAULT_TRACER_NAME: &str = "ash";
/// Default name of the ambient air density field
pub const DEFAULT_DENSITY_NAME: &str = "air_density";

/// Fully validated configuration of one eruption source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EruptionConfig {
    /// Vent, footprint and onset
    pub source: SourceSpec,
    /// Emission-rate constants
    pub profile: EmissionProfile,
    /// Planetary constants
    pub constants: PhysicalConstants,
    /// Name of the tracer field updated each step
    pub tracer_name: String,
    /// Name of the density field read each step
    pub density_name: String,
}

impl EruptionConfig {
    /// Read and validate the configuration from a parameter list
    ///
    /// # Errors
    ///
    /// - [`EruptionError::MissingParameter`] for an absent required key
    /// - [`EruptionError::InvalidParameter`] for a mistyped or out-of-range value
    /// - [`EruptionError::InvalidDate`] for an unparseable `eruption_date`
    pub fn from_parameters(params: &ParameterList) -> Result<Self> {
        let eruption_start = TimeStamp::parse(params.get_str("eruption_date")?)?;
        let radius = params.get_f64("plume_radius")?;
        let level = params.get_usize("emission_level")?;
        let lat = params.get_or_f64("volcano_lat", VESUVIUS_LAT)?;
        let lon = params.get_or_f64("volcano_lon", VESUVIUS_LON)?;

        let source = SourceSpec::new(
            (Degrees::new(lat), Degrees::new(lon)),
            radius,
            level,
            eruption_start,
        )?;

        let profile = EmissionProfile::new(
            params.get_or_f64("initial_emission", EmissionProfile::DEFAULT_PEAK_RATE)?,
            params.get_or_f64("decay_rate", EmissionProfile::DEFAULT_DECAY_PER_DAY)?,
        )?;

        let earth_radius =
            params.get_or_f64("earth_radius", PhysicalConstants::EARTH_RADIUS_M)?;
        if !earth_radius.is_finite() || earth_radius <= 0.0 {
            return Err(EruptionError::invalid_parameter(
                "earth_radius",
                format!("must be finite and positive, got {earth_radius}"),
            ));
        }

        Ok(Self {
            source,
            profile,
            constants: PhysicalConstants {
                earth_radius: Meters::new(earth_radius),
            },
            tracer_name: params
                .get_or_str("tracer_name", DEFAULT_TRACER_NAME)?
                .to_string(),
            density_name: params
                .get_or_str("density_name", DEFAULT_DENSITY_NAME)?
                .to_string(),
        })
    }
}
