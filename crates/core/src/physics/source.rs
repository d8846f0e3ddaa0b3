//! Point-source description and injected physical constants
//!
//! A volcanic source is a fixed horizontal location, a horizontal plume radius
//! and a single emission level. Everything here is immutable once constructed
//! and validated up front, so the kernels never re-check it.

use crate::core_types::{Degrees, Kilometers, Meters, TimeStamp};
use crate::error::{EruptionError, Result};
use crate::grid::GridProvider;
use serde::{Deserialize, Serialize};

/// Mount Vesuvius summit latitude (degrees)
pub const VESUVIUS_LAT: f64 = 40.8214;
/// Mount Vesuvius summit longitude (degrees)
pub const VESUVIUS_LON: f64 = 14.4260;

/// Planetary constants used by the geometry kernels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Mean planetary radius
    pub earth_radius: Meters,
}

impl PhysicalConstants {
    /// Earth radius used by the host atmosphere model (6376 km)
    pub const EARTH_RADIUS_M: f64 = 6.376e6;

    /// Planetary radius in the unit plume radii are given in
    #[must_use]
    pub fn earth_radius_km(&self) -> Kilometers {
        self.earth_radius.to_kilometers()
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            earth_radius: Meters::new(Self::EARTH_RADIUS_M),
        }
    }
}

/// Exponentially decaying emission profile
///
/// rate(d) = R₀ × exp(k × d) for d > 0 days after onset, zero before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionProfile {
    /// Peak emission magnitude R₀ at onset
    pub peak_rate: f64,
    /// Decay exponent k (per day, negative for a decaying source)
    pub decay_per_day: f64,
}

impl EmissionProfile {
    /// Peak emission magnitude of the reference eruption
    pub const DEFAULT_PEAK_RATE: f64 = 1e4;
    /// Decay exponent of the reference eruption (per day)
    pub const DEFAULT_DECAY_PER_DAY: f64 = -2.3;

    /// Create a profile, rejecting non-finite or negative peak rates
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] if `peak_rate` is negative or
    /// either value is not finite.
    pub fn new(peak_rate: f64, decay_per_day: f64) -> Result<Self> {
        if !peak_rate.is_finite() || peak_rate < 0.0 {
            return Err(EruptionError::invalid_parameter(
                "initial_emission",
                format!("must be finite and non-negative, got {peak_rate}"),
            ));
        }
        if !decay_per_day.is_finite() {
            return Err(EruptionError::invalid_parameter(
                "decay_rate",
                format!("must be finite, got {decay_per_day}"),
            ));
        }
        Ok(Self {
            peak_rate,
            decay_per_day,
        })
    }
}

impl Default for EmissionProfile {
    fn default() -> Self {
        Self {
            peak_rate: Self::DEFAULT_PEAK_RATE,
            decay_per_day: Self::DEFAULT_DECAY_PER_DAY,
        }
    }
}

/// Location, footprint and onset of a single eruption
///
/// Deserialization goes through [`SourceSpec::new`], so a decoded source is
/// validated the same way as one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SourceRecord", into = "SourceRecord")]
pub struct SourceSpec {
    latitude: Degrees,
    longitude: Degrees,
    radius: Kilometers,
    target_level: usize,
    eruption_start: TimeStamp,
}

// Unvalidated serialized form of a source
#[derive(Serialize, Deserialize)]
struct SourceRecord {
    latitude: Degrees,
    longitude: Degrees,
    radius: f64,
    target_level: usize,
    eruption_start: TimeStamp,
}

impl TryFrom<SourceRecord> for SourceSpec {
    type Error = EruptionError;

    fn try_from(record: SourceRecord) -> Result<Self> {
        SourceSpec::new(
            (record.latitude, record.longitude),
            record.radius,
            record.target_level,
            record.eruption_start,
        )
    }
}

impl From<SourceSpec> for SourceRecord {
    fn from(source: SourceSpec) -> Self {
        Self {
            latitude: source.latitude,
            longitude: source.longitude,
            radius: *source.radius,
            target_level: source.target_level,
            eruption_start: source.eruption_start,
        }
    }
}

impl SourceSpec {
    /// Create a source specification
    ///
    /// # Arguments
    ///
    /// * `location` - `(lat, lon)` of the vent in degrees
    /// * `radius` - Horizontal plume radius in kilometres, must be > 0
    /// * `target_level` - Emission level index
    /// * `eruption_start` - Onset of emission
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] if the radius is not finite
    /// and positive or the location is not finite. The level can only be
    /// range-checked against a grid, see [`SourceSpec::validate_for`].
    pub fn new(
        location: (Degrees, Degrees),
        radius: f64,
        target_level: usize,
        eruption_start: TimeStamp,
    ) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(EruptionError::invalid_parameter(
                "plume_radius",
                format!("must be finite and positive, got {radius}"),
            ));
        }
        if !location.0.is_finite() || !location.1.is_finite() {
            return Err(EruptionError::invalid_parameter(
                "volcano_location",
                format!("must be finite, got ({}, {})", location.0, location.1),
            ));
        }

        Ok(Self {
            latitude: location.0,
            longitude: location.1,
            radius: Kilometers::new(radius),
            target_level,
            eruption_start,
        })
    }

    /// Check the source against a grid before building a mask
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] if the radius is not finite
    /// and positive, or if `target_level >= grid.num_levels()`.
    pub fn validate_for(&self, grid: &dyn GridProvider) -> Result<()> {
        if !self.radius.is_finite() || *self.radius <= 0.0 {
            return Err(EruptionError::invalid_parameter(
                "plume_radius",
                format!("must be finite and positive, got {}", *self.radius),
            ));
        }
        let nlevs = grid.num_levels();
        if self.target_level >= nlevs {
            return Err(EruptionError::invalid_parameter(
                "emission_level",
                format!(
                    "level {} out of bounds for grid '{}' with {nlevs} levels",
                    self.target_level,
                    grid.name()
                ),
            ));
        }
        Ok(())
    }

    /// Vent latitude
    #[must_use]
    pub fn latitude(&self) -> Degrees {
        self.latitude
    }

    /// Vent longitude
    #[must_use]
    pub fn longitude(&self) -> Degrees {
        self.longitude
    }

    /// Horizontal plume radius
    #[must_use]
    pub fn radius(&self) -> Kilometers {
        self.radius
    }

    /// Emission level index
    #[must_use]
    pub fn target_level(&self) -> usize {
        self.target_level
    }

    /// Onset of emission
    #[must_use]
    pub fn eruption_start(&self) -> TimeStamp {
        self.eruption_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ColumnGrid;

    fn onset() -> TimeStamp {
        TimeStamp::parse("0079-10-24").unwrap()
    }

    fn vesuvius() -> (Degrees, Degrees) {
        (Degrees::new(VESUVIUS_LAT), Degrees::new(VESUVIUS_LON))
    }

    #[test]
    fn test_negative_radius_rejected() {
        let err = SourceSpec::new(vesuvius(), -1.0, 27, onset()).unwrap_err();
        assert!(matches!(
            err,
            EruptionError::InvalidParameter { ref name, .. } if name == "plume_radius"
        ));
    }

    #[test]
    fn test_zero_and_nan_radius_rejected() {
        assert!(SourceSpec::new(vesuvius(), 0.0, 27, onset()).is_err());
        assert!(SourceSpec::new(vesuvius(), f64::NAN, 27, onset()).is_err());
        assert!(SourceSpec::new(vesuvius(), f64::INFINITY, 27, onset()).is_err());
    }

    #[test]
    fn test_decoding_validates_radius() {
        let json = |radius: f64| {
            format!(
                r#"{{"latitude":40.8214,"longitude":14.426,"radius":{radius},"target_level":27,"eruption_start":"0079-10-24-00000"}}"#
            )
        };
        let err = serde_json::from_str::<SourceSpec>(&json(-1.0)).unwrap_err();
        assert!(err.to_string().contains("plume_radius"), "{err}");
        assert!(serde_json::from_str::<SourceSpec>(&json(0.0)).is_err());

        let decoded: SourceSpec = serde_json::from_str(&json(5.0)).unwrap();
        assert_eq!(decoded, SourceSpec::new(vesuvius(), 5.0, 27, onset()).unwrap());
        let encoded = serde_json::to_string(&decoded).unwrap();
        assert_eq!(serde_json::from_str::<SourceSpec>(&encoded).unwrap(), decoded);
    }

    #[test]
    fn test_level_checked_against_grid() {
        let grid = ColumnGrid::new("Physics", 72, &[(0.0, 0.0)]).unwrap();
        let ok = SourceSpec::new(vesuvius(), 5.0, 71, onset()).unwrap();
        assert!(ok.validate_for(&grid).is_ok());

        let too_high = SourceSpec::new(vesuvius(), 5.0, 72, onset()).unwrap();
        let err = too_high.validate_for(&grid).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_default_constants() {
        let constants = PhysicalConstants::default();
        assert_eq!(constants.earth_radius_km(), Kilometers::new(6376.0));

        let profile = EmissionProfile::default();
        assert_eq!(profile.peak_rate, 1e4);
        assert_eq!(profile.decay_per_day, -2.3);
    }

    #[test]
    fn test_profile_validation() {
        assert!(EmissionProfile::new(1e4, -2.3).is_ok());
        assert!(EmissionProfile::new(-1.0, -2.3).is_err());
        assert!(EmissionProfile::new(1e4, f64::NAN).is_err());
    }
}
