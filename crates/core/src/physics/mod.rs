//! Eruption source physics
//!
//! - [`source`]: vent location, plume footprint and injected constants
//! - [`emission_mask`]: one-time footprint construction from grid geometry
//! - [`ash_emission`]: per-step emission rate and density-weighted tracer update

pub mod ash_emission;
pub mod emission_mask;
pub mod source;

pub use ash_emission::{
    apply_emission, ash_emission_rate, column_tracer_mass, total_tracer_mass, validate_density,
    validate_time_step, StepReport,
};
pub use emission_mask::{build_mask, planar_distance, EmissionMask};
pub use source::{EmissionProfile, PhysicalConstants, SourceSpec, VESUVIUS_LAT, VESUVIUS_LON};
