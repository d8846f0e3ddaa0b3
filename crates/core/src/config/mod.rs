//! Process configuration

pub mod eruption;
pub mod parameters;

pub use eruption::{EruptionConfig, DEFAULT_DENSITY_NAME, DEFAULT_TRACER_NAME};
pub use parameters::{ParamValue, ParameterList};
