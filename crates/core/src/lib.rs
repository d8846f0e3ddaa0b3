//! Volcanic Eruption Source Library
//!
//! A column-physics process that injects volcanic ash into an atmospheric
//! tracer field. The ash source is a fixed horizontal disc around the vent at a
//! single model level; its strength decays exponentially with the days elapsed
//! since the eruption began.
//!
//! ## Pieces
//!
//! - [`physics::build_mask`] marks the cells that receive ash
//! - [`physics::apply_emission`] adds one step of mass to the tracer, conserving mass
//!   whatever the local air density
//! - [`process::EruptionProcess`] wires both into the host step loop
//! - [`simulation::ColumnSimulation`] is a minimal host: grid, clock and field registry

// Core types and utilities
pub mod core_types;
pub mod error;

// Grid geometry and field storage
pub mod grid;

// Emission physics
pub mod physics;

// Configuration, processes and host plumbing
pub mod config;
pub mod process;
pub mod simulation;

// Re-export core types
pub use core_types::{Days, Degrees, Kilometers, Meters, Radians, Seconds, TimeStamp};
pub use error::{EruptionError, Result};

// Re-export grid and physics types
pub use grid::{ColumnField, ColumnGrid, FieldLayout, GridProvider};
pub use physics::{
    apply_emission, ash_emission_rate, build_mask, EmissionMask, EmissionProfile,
    PhysicalConstants, SourceSpec, StepReport,
};

// Re-export process and host types
pub use config::{EruptionConfig, ParamValue, ParameterList};
pub use process::{ColumnProcess, EruptionProcess};
pub use simulation::{ColumnSimulation, FieldIntent, FieldRegistry, FieldRequest, ModelClock};
