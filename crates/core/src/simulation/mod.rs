//! Host-side simulation plumbing
//!
//! The grid, clock, field registry and step driver an eruption process runs
//! inside of.

pub mod clock;
pub mod column_simulation;
pub mod registry;

pub use clock::ModelClock;
pub use column_simulation::ColumnSimulation;
pub use registry::{FieldIntent, FieldRegistry, FieldRequest};
