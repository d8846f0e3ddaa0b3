//! Column process trait definition
//!
//! A column process is a unit of physics the host model runs once per step.
//! It declares at setup which fields it reads and which it updates, then reads
//! and writes them through the shared [`FieldRegistry`] each step.

use crate::core_types::{Seconds, TimeStamp};
use crate::error::Result;
use crate::simulation::{FieldRegistry, FieldRequest};

/// Interface the simulation driver uses to run a physics process
pub trait ColumnProcess: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fields this process needs, with their units and intent
    ///
    /// Called once when the process is added to a simulation.
    fn field_requests(&self) -> Vec<FieldRequest>;

    /// Advance the process over one step
    ///
    /// # Arguments
    ///
    /// * `start` - Time at the start of the step
    /// * `dt` - Step length
    /// * `fields` - Registry holding every requested field
    ///
    /// # Errors
    ///
    /// Any error aborts the step; fields written by this process are left
    /// as they were before the call.
    fn run(&mut self, start: TimeStamp, dt: Seconds, fields: &mut FieldRegistry) -> Result<()>;
}
