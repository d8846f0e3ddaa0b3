//! Step driver for column processes
//!
//! `ColumnSimulation` plays the part of the host atmosphere model: it owns the
//! grid, the clock and every field, and runs each registered process once per
//! step in registration order.

use super::clock::ModelClock;
use super::registry::FieldRegistry;
use crate::error::Result;
use crate::grid::GridProvider;
use crate::process::ColumnProcess;
use tracing::{debug, info};

/// Host-side driver running column processes on a shared grid
pub struct ColumnSimulation {
    grid: Box<dyn GridProvider>,
    clock: ModelClock,
    fields: FieldRegistry,
    processes: Vec<Box<dyn ColumnProcess>>,
}

impl ColumnSimulation {
    /// Create a simulation with no processes
    pub fn new(grid: Box<dyn GridProvider>, clock: ModelClock) -> Self {
        let fields = FieldRegistry::new(grid.layout());
        info!(
            "Column simulation on grid '{}': {} columns x {} levels, start {}, dt {}",
            grid.name(),
            grid.num_columns(),
            grid.num_levels(),
            clock.start(),
            clock.dt()
        );
        Self {
            grid,
            clock,
            fields,
            processes: Vec::new(),
        }
    }

    /// Register a process and allocate the fields it requests
    ///
    /// # Errors
    ///
    /// Returns an error if a requested field clashes with an existing one.
    pub fn add_process(&mut self, process: Box<dyn ColumnProcess>) -> Result<()> {
        for request in process.field_requests() {
            debug!(
                "{} requests '{}' [{}] as {:?}",
                process.name(),
                request.name,
                request.units,
                request.intent
            );
            self.fields.register(&request)?;
        }
        info!("Added process {}", process.name());
        self.processes.push(process);
        Ok(())
    }

    /// Run every process over the current step, then advance the clock
    ///
    /// # Errors
    ///
    /// Fails before running any process if the next step start is outside the
    /// calendar range. Otherwise stops at the first failing process; the clock
    /// is not advanced.
    pub fn step(&mut self) -> Result<()> {
        let start = self.clock.current();
        let dt = self.clock.dt();
        self.clock.next_start()?;
        for process in &mut self.processes {
            process.run(start, dt, &mut self.fields)?;
        }
        self.clock.advance()
    }

    /// Run `n` consecutive steps
    ///
    /// # Errors
    ///
    /// Stops at the first failing step.
    pub fn run_steps(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        debug!("Completed {} steps, now at {}", n, self.clock.current());
        Ok(())
    }

    /// Grid the simulation runs on
    #[must_use]
    pub fn grid(&self) -> &dyn GridProvider {
        self.grid.as_ref()
    }

    /// Model clock
    #[must_use]
    pub fn clock(&self) -> &ModelClock {
        &self.clock
    }

    /// All registered fields
    #[must_use]
    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Mutable access to the fields, for initial and boundary conditions
    pub fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    /// Names of the registered processes in run order
    #[must_use]
    pub fn process_names(&self) -> Vec<&str> {
        self.processes.iter().map(|p| p.name()).collect()
    }
}
