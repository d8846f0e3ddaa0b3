//! Model time keeping

use crate::core_types::{Seconds, TimeStamp};
use crate::error::{EruptionError, Result};

/// Run start, current step start and fixed step length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelClock {
    start: TimeStamp,
    current: TimeStamp,
    dt: Seconds,
    steps: u64,
}

impl ModelClock {
    /// Create a clock positioned at `start`
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] unless `dt` is finite and positive.
    pub fn new(start: TimeStamp, dt: Seconds) -> Result<Self> {
        if !dt.is_finite() || *dt <= 0.0 {
            return Err(EruptionError::invalid_parameter(
                "dt",
                format!("time step must be finite and positive, got {}", *dt),
            ));
        }
        Ok(Self {
            start,
            current: start,
            dt,
            steps: 0,
        })
    }

    /// Time the run began
    #[must_use]
    pub fn start(&self) -> TimeStamp {
        self.start
    }

    /// Start of the step about to run
    #[must_use]
    pub fn current(&self) -> TimeStamp {
        self.current
    }

    /// Step length
    #[must_use]
    pub fn dt(&self) -> Seconds {
        self.dt
    }

    /// Number of completed steps
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Start of the step after the current one
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] if it lies outside the
    /// calendar range.
    pub fn next_start(&self) -> Result<TimeStamp> {
        self.start.checked_add(self.dt * (self.steps + 1) as f64)
    }

    /// Move to the start of the next step
    ///
    /// # Errors
    ///
    /// See [`ModelClock::next_start`]; the clock is unchanged on error.
    pub fn advance(&mut self) -> Result<()> {
        self.current = self.next_start()?;
        self.steps += 1;
        Ok(())
    }
}
