//! Error type shared by configuration, setup and stepping
//!
//! Every failure in this crate is fatal to the run that triggered it: nothing is
//! retried and no field is left half-written.

use crate::grid::FieldLayout;

/// Errors raised while configuring or stepping the eruption source
#[derive(Debug, Clone, PartialEq)]
pub enum EruptionError {
    /// A required configuration key is absent
    MissingParameter {
        /// Parameter key
        name: String,
    },
    /// A configuration value is present but unusable
    InvalidParameter {
        /// Parameter key
        name: String,
        /// What is wrong with it
        message: String,
    },
    /// A configuration source could not be read or decoded
    InvalidConfig {
        /// Description of the failure
        message: String,
    },
    /// A date string could not be parsed into a time stamp
    InvalidDate {
        /// The offending input
        value: String,
    },
    /// Grid geometry is inconsistent
    InvalidGrid {
        /// Description of the inconsistency
        message: String,
    },
    /// A field does not have the grid's `(ncols, nlevs)` shape
    ShapeMismatch {
        /// Field name
        field: String,
        /// Shape the field must have
        expected: FieldLayout,
        /// Shape it actually has
        actual: FieldLayout,
    },
    /// A process asked for a field the registry does not hold
    UnknownField {
        /// Field name
        name: String,
    },
    /// Ambient density is zero, negative or not finite
    NonPhysicalDensity {
        /// Column index
        col: usize,
        /// Level index
        lev: usize,
        /// Offending density value
        value: f64,
    },
}

impl EruptionError {
    /// Create error for an invalid parameter with a custom message.
    ///
    /// # Arguments
    /// * `name` - The parameter key (e.g., `"plume_radius"`, `"emission_level"`)
    /// * `message` - A description of the validation error
    pub fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Create error for a missing parameter.
    pub fn missing_parameter(name: &str) -> Self {
        Self::MissingParameter {
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for EruptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EruptionError::MissingParameter { name } => {
                write!(f, "Missing required parameter '{name}'")
            }
            EruptionError::InvalidParameter { name, message } => {
                write!(f, "Invalid parameter '{name}': {message}")
            }
            EruptionError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {message}")
            }
            EruptionError::InvalidDate { value } => {
                write!(f, "Could not parse '{value}' as a time stamp")
            }
            EruptionError::InvalidGrid { message } => write!(f, "Invalid grid: {message}"),
            EruptionError::ShapeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Field '{field}' has shape {actual}, expected {expected}"
            ),
            EruptionError::UnknownField { name } => write!(f, "Unknown field '{name}'"),
            EruptionError::NonPhysicalDensity { col, lev, value } => write!(
                f,
                "Ambient density must be finite and positive, got {value} at column {col}, level {lev}"
            ),
        }
    }
}

impl std::error::Error for EruptionError {}

/// Convenience alias for `Result<T, EruptionError>`
pub type Result<T> = std::result::Result<T, EruptionError>;
