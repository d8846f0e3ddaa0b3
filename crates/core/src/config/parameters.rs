//! Key/value parameter lists
//!
//! Processes are configured from a flat map of named values, the way the host
//! atmosphere model hands each process its own parameter block. Lists can be
//! built in code or read from a JSON object.

use crate::error::{EruptionError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer (level indices, counts)
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// String (dates, names)
    Text(String),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Named configuration values for one process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterList {
    values: FxHashMap<String, ParamValue>,
}

impl ParameterList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a list from a JSON object
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidConfig`] if the text is not a JSON object
    /// of scalar values.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EruptionError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Read and decode a JSON parameter file
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidConfig`] if the file cannot be read or decoded.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| EruptionError::InvalidConfig {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&contents)
    }

    /// Set a value, returning the list for chaining
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Whether a key is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Raw value for a key
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Keys in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn required(&self, name: &str) -> Result<&ParamValue> {
        self.values
            .get(name)
            .ok_or_else(|| EruptionError::missing_parameter(name))
    }

    fn wrong_type(name: &str, expected: &str, found: &ParamValue) -> EruptionError {
        EruptionError::invalid_parameter(
            name,
            format!("expected {expected}, found {} {found}", found.type_name()),
        )
    }

    /// Required floating-point value; integers are accepted
    ///
    /// # Errors
    ///
    /// [`EruptionError::MissingParameter`] if absent,
    /// [`EruptionError::InvalidParameter`] if not numeric.
    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.required(name)? {
            ParamValue::Float(v) => Ok(*v),
            ParamValue::Int(v) => Ok(*v as f64),
            other => Err(Self::wrong_type(name, "a number", other)),
        }
    }

    /// Optional floating-point value with a default
    ///
    /// # Errors
    ///
    /// [`EruptionError::InvalidParameter`] if present but not numeric.
    pub fn get_or_f64(&self, name: &str, default: f64) -> Result<f64> {
        if self.contains(name) {
            self.get_f64(name)
        } else {
            Ok(default)
        }
    }

    /// Required non-negative integer value
    ///
    /// # Errors
    ///
    /// [`EruptionError::MissingParameter`] if absent,
    /// [`EruptionError::InvalidParameter`] if not an integer or negative.
    pub fn get_usize(&self, name: &str) -> Result<usize> {
        match self.required(name)? {
            ParamValue::Int(v) => usize::try_from(*v).map_err(|_| {
                EruptionError::invalid_parameter(name, format!("must be non-negative, got {v}"))
            }),
            other => Err(Self::wrong_type(name, "an integer", other)),
        }
    }

    /// Required string value
    ///
    /// # Errors
    ///
    /// [`EruptionError::MissingParameter`] if absent,
    /// [`EruptionError::InvalidParameter`] if not a string.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.required(name)? {
            ParamValue::Text(v) => Ok(v),
            other => Err(Self::wrong_type(name, "a string", other)),
        }
    }

    /// Optional string value with a default
    ///
    /// # Errors
    ///
    /// [`EruptionError::InvalidParameter`] if present but not a string.
    pub fn get_or_str<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str> {
        if self.contains(name) {
            self.get_str(name)
        } else {
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_of_types() {
        let params = ParameterList::from_json_str(
            r#"{"eruption_date": "0079-10-24-46800", "plume_radius": 5.0, "emission_level": 27, "verbose": true}"#,
        )
        .unwrap();

        assert_eq!(params.get_str("eruption_date").unwrap(), "0079-10-24-46800");
        assert_eq!(params.get_f64("plume_radius").unwrap(), 5.0);
        assert_eq!(params.get_usize("emission_level").unwrap(), 27);
        assert_eq!(params.get("verbose"), Some(&ParamValue::Bool(true)));
        assert_eq!(
            params.keys(),
            vec!["emission_level", "eruption_date", "plume_radius", "verbose"]
        );
    }

    #[test]
    fn test_integers_accepted_as_floats() {
        let params = ParameterList::new().with("plume_radius", 5_i64);
        assert_eq!(params.get_f64("plume_radius").unwrap(), 5.0);
    }

    #[test]
    fn test_missing_and_mistyped_values() {
        let params = ParameterList::new()
            .with("emission_level", -3_i64)
            .with("plume_radius", "wide")
            .with("eruption_date", 12.5);

        assert_eq!(
            params.get_f64("decay_rate"),
            Err(EruptionError::missing_parameter("decay_rate"))
        );
        assert!(params.get_usize("emission_level").is_err());
        let err = params.get_f64("plume_radius").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'plume_radius': expected a number, found string \"wide\""
        );
        assert!(params.get_str("eruption_date").is_err());
    }

    #[test]
    fn test_defaults_only_apply_when_absent() {
        let params = ParameterList::new().with("tracer_name", 7_i64);
        assert_eq!(params.get_or_f64("decay_rate", -2.3).unwrap(), -2.3);
        assert_eq!(params.get_or_str("density_name", "air_density").unwrap(), "air_density");
        assert!(params.get_or_str("tracer_name", "ash").is_err());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = ParameterList::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, EruptionError::InvalidConfig { .. }));
        let err = ParameterList::from_json_file("/nonexistent/eruption.json").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
