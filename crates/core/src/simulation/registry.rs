//! Named field storage shared between processes
//!
//! The registry owns every 3D field of a run. Processes declare at setup which
//! fields they read and which they update; the registry allocates them once,
//! zero-initialized, on the run's grid layout.

use crate::error::{EruptionError, Result};
use crate::grid::{ColumnField, FieldLayout};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// How a process uses a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldIntent {
    /// Read only
    Input,
    /// Read and written in place
    Updated,
}

/// A process's declaration of a field it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequest {
    /// Field name
    pub name: String,
    /// Physical units, e.g. `"kg/m3"`
    pub units: String,
    /// Read-only or updated
    pub intent: FieldIntent,
}

impl FieldRequest {
    /// Request a read-only field
    pub fn input(name: &str, units: &str) -> Self {
        Self {
            name: name.to_string(),
            units: units.to_string(),
            intent: FieldIntent::Input,
        }
    }

    /// Request a field the process updates in place
    pub fn updated(name: &str, units: &str) -> Self {
        Self {
            name: name.to_string(),
            units: units.to_string(),
            intent: FieldIntent::Updated,
        }
    }
}

#[derive(Debug, Clone)]
struct RegisteredField {
    name: String,
    units: String,
    field: ColumnField,
}

/// Owner of all fields of a run, indexed by name
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    layout: FieldLayout,
    fields: Vec<RegisteredField>,
    index: FxHashMap<String, usize>,
}

impl FieldRegistry {
    /// Create an empty registry for fields of the given shape
    #[must_use]
    pub fn new(layout: FieldLayout) -> Self {
        Self {
            layout,
            fields: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Shape every field in this registry has
    #[must_use]
    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    /// Allocate the requested field unless it already exists
    ///
    /// Several processes may request the same field; they must agree on units.
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::InvalidParameter`] if the field exists with
    /// different units.
    pub fn register(&mut self, request: &FieldRequest) -> Result<()> {
        if let Some(&idx) = self.index.get(&request.name) {
            let existing = &self.fields[idx].units;
            if *existing != request.units {
                return Err(EruptionError::invalid_parameter(
                    &request.name,
                    format!(
                        "field registered with units '{existing}', requested with '{}'",
                        request.units
                    ),
                ));
            }
            return Ok(());
        }

        self.index.insert(request.name.clone(), self.fields.len());
        self.fields.push(RegisteredField {
            name: request.name.clone(),
            units: request.units.clone(),
            field: ColumnField::new(self.layout),
        });
        Ok(())
    }

    /// Insert or replace a field with existing data
    ///
    /// Replacing keeps the field's registered units; `units` must match them.
    ///
    /// # Errors
    ///
    /// - [`EruptionError::ShapeMismatch`] if `field` does not have the
    ///   registry's layout
    /// - [`EruptionError::InvalidParameter`] if `name` is already registered
    ///   with different units
    pub fn insert(&mut self, name: &str, units: &str, field: ColumnField) -> Result<()> {
        self.layout.check_matches(name, field.layout())?;
        if let Some(&idx) = self.index.get(name) {
            let existing = &self.fields[idx].units;
            if existing != units {
                return Err(EruptionError::invalid_parameter(
                    name,
                    format!("field registered with units '{existing}', inserted with '{units}'"),
                ));
            }
        }
        let entry = RegisteredField {
            name: name.to_string(),
            units: units.to_string(),
            field,
        };
        match self.index.get(name) {
            Some(&idx) => self.fields[idx] = entry,
            None => {
                self.index.insert(name.to_string(), self.fields.len());
                self.fields.push(entry);
            }
        }
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| EruptionError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Whether a field is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Read access to a field
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::UnknownField`] if no such field is registered.
    pub fn get(&self, name: &str) -> Result<&ColumnField> {
        Ok(&self.fields[self.index_of(name)?].field)
    }

    /// Write access to a field
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::UnknownField`] if no such field is registered.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut ColumnField> {
        let idx = self.index_of(name)?;
        Ok(&mut self.fields[idx].field)
    }

    /// Units a field was registered with
    ///
    /// # Errors
    ///
    /// Returns [`EruptionError::UnknownField`] if no such field is registered.
    pub fn units(&self, name: &str) -> Result<&str> {
        Ok(&self.fields[self.index_of(name)?].units)
    }

    /// Read one field while writing another
    ///
    /// # Errors
    ///
    /// - [`EruptionError::UnknownField`] if either field is missing
    /// - [`EruptionError::InvalidParameter`] if both names are the same field
    pub fn get_pair_mut(
        &mut self,
        input: &str,
        updated: &str,
    ) -> Result<(&ColumnField, &mut ColumnField)> {
        let i = self.index_of(input)?;
        let u = self.index_of(updated)?;
        if i == u {
            return Err(EruptionError::invalid_parameter(
                updated,
                "a field cannot be both the input and the updated field of one call",
            ));
        }

        if i < u {
            let (head, tail) = self.fields.split_at_mut(u);
            Ok((&head[i].field, &mut tail[0].field))
        } else {
            let (head, tail) = self.fields.split_at_mut(i);
            Ok((&tail[0].field, &mut head[u].field))
        }
    }

    /// Registered field names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
