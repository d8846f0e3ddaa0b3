//! Grid geometry and per-cell field storage

pub mod column_grid;
pub mod fields;

// Re-export main types
pub use column_grid::{ColumnGrid, GridProvider};
pub use fields::{ColumnField, FieldLayout};
