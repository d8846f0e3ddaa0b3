//! Physics processes the simulation driver can run

pub mod eruption;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use eruption::EruptionProcess;
pub use r#trait::ColumnProcess;
