//! Core types and utilities

pub mod time;
pub mod units;

pub use time::TimeStamp;
pub use units::*;
