//! Semantic unit types for type-safe physical quantity handling
//!
//! This module provides newtype wrappers for the quantities that cross the
//! eruption-source API so that degrees are never fed where radians are expected,
//! and plume radii in kilometres are never compared against distances in metres.
//!
//! # Design Philosophy
//! - All types wrap `f64`; the host framework carries double-precision fields
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - `Deref` to the raw value for arithmetic-heavy kernels
//! - Explicit conversion methods between related types
//! - Serde support for configuration files
//!
//! # Usage
//! ```
//! use eruption_sim_core::core_types::units::{Degrees, Meters, Seconds};
//!
//! let lat = Degrees::new(180.0);
//! assert!((*lat.to_radians() - std::f64::consts::PI).abs() < 1e-12);
//!
//! let earth = Meters::new(6.376e6);
//! assert_eq!(*earth.to_kilometers(), 6376.0);
//!
//! let dt = Seconds::new(43200.0);
//! assert_eq!(*dt.to_days(), 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul, Neg, Sub};

/// Seconds in one calendar day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Implements the ordering, deref and raw-value conversions shared by every unit type
macro_rules! unit_common {
    ($name:ident) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                f64_total_cmp(self.0, other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in degrees (latitude/longitude as delivered by the grid)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

unit_common!(Degrees);

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl From<f64> for Degrees {
    fn from(v: f64) -> Self {
        Degrees(v)
    }
}

impl From<Degrees> for Radians {
    fn from(d: Degrees) -> Radians {
        d.to_radians()
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°", self.0)
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

unit_common!(Radians);

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Convert to degrees
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }
}

impl Sub for Radians {
    type Output = Radians;
    fn sub(self, rhs: Radians) -> Radians {
        Radians(self.0 - rhs.0)
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} rad", self.0)
    }
}

// ============================================================================
// LENGTHS
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_common!(Meters);

impl Meters {
    /// Create a new distance in meters
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Meters::new: negative distance is invalid");
        Meters(value)
    }

    /// Convert to kilometers
    #[inline]
    #[must_use]
    pub fn to_kilometers(self) -> Kilometers {
        Kilometers(self.0 / 1000.0)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

/// Distance in kilometers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(f64);

unit_common!(Kilometers);

impl Kilometers {
    /// Create a new Kilometers value.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0,
            "Kilometers::new: negative distance is invalid"
        );
        Kilometers(value)
    }

    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * 1000.0)
    }
}

impl From<Kilometers> for Meters {
    fn from(k: Kilometers) -> Meters {
        k.to_meters()
    }
}

impl From<Meters> for Kilometers {
    fn from(m: Meters) -> Kilometers {
        m.to_kilometers()
    }
}

impl Mul<f64> for Kilometers {
    type Output = Kilometers;
    fn mul(self, rhs: f64) -> Kilometers {
        Kilometers(self.0 * rhs)
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Duration in seconds (model time step)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

unit_common!(Seconds);

impl Seconds {
    /// Create a new duration in seconds
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Convert to (fractional) days
    #[inline]
    #[must_use]
    pub fn to_days(self) -> Days {
        Days(self.0 / SECONDS_PER_DAY)
    }
}

impl Add for Seconds {
    type Output = Seconds;
    fn add(self, rhs: Seconds) -> Seconds {
        Seconds(self.0 + rhs.0)
    }
}

impl Mul<f64> for Seconds {
    type Output = Seconds;
    fn mul(self, rhs: f64) -> Seconds {
        Seconds(self.0 * rhs)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} s", self.0)
    }
}

/// Signed duration in days (elapsed time since eruption onset)
///
/// Negative values are meaningful: they describe steps that end before the
/// eruption begins.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Days(f64);

unit_common!(Days);

impl Days {
    /// Create a new signed duration in days
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Days(value)
    }

    /// Convert to seconds
    #[inline]
    #[must_use]
    pub fn to_seconds(self) -> Seconds {
        Seconds(self.0 * SECONDS_PER_DAY)
    }
}

impl Neg for Days {
    type Output = Days;
    fn neg(self) -> Days {
        Days(-self.0)
    }
}

impl Add for Days {
    type Output = Days;
    fn add(self, rhs: Days) -> Days {
        Days(self.0 + rhs.0)
    }
}

impl Sub for Days {
    type Output = Days;
    fn sub(self, rhs: Days) -> Days {
        Days(self.0 - rhs.0)
    }
}

impl From<Seconds> for Days {
    fn from(s: Seconds) -> Days {
        s.to_days()
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} d", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        let d = Degrees(180.0);
        let r = d.to_radians();
        assert!((r.0 - std::f64::consts::PI).abs() < 1e-12);
        assert!((*r.to_degrees() - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_meters_kilometers_conversion() {
        let m = Meters::new(6.376e6);
        assert_eq!(m.to_kilometers(), Kilometers(6376.0));
        assert_eq!(Kilometers::new(5.0).to_meters(), Meters(5000.0));
    }

    #[test]
    #[should_panic(expected = "negative distance is invalid")]
    fn test_negative_kilometers_panics() {
        let _ = Kilometers::new(-1.0);
    }

    #[test]
    fn test_seconds_to_days() {
        let s = Seconds(SECONDS_PER_DAY * 1.5);
        assert_eq!(s.to_days(), Days(1.5));
        assert_eq!(Days(2.0).to_seconds(), Seconds(172_800.0));
    }

    #[test]
    fn test_days_are_signed() {
        let before = -Days::new(0.25);
        assert!(before < Days::default());
        assert_eq!(before + Days::new(1.0), Days::new(0.75));
    }

    #[test]
    fn test_total_ordering_with_nan() {
        let mut values = vec![Kilometers(3.0), Kilometers(f64::NAN), Kilometers(1.0)];
        values.sort();
        assert_eq!(values[0], Kilometers(1.0));
        assert!(values[2].is_nan());
    }
}
