//! Fixed-point price type.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::{PRICE_SCALE, WIRE_PRICE_LIFT};

/// Fixed-point price with six implicit decimal places.
///
/// Uses i64 internally to avoid floating-point error and keep
/// arithmetic deterministic. Wire prices carry four decimal places;
/// [`Price::from_wire`] lifts them onto the internal scale.
///
/// # Example
///
/// ```rust
/// use tickwire_core::types::Price;
///
/// // $150.0000 as transmitted (4 decimal places)
/// let price = Price::from_wire(1_500_000);
/// assert_eq!(price.raw(), 150_000_000);
/// assert_eq!(price.as_f64(), 150.0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct Price(i64);

impl Price {
    /// Zero price constant
    pub const ZERO: Self = Self(0);

    /// Create a price from a raw internal-scale value
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Lift a 4-decimal wire price onto the 6-decimal internal scale
    #[inline]
    #[must_use]
    pub const fn from_wire(wire: u32) -> Self {
        Self(wire as i64 * WIRE_PRICE_LIFT)
    }

    /// Get the raw internal-scale value
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Convert to f64 dollars
    #[inline]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Check if the price is zero
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl PartialOrd for Price {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Price {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Price {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_f64())
    }
}
