//! Nanosecond timestamp relative to local midnight.

use std::cmp::Ordering;
use std::fmt;

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::NS_PER_SEC;

/// Nanoseconds since local midnight, as carried by the wire in a
/// 6-byte big-endian field (range 0 .. 2^48 - 1).
///
/// # Example
///
/// ```rust
/// use tickwire_core::types::Timestamp;
///
/// // 09:30:00.000000000
/// let ts = Timestamp::from_nanos(34_200_000_000_000);
/// assert_eq!(ts.as_nanos(), 34_200_000_000_000);
/// assert_eq!(ts.to_string(), "09:30:00.000000000");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Midnight
    pub const MIDNIGHT: Self = Self(0);

    /// Largest value representable in the 48-bit wire field
    pub const MAX_WIRE: Self = Self((1 << 48) - 1);

    /// Create a timestamp from nanoseconds since midnight
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Create a timestamp from whole seconds since midnight
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * NS_PER_SEC)
    }

    /// Get nanoseconds since midnight
    #[inline]
    #[must_use]
    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Get whole seconds since midnight
    #[inline]
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0 / NS_PER_SEC
    }

    /// Get the nanosecond component within the current second
    #[inline]
    #[must_use]
    pub const fn subsec_nanos(self) -> u32 {
        (self.0 % NS_PER_SEC) as u32
    }

    /// Nanoseconds elapsed since an earlier timestamp
    #[inline]
    #[must_use]
    pub const fn nanos_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl PartialOrd for Timestamp {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ns)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.as_secs();
        write!(
            f,
            "{:02}:{:02}:{:02}.{:09}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            self.subsec_nanos()
        )
    }
}
