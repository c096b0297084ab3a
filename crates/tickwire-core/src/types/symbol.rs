//! Stock symbol type.

use std::fmt;

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::SYMBOL_LEN;

/// Eight bytes of ASCII, right-padded with spaces, never
/// null-terminated. Copied verbatim off the wire; trailing spaces
/// are trimmed only on access.
///
/// # Example
///
/// ```rust
/// use tickwire_core::types::StockSymbol;
///
/// let sym = StockSymbol::from_bytes(*b"AAPL    ");
/// assert_eq!(sym.trimmed(), "AAPL");
/// assert_eq!(sym.as_bytes(), b"AAPL    ");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct StockSymbol([u8; SYMBOL_LEN]);

impl StockSymbol {
    /// Create a symbol from its exact wire representation
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SYMBOL_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a symbol from a ticker string, right-padding with spaces.
    /// Tickers longer than eight bytes are truncated.
    #[must_use]
    pub fn from_ticker(ticker: &str) -> Self {
        let mut bytes = [b' '; SYMBOL_LEN];
        for (dst, src) in bytes.iter_mut().zip(ticker.bytes()) {
            *dst = src;
        }
        Self(bytes)
    }

    /// Get the raw space-padded bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SYMBOL_LEN] {
        &self.0
    }

    /// Get the ticker with trailing spaces trimmed
    #[must_use]
    pub fn trimmed(&self) -> &str {
        std::str::from_utf8(&self.0)
            .unwrap_or("")
            .trim_end_matches(' ')
    }
}

impl Default for StockSymbol {
    fn default() -> Self {
        Self([b' '; SYMBOL_LEN])
    }
}

impl From<[u8; SYMBOL_LEN]> for StockSymbol {
    fn from(bytes: [u8; SYMBOL_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for StockSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StockSymbol({:?})", self.trimmed())
    }
}

impl fmt::Display for StockSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trimmed())
    }
}
