//! # tickwire-core
//!
//! Core types and utilities for the tickwire market-data feed handler.
//!
//! This crate provides:
//! - Domain types: `Price`, `Quantity`, `OrderRef`, `StockSymbol`, `Side`, `Timestamp`
//! - The `NormalizedRecord` handed to downstream consumers
//! - Big-endian primitive readers for unaligned wire buffers
//!
//! ## Example
//!
//! ```rust
//! use tickwire_core::types::{Price, Quantity, Side, Timestamp};
//!
//! let price = Price::from_wire(1_500_000); // $150.0000 on the wire
//! assert_eq!(price.raw(), 150_000_000);    // 10^6 scale internally
//! let qty = Quantity::new(100);
//! let side = Side::Buy;
//! let ts = Timestamp::from_nanos(34_200_000_000_000);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

pub mod constants;
pub mod endian;
pub mod types;

pub use constants::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::endian;
    pub use crate::types::*;
}
