//! # tickwire-itch
//!
//! NASDAQ TotalView-ITCH 5.0 message parser.
//!
//! This crate provides:
//! - Table-driven dispatch over the fixed-size ITCH message set
//! - Zero-copy field extraction: fields are read straight out of the
//!   borrowed packet buffer with big-endian readers, never through an
//!   intermediate typed copy
//! - Normalization of order-flow events into [`NormalizedRecord`]s
//! - Synthetic wire-message builders and a seeded feed generator
//!
//! ## Example
//!
//! ```rust
//! use tickwire_itch::{Parser, synthetic};
//! use tickwire_core::types::{NormalizedRecord, RecordKind, Side};
//!
//! let msg = synthetic::build_add_order(
//!     123, Side::Buy, 100, "AAPL", 1_500_000, 34_200_000_000_000,
//! );
//!
//! let mut parser = Parser::new();
//! let mut records: Vec<NormalizedRecord> = Vec::new();
//! let consumed = parser.parse_message(&msg, &mut |rec: NormalizedRecord| records.push(rec));
//!
//! assert_eq!(consumed, 36);
//! assert_eq!(records[0].kind, RecordKind::AddOrder);
//! ```
//!
//! [`NormalizedRecord`]: tickwire_core::types::NormalizedRecord

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

pub mod messages;
pub mod parser;
pub mod synthetic;

pub use messages::MessageKind;
pub use parser::{Parser, ParserStats, RecordSink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::messages::MessageKind;
    pub use crate::parser::{Parser, ParserStats, RecordSink};
}
