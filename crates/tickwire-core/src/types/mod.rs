//! Core domain types for the feed handler.

mod price;
mod quantity;
mod record;
mod side;
mod symbol;
mod timestamp;

pub use price::Price;
pub use quantity::Quantity;
pub use record::{NormalizedRecord, OrderRef, RecordKind};
pub use side::Side;
pub use symbol::StockSymbol;
pub use timestamp::Timestamp;

/// Sequence number assigned by the session layer, starting at 1
pub type SequenceNumber = u64;

/// Number of messages carried by a single session-layer packet
pub type MessageCount = u16;
