//! Constants used throughout the tickwire feed handler.

/// Internal fixed-point price scale (six implicit decimal places)
pub const PRICE_SCALE: i64 = 1_000_000;

/// Wire fixed-point price scale (four implicit decimal places)
pub const WIRE_PRICE_SCALE: i64 = 10_000;

/// Multiplier that lifts a wire price onto the internal scale
pub const WIRE_PRICE_LIFT: i64 = PRICE_SCALE / WIRE_PRICE_SCALE;

/// Stock symbol width in bytes (space-padded ASCII)
pub const SYMBOL_LEN: usize = 8;

/// Session identifier width in bytes (space-padded ASCII)
pub const SESSION_ID_LEN: usize = 10;

/// Session-layer packet header size in bytes
pub const PACKET_HEADER_LEN: usize = 20;

/// Per-message length prefix size in bytes
pub const MESSAGE_BLOCK_LEN: usize = 2;

/// Nanoseconds per microsecond
pub const NS_PER_US: u64 = 1_000;

/// Nanoseconds per millisecond
pub const NS_PER_MS: u64 = 1_000_000;

/// Nanoseconds per second
pub const NS_PER_SEC: u64 = 1_000_000_000;

/// Default capacity of the record ring between producer and consumer
pub const DEFAULT_RING_CAPACITY: usize = 65_536;

/// Upper bound on the pending gap list before the session errors out
pub const MAX_PENDING_GAPS: usize = 1_024;
