//! Normalized order-flow records handed to downstream consumers.

use std::fmt;

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

use super::{Price, Quantity, Side, StockSymbol, Timestamp};

/// Opaque order reference number assigned by the venue
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct OrderRef(u64);

impl OrderRef {
    /// Create a new order reference
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderRef {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderRef({})", self.0)
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind tag for a normalized record.
///
/// Order-flow kinds are materialized in the ring; the administrative
/// tail is counted by the parser but not emitted downstream in this
/// release.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[repr(u8)]
#[derive(Default)]
pub enum RecordKind {
    /// No kind; the zero value of an unwritten slot
    #[default]
    Unknown = 0,
    /// New unattributed order entered the book
    AddOrder = 1,
    /// New order with market-participant attribution
    AddOrderMpid = 2,
    /// Execution against a resting order
    OrderExecuted = 3,
    /// Execution at a price different from the display price
    OrderExecutedWithPrice = 4,
    /// Partial cancellation of a resting order
    OrderCancel = 5,
    /// Full removal of a resting order
    OrderDelete = 6,
    /// Atomic cancel-and-replace
    OrderReplace = 7,
    /// Match against a non-displayed order
    Trade = 8,
    /// Cross (auction) trade
    CrossTrade = 9,
    /// Previously reported trade was broken
    BrokenTrade = 10,
    /// Market-wide system event
    SystemEvent = 11,
    /// Instrument directory entry
    StockDirectory = 12,
    /// Trading halt/resume for one instrument
    StockTradingAction = 13,
    /// Reg SHO short-sale restriction update
    RegSho = 14,
    /// Market participant position update
    MarketParticipantPosition = 15,
    /// Market-wide circuit breaker level or status
    Mwcb = 16,
    /// IPO quoting period update
    IpoQuotingPeriod = 17,
    /// Limit-up/limit-down auction collar
    Luld = 18,
    /// Operational halt
    OperationalHalt = 19,
}

impl RecordKind {
    /// Whether records of this kind reach the ring
    #[inline]
    #[must_use]
    pub const fn is_order_flow(self) -> bool {
        matches!(
            self,
            RecordKind::AddOrder
                | RecordKind::AddOrderMpid
                | RecordKind::OrderExecuted
                | RecordKind::OrderExecutedWithPrice
                | RecordKind::OrderCancel
                | RecordKind::OrderDelete
                | RecordKind::OrderReplace
                | RecordKind::Trade
        )
    }
}

/// Fixed-layout record describing one decoded order-flow event.
///
/// Trivially copyable with no owned allocations so it can live in the
/// SPSC ring between the ingest thread and the consumer. Fields that
/// do not apply to a given kind are left zeroed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct NormalizedRecord {
    /// Event kind
    pub kind: RecordKind,
    /// Venue timestamp, nanoseconds since midnight
    pub timestamp: Timestamp,
    /// Order reference (original order for replaces)
    pub order_ref: OrderRef,
    /// Instrument symbol, space-padded
    pub stock: StockSymbol,
    /// Side of the order or aggressing trade
    pub side: Side,
    /// Price on the internal 10^6 scale
    pub price: Price,
    /// Displayed or cancelled share count
    pub quantity: Quantity,
    /// Executed share count (execution kinds only)
    pub executed_quantity: Quantity,
    /// Replacement order reference (replace kind only)
    pub new_order_ref: OrderRef,
}

impl NormalizedRecord {
    /// A zeroed record with the given kind
    #[must_use]
    pub fn with_kind(kind: RecordKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}
