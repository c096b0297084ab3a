//! ITCH 5.0 message kinds and their fixed wire sizes.
//!
//! Every message starts with a one-byte ASCII kind code and has an
//! exact, kind-determined total size. All multibyte integers are
//! big-endian and the fields are packed with no padding. The common
//! prefix is kind(1) + stock locate(2) + tracking number(2) +
//! timestamp(6).

/// Message kind, identified by the first byte of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// 'S' — market-wide system event
    SystemEvent = b'S',
    /// 'R' — instrument directory entry
    StockDirectory = b'R',
    /// 'H' — trading halt/resume for one instrument
    StockTradingAction = b'H',
    /// 'Y' — Reg SHO short-sale restriction
    RegShoRestriction = b'Y',
    /// 'L' — market participant position
    MarketParticipantPosition = b'L',
    /// 'V' — market-wide circuit breaker decline levels
    MwcbDecline = b'V',
    /// 'W' — market-wide circuit breaker status
    MwcbStatus = b'W',
    /// 'K' — IPO quoting period update
    IpoQuotingPeriod = b'K',
    /// 'J' — limit-up/limit-down auction collar
    LuldAuctionCollar = b'J',
    /// 'h' — operational halt
    OperationalHalt = b'h',
    /// 'A' — add order, no attribution
    AddOrder = b'A',
    /// 'F' — add order with MPID attribution
    AddOrderMpid = b'F',
    /// 'E' — order executed
    OrderExecuted = b'E',
    /// 'C' — order executed at a different price
    OrderExecutedWithPrice = b'C',
    /// 'X' — order partially cancelled
    OrderCancel = b'X',
    /// 'D' — order deleted
    OrderDelete = b'D',
    /// 'U' — order replaced
    OrderReplace = b'U',
    /// 'P' — trade, non-cross
    Trade = b'P',
    /// 'Q' — cross trade
    CrossTrade = b'Q',
    /// 'B' — broken trade
    BrokenTrade = b'B',
    /// 'I' — net order imbalance indicator
    Noii = b'I',
    /// 'N' — retail price improvement indicator
    Rpii = b'N',
}

impl MessageKind {
    /// Every kind in the table, for table-driven tests and tooling
    pub const ALL: [MessageKind; 22] = [
        MessageKind::SystemEvent,
        MessageKind::StockDirectory,
        MessageKind::StockTradingAction,
        MessageKind::RegShoRestriction,
        MessageKind::MarketParticipantPosition,
        MessageKind::MwcbDecline,
        MessageKind::MwcbStatus,
        MessageKind::IpoQuotingPeriod,
        MessageKind::LuldAuctionCollar,
        MessageKind::OperationalHalt,
        MessageKind::AddOrder,
        MessageKind::AddOrderMpid,
        MessageKind::OrderExecuted,
        MessageKind::OrderExecutedWithPrice,
        MessageKind::OrderCancel,
        MessageKind::OrderDelete,
        MessageKind::OrderReplace,
        MessageKind::Trade,
        MessageKind::CrossTrade,
        MessageKind::BrokenTrade,
        MessageKind::Noii,
        MessageKind::Rpii,
    ];

    /// Look up a kind by its wire code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'S' => Some(MessageKind::SystemEvent),
            b'R' => Some(MessageKind::StockDirectory),
            b'H' => Some(MessageKind::StockTradingAction),
            b'Y' => Some(MessageKind::RegShoRestriction),
            b'L' => Some(MessageKind::MarketParticipantPosition),
            b'V' => Some(MessageKind::MwcbDecline),
            b'W' => Some(MessageKind::MwcbStatus),
            b'K' => Some(MessageKind::IpoQuotingPeriod),
            b'J' => Some(MessageKind::LuldAuctionCollar),
            b'h' => Some(MessageKind::OperationalHalt),
            b'A' => Some(MessageKind::AddOrder),
            b'F' => Some(MessageKind::AddOrderMpid),
            b'E' => Some(MessageKind::OrderExecuted),
            b'C' => Some(MessageKind::OrderExecutedWithPrice),
            b'X' => Some(MessageKind::OrderCancel),
            b'D' => Some(MessageKind::OrderDelete),
            b'U' => Some(MessageKind::OrderReplace),
            b'P' => Some(MessageKind::Trade),
            b'Q' => Some(MessageKind::CrossTrade),
            b'B' => Some(MessageKind::BrokenTrade),
            b'I' => Some(MessageKind::Noii),
            b'N' => Some(MessageKind::Rpii),
            _ => None,
        }
    }

    /// The kind's wire code
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Exact total message size in bytes, including the kind byte
    #[must_use]
    pub const fn wire_size(self) -> usize {
        match self {
            MessageKind::SystemEvent | MessageKind::MwcbStatus => 12,
            MessageKind::StockDirectory => 39,
            MessageKind::StockTradingAction => 25,
            MessageKind::RegShoRestriction | MessageKind::Rpii => 20,
            MessageKind::MarketParticipantPosition => 26,
            MessageKind::MwcbDecline | MessageKind::LuldAuctionCollar | MessageKind::OrderReplace => {
                35
            }
            MessageKind::IpoQuotingPeriod => 28,
            MessageKind::OperationalHalt => 21,
            MessageKind::AddOrder | MessageKind::OrderExecutedWithPrice => 36,
            MessageKind::AddOrderMpid | MessageKind::CrossTrade => 40,
            MessageKind::OrderExecuted => 31,
            MessageKind::OrderCancel => 23,
            MessageKind::OrderDelete | MessageKind::BrokenTrade => 19,
            MessageKind::Trade => 44,
            MessageKind::Noii => 50,
        }
    }

    /// Whether this kind normalizes into a downstream record
    #[must_use]
    pub const fn is_order_flow(self) -> bool {
        matches!(
            self,
            MessageKind::AddOrder
                | MessageKind::AddOrderMpid
                | MessageKind::OrderExecuted
                | MessageKind::OrderExecutedWithPrice
                | MessageKind::OrderCancel
                | MessageKind::OrderDelete
                | MessageKind::OrderReplace
                | MessageKind::Trade
        )
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}
