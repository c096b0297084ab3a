//! Zero-copy ITCH 5.0 message parser.
//!
//! [`Parser::parse_message`] identifies a message by its first byte,
//! checks the exact kind-determined size, extracts fields out of the
//! borrowed buffer with big-endian readers, and delivers one
//! [`NormalizedRecord`] per order-flow event through a [`RecordSink`].
//! Nothing is allocated on the parse path.

use nom::bytes::complete::take;
use nom::combinator::map;
use nom::number::complete::{be_u16, be_u32, be_u64, u8 as any_u8};
use nom::IResult;
use serde::{Deserialize, Serialize};

use tickwire_core::constants::SYMBOL_LEN;
use tickwire_core::endian::read_be48;
use tickwire_core::types::{
    NormalizedRecord, OrderRef, Price, Quantity, RecordKind, Side, StockSymbol, Timestamp,
};

use crate::messages::MessageKind;

/// Receives normalized records as the parser emits them.
///
/// The packet handler writes records straight into the SPSC ring
/// through this seam; tests collect them into a `Vec`. Any
/// `FnMut(NormalizedRecord)` closure is a sink.
pub trait RecordSink {
    /// Called once per decoded order-flow event, in wire order
    fn on_record(&mut self, record: NormalizedRecord);
}

impl<F: FnMut(NormalizedRecord)> RecordSink for F {
    #[inline]
    fn on_record(&mut self, record: NormalizedRecord) {
        self(record);
    }
}

/// Parser statistics, written by the producer context only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserStats {
    /// Messages decoded successfully, of any kind
    pub total_messages: u64,
    /// 'A' and 'F' messages
    pub add_orders: u64,
    /// 'E' and 'C' messages
    pub order_executed: u64,
    /// 'D' messages
    pub order_deleted: u64,
    /// 'X' messages
    pub order_cancelled: u64,
    /// 'U' messages
    pub order_replaced: u64,
    /// 'P' messages
    pub trades: u64,
    /// Administrative and cross/broken-trade messages
    pub other_messages: u64,
    /// First bytes not present in the kind table
    pub unknown_messages: u64,
}

/// Zero-copy ITCH 5.0 parser.
///
/// # Example
///
/// ```rust
/// use tickwire_itch::{Parser, synthetic};
/// use tickwire_core::types::{NormalizedRecord, Side};
///
/// let msg = synthetic::build_order_delete(42, 34_200_000_000_000);
/// let mut parser = Parser::new();
/// let mut out = Vec::new();
/// let consumed = parser.parse_message(&msg, &mut |r: NormalizedRecord| out.push(r));
/// assert_eq!(consumed, 19);
/// assert_eq!(out[0].order_ref.value(), 42);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    stats: ParserStats,
}

impl Parser {
    /// Create a new parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse exactly one message starting at `data[0]`.
    ///
    /// Returns the number of bytes consumed: the kind's exact wire
    /// size on success, or 0 for an empty buffer, an unknown kind
    /// code (counted), or a buffer shorter than the kind's size (not
    /// counted — the caller may retry with more bytes).
    pub fn parse_message(&mut self, data: &[u8], sink: &mut impl RecordSink) -> usize {
        let Some(&code) = data.first() else {
            return 0;
        };
        let Some(kind) = MessageKind::from_code(code) else {
            self.stats.unknown_messages += 1;
            return 0;
        };

        let size = kind.wire_size();
        if data.len() < size {
            return 0;
        }

        // Field extraction starts after the kind byte
        let body = &data[1..size];

        match kind {
            MessageKind::AddOrder => {
                let Ok((_, record)) = add_order(body, RecordKind::AddOrder) else {
                    return 0;
                };
                self.stats.add_orders += 1;
                sink.on_record(record);
            }
            MessageKind::AddOrderMpid => {
                let Ok((_, record)) = add_order(body, RecordKind::AddOrderMpid) else {
                    return 0;
                };
                self.stats.add_orders += 1;
                sink.on_record(record);
            }
            MessageKind::OrderExecuted => {
                let Ok((_, record)) = order_executed(body) else {
                    return 0;
                };
                self.stats.order_executed += 1;
                sink.on_record(record);
            }
            MessageKind::OrderExecutedWithPrice => {
                let Ok((_, record)) = order_executed_with_price(body) else {
                    return 0;
                };
                self.stats.order_executed += 1;
                sink.on_record(record);
            }
            MessageKind::OrderCancel => {
                let Ok((_, record)) = order_cancel(body) else {
                    return 0;
                };
                self.stats.order_cancelled += 1;
                sink.on_record(record);
            }
            MessageKind::OrderDelete => {
                let Ok((_, record)) = order_delete(body) else {
                    return 0;
                };
                self.stats.order_deleted += 1;
                sink.on_record(record);
            }
            MessageKind::OrderReplace => {
                let Ok((_, record)) = order_replace(body) else {
                    return 0;
                };
                self.stats.order_replaced += 1;
                sink.on_record(record);
            }
            MessageKind::Trade => {
                let Ok((_, record)) = trade(body) else {
                    return 0;
                };
                self.stats.trades += 1;
                sink.on_record(record);
            }
            // Administrative traffic plus cross and broken trades:
            // counted, not emitted downstream in this release.
            MessageKind::SystemEvent
            | MessageKind::StockDirectory
            | MessageKind::StockTradingAction
            | MessageKind::RegShoRestriction
            | MessageKind::MarketParticipantPosition
            | MessageKind::MwcbDecline
            | MessageKind::MwcbStatus
            | MessageKind::IpoQuotingPeriod
            | MessageKind::LuldAuctionCollar
            | MessageKind::OperationalHalt
            | MessageKind::CrossTrade
            | MessageKind::BrokenTrade
            | MessageKind::Noii
            | MessageKind::Rpii => {
                self.stats.other_messages += 1;
            }
        }

        self.stats.total_messages += 1;
        size
    }

    /// Get the statistics snapshot
    #[must_use]
    pub const fn stats(&self) -> &ParserStats {
        &self.stats
    }

    /// Reset all counters
    pub fn reset_stats(&mut self) {
        self.stats = ParserStats::default();
    }
}

// Field parsers. Each takes the message body (everything after the
// kind byte) and the size check in `parse_message` guarantees enough
// input, so these never fail in practice.

fn timestamp48(input: &[u8]) -> IResult<&[u8], Timestamp> {
    map(take(6usize), |b: &[u8]| Timestamp::from_nanos(read_be48(b)))(input)
}

fn stock_symbol(input: &[u8]) -> IResult<&[u8], StockSymbol> {
    map(take(SYMBOL_LEN), |b: &[u8]| {
        let mut bytes = [0u8; SYMBOL_LEN];
        bytes.copy_from_slice(b);
        StockSymbol::from_bytes(bytes)
    })(input)
}

/// Common prefix after the kind byte: stock locate, tracking number,
/// timestamp. Locate and tracking are venue bookkeeping and are not
/// normalized.
fn prefix(input: &[u8]) -> IResult<&[u8], Timestamp> {
    let (input, _stock_locate) = be_u16(input)?;
    let (input, _tracking_number) = be_u16(input)?;
    timestamp48(input)
}

fn add_order(input: &[u8], kind: RecordKind) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;
    let (input, side) = any_u8(input)?;
    let (input, shares) = be_u32(input)?;
    let (input, stock) = stock_symbol(input)?;
    let (input, price) = be_u32(input)?;
    // 'F' carries a trailing 4-byte MPID attribution, not normalized

    Ok((
        input,
        NormalizedRecord {
            kind,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            stock,
            side: Side::from_wire(side),
            price: Price::from_wire(price),
            quantity: Quantity::new(shares),
            ..NormalizedRecord::default()
        },
    ))
}

fn order_executed(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;
    let (input, executed_shares) = be_u32(input)?;
    let (input, _match_number) = be_u64(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::OrderExecuted,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            executed_quantity: Quantity::new(executed_shares),
            ..NormalizedRecord::default()
        },
    ))
}

fn order_executed_with_price(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;
    let (input, executed_shares) = be_u32(input)?;
    let (input, _match_number) = be_u64(input)?;
    let (input, _printable) = any_u8(input)?;
    let (input, execution_price) = be_u32(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::OrderExecutedWithPrice,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            executed_quantity: Quantity::new(executed_shares),
            price: Price::from_wire(execution_price),
            ..NormalizedRecord::default()
        },
    ))
}

fn order_cancel(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;
    let (input, cancelled_shares) = be_u32(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::OrderCancel,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            quantity: Quantity::new(cancelled_shares),
            ..NormalizedRecord::default()
        },
    ))
}

fn order_delete(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::OrderDelete,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            ..NormalizedRecord::default()
        },
    ))
}

fn order_replace(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, original_ref) = be_u64(input)?;
    let (input, new_ref) = be_u64(input)?;
    let (input, shares) = be_u32(input)?;
    let (input, price) = be_u32(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::OrderReplace,
            timestamp,
            order_ref: OrderRef::new(original_ref),
            new_order_ref: OrderRef::new(new_ref),
            price: Price::from_wire(price),
            quantity: Quantity::new(shares),
            ..NormalizedRecord::default()
        },
    ))
}

fn trade(input: &[u8]) -> IResult<&[u8], NormalizedRecord> {
    let (input, timestamp) = prefix(input)?;
    let (input, order_ref) = be_u64(input)?;
    let (input, side) = any_u8(input)?;
    let (input, shares) = be_u32(input)?;
    let (input, stock) = stock_symbol(input)?;
    let (input, price) = be_u32(input)?;
    let (input, _match_number) = be_u64(input)?;

    Ok((
        input,
        NormalizedRecord {
            kind: RecordKind::Trade,
            timestamp,
            order_ref: OrderRef::new(order_ref),
            stock,
            side: Side::from_wire(side),
            price: Price::from_wire(price),
            quantity: Quantity::new(shares),
            ..NormalizedRecord::default()
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    fn collect(parser: &mut Parser, data: &[u8]) -> (usize, Vec<NormalizedRecord>) {
        let mut out = Vec::new();
        let consumed = parser.parse_message(data, &mut |r: NormalizedRecord| out.push(r));
        (consumed, out)
    }

    #[test]
    fn test_consumed_matches_table_for_every_kind() {
        // A buffer of the declared size beginning with the kind code
        // must consume exactly the declared size.
        for kind in MessageKind::ALL {
            let mut parser = Parser::new();
            let mut buf = vec![0u8; kind.wire_size()];
            buf[0] = kind.code();
            let (consumed, _) = collect(&mut parser, &buf);
            assert_eq!(consumed, kind.wire_size(), "kind {:?}", kind);
            assert_eq!(parser.stats().total_messages, 1);

            // Trailing bytes beyond the declared size are not touched
            buf.extend_from_slice(&[0xEE; 16]);
            let (consumed, _) = collect(&mut parser, &buf);
            assert_eq!(consumed, kind.wire_size());
        }
    }

    #[test]
    fn test_short_buffer_consumes_nothing() {
        for kind in MessageKind::ALL {
            let mut parser = Parser::new();
            let mut buf = vec![0u8; kind.wire_size() - 1];
            buf[0] = kind.code();
            let (consumed, records) = collect(&mut parser, &buf);
            assert_eq!(consumed, 0, "kind {:?}", kind);
            assert!(records.is_empty());
            assert_eq!(*parser.stats(), ParserStats::default());
        }
    }

    #[test]
    fn test_unknown_kind_counted() {
        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &[b'Z', 0, 0, 0]);
        assert_eq!(consumed, 0);
        assert!(records.is_empty());
        assert_eq!(parser.stats().unknown_messages, 1);
        assert_eq!(parser.stats().total_messages, 0);
    }

    #[test]
    fn test_empty_buffer() {
        let mut parser = Parser::new();
        let (consumed, _) = collect(&mut parser, &[]);
        assert_eq!(consumed, 0);
        assert_eq!(*parser.stats(), ParserStats::default());
    }

    #[test]
    fn test_add_order_round_trip() {
        let msg = synthetic::build_add_order(
            123_456_789,
            Side::Buy,
            100,
            "MSFT",
            1_234_500,
            34_200_000_000_000,
        );

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 36);
        assert_eq!(records.len(), 1);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::AddOrder);
        assert_eq!(rec.order_ref.value(), 123_456_789);
        assert_eq!(rec.side, Side::Buy);
        // Wire price is lifted from 4 to 6 decimal places
        assert_eq!(rec.price.raw(), 123_450_000);
        assert_eq!(rec.quantity.value(), 100);
        assert_eq!(rec.stock.as_bytes(), b"MSFT    ");
        assert_eq!(rec.timestamp.as_nanos(), 34_200_000_000_000);
        assert_eq!(parser.stats().add_orders, 1);
    }

    #[test]
    fn test_add_order_mpid_normalizes_like_add_order() {
        let msg = synthetic::build_add_order_mpid(
            55,
            Side::Sell,
            250,
            "AAPL",
            9_999,
            1_000,
            *b"MPID",
        );

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 40);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::AddOrderMpid);
        assert_eq!(rec.order_ref.value(), 55);
        assert_eq!(rec.side, Side::Sell);
        assert_eq!(rec.price.raw(), 999_900);
        assert_eq!(parser.stats().add_orders, 1);
    }

    #[test]
    fn test_order_executed_fields() {
        let msg = synthetic::build_order_executed(77, 50, 999_888_777, 34_200_100_000_000);

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 31);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::OrderExecuted);
        assert_eq!(rec.order_ref.value(), 77);
        assert_eq!(rec.executed_quantity.value(), 50);
        assert_eq!(rec.timestamp.as_nanos(), 34_200_100_000_000);
        // Fields that do not apply stay zeroed
        assert_eq!(rec.price, Price::ZERO);
        assert_eq!(rec.quantity, Quantity::ZERO);
        assert_eq!(parser.stats().order_executed, 1);
    }

    #[test]
    fn test_order_executed_with_price_carries_price() {
        let msg =
            synthetic::build_order_executed_with_price(77, 25, 1, true, 2_000_000, 1_000);

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 36);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::OrderExecutedWithPrice);
        assert_eq!(rec.executed_quantity.value(), 25);
        assert_eq!(rec.price.raw(), 200_000_000);
        assert_eq!(parser.stats().order_executed, 1);
    }

    #[test]
    fn test_order_cancel_and_delete() {
        let mut parser = Parser::new();

        let cancel = synthetic::build_order_cancel(10, 30, 500);
        let (consumed, records) = collect(&mut parser, &cancel);
        assert_eq!(consumed, 23);
        assert_eq!(records[0].kind, RecordKind::OrderCancel);
        assert_eq!(records[0].quantity.value(), 30);

        let delete = synthetic::build_order_delete(10, 600);
        let (consumed, records) = collect(&mut parser, &delete);
        assert_eq!(consumed, 19);
        assert_eq!(records[0].kind, RecordKind::OrderDelete);
        assert_eq!(records[0].order_ref.value(), 10);

        assert_eq!(parser.stats().order_cancelled, 1);
        assert_eq!(parser.stats().order_deleted, 1);
        assert_eq!(parser.stats().total_messages, 2);
    }

    #[test]
    fn test_order_replace_refs() {
        let msg = synthetic::build_order_replace(100, 200, 75, 5_000, 1_000);

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 35);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::OrderReplace);
        assert_eq!(rec.order_ref.value(), 100);
        assert_eq!(rec.new_order_ref.value(), 200);
        assert_eq!(rec.quantity.value(), 75);
        assert_eq!(rec.price.raw(), 500_000);
        assert_eq!(parser.stats().order_replaced, 1);
    }

    #[test]
    fn test_trade_fields() {
        let msg = synthetic::build_trade(5, Side::Sell, 10, "TSLA", 7_500_000, 42, 2_000);

        let mut parser = Parser::new();
        let (consumed, records) = collect(&mut parser, &msg);

        assert_eq!(consumed, 44);
        let rec = records[0];
        assert_eq!(rec.kind, RecordKind::Trade);
        assert_eq!(rec.side, Side::Sell);
        assert_eq!(rec.stock.trimmed(), "TSLA");
        assert_eq!(rec.price.raw(), 750_000_000);
        assert_eq!(parser.stats().trades, 1);
    }

    #[test]
    fn test_administrative_kinds_counted_not_emitted() {
        let mut parser = Parser::new();

        let msg = synthetic::build_system_event(b'O', 100);
        let (consumed, records) = collect(&mut parser, &msg);
        assert_eq!(consumed, 12);
        assert!(records.is_empty());

        // Cross and broken trades follow the administrative path
        let mut cross = vec![0u8; MessageKind::CrossTrade.wire_size()];
        cross[0] = b'Q';
        let (consumed, records) = collect(&mut parser, &cross);
        assert_eq!(consumed, 40);
        assert!(records.is_empty());

        assert_eq!(parser.stats().other_messages, 2);
        assert_eq!(parser.stats().total_messages, 2);
    }

    #[test]
    fn test_reset_stats() {
        let mut parser = Parser::new();
        let msg = synthetic::build_order_delete(1, 1);
        let _ = collect(&mut parser, &msg);
        assert_ne!(*parser.stats(), ParserStats::default());

        parser.reset_stats();
        assert_eq!(*parser.stats(), ParserStats::default());
    }
}
