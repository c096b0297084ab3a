//! Synthetic wire-message generation for testing and development.
//!
//! The `build_*` functions emit byte-exact ITCH messages; the
//! [`SyntheticFeed`] produces a seeded, self-consistent stream of
//! order-flow traffic (adds followed by executions, cancels, deletes,
//! replaces against live references).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tickwire_core::types::Side;

use crate::messages::MessageKind;

fn push_be16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_be32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_be64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_ts48(buf: &mut Vec<u8>, nanos: u64) {
    buf.extend_from_slice(&nanos.to_be_bytes()[2..8]);
}

fn push_symbol(buf: &mut Vec<u8>, ticker: &str) {
    let mut bytes = [b' '; 8];
    for (dst, src) in bytes.iter_mut().zip(ticker.bytes()) {
        *dst = src;
    }
    buf.extend_from_slice(&bytes);
}

/// Kind byte plus the common prefix: zeroed stock locate and tracking
/// number, 6-byte timestamp.
fn push_prefix(buf: &mut Vec<u8>, kind: MessageKind, ts_ns: u64) {
    buf.push(kind.code());
    push_be16(buf, 0);
    push_be16(buf, 0);
    push_ts48(buf, ts_ns);
}

fn side_indicator(side: Side) -> u8 {
    match side {
        Side::Buy => b'B',
        Side::Sell => b'S',
    }
}

/// Build an 'A' add-order message (36 bytes).
#[must_use]
pub fn build_add_order(
    order_ref: u64,
    side: Side,
    shares: u32,
    stock: &str,
    price_wire: u32,
    ts_ns: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::AddOrder.wire_size());
    push_prefix(&mut buf, MessageKind::AddOrder, ts_ns);
    push_be64(&mut buf, order_ref);
    buf.push(side_indicator(side));
    push_be32(&mut buf, shares);
    push_symbol(&mut buf, stock);
    push_be32(&mut buf, price_wire);
    buf
}

/// Build an 'F' add-order message with MPID attribution (40 bytes).
#[must_use]
pub fn build_add_order_mpid(
    order_ref: u64,
    side: Side,
    shares: u32,
    stock: &str,
    price_wire: u32,
    ts_ns: u64,
    mpid: [u8; 4],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::AddOrderMpid.wire_size());
    push_prefix(&mut buf, MessageKind::AddOrderMpid, ts_ns);
    push_be64(&mut buf, order_ref);
    buf.push(side_indicator(side));
    push_be32(&mut buf, shares);
    push_symbol(&mut buf, stock);
    push_be32(&mut buf, price_wire);
    buf.extend_from_slice(&mpid);
    buf
}

/// Build an 'E' order-executed message (31 bytes).
#[must_use]
pub fn build_order_executed(
    order_ref: u64,
    executed_shares: u32,
    match_number: u64,
    ts_ns: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::OrderExecuted.wire_size());
    push_prefix(&mut buf, MessageKind::OrderExecuted, ts_ns);
    push_be64(&mut buf, order_ref);
    push_be32(&mut buf, executed_shares);
    push_be64(&mut buf, match_number);
    buf
}

/// Build a 'C' order-executed-with-price message (36 bytes).
#[must_use]
pub fn build_order_executed_with_price(
    order_ref: u64,
    executed_shares: u32,
    match_number: u64,
    printable: bool,
    price_wire: u32,
    ts_ns: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::OrderExecutedWithPrice.wire_size());
    push_prefix(&mut buf, MessageKind::OrderExecutedWithPrice, ts_ns);
    push_be64(&mut buf, order_ref);
    push_be32(&mut buf, executed_shares);
    push_be64(&mut buf, match_number);
    buf.push(if printable { b'Y' } else { b'N' });
    push_be32(&mut buf, price_wire);
    buf
}

/// Build an 'X' order-cancel message (23 bytes).
#[must_use]
pub fn build_order_cancel(order_ref: u64, cancelled_shares: u32, ts_ns: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::OrderCancel.wire_size());
    push_prefix(&mut buf, MessageKind::OrderCancel, ts_ns);
    push_be64(&mut buf, order_ref);
    push_be32(&mut buf, cancelled_shares);
    buf
}

/// Build a 'D' order-delete message (19 bytes).
#[must_use]
pub fn build_order_delete(order_ref: u64, ts_ns: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::OrderDelete.wire_size());
    push_prefix(&mut buf, MessageKind::OrderDelete, ts_ns);
    push_be64(&mut buf, order_ref);
    buf
}

/// Build a 'U' order-replace message (35 bytes).
#[must_use]
pub fn build_order_replace(
    original_ref: u64,
    new_ref: u64,
    shares: u32,
    price_wire: u32,
    ts_ns: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::OrderReplace.wire_size());
    push_prefix(&mut buf, MessageKind::OrderReplace, ts_ns);
    push_be64(&mut buf, original_ref);
    push_be64(&mut buf, new_ref);
    push_be32(&mut buf, shares);
    push_be32(&mut buf, price_wire);
    buf
}

/// Build a 'P' non-cross trade message (44 bytes).
#[must_use]
pub fn build_trade(
    order_ref: u64,
    side: Side,
    shares: u32,
    stock: &str,
    price_wire: u32,
    match_number: u64,
    ts_ns: u64,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::Trade.wire_size());
    push_prefix(&mut buf, MessageKind::Trade, ts_ns);
    push_be64(&mut buf, order_ref);
    buf.push(side_indicator(side));
    push_be32(&mut buf, shares);
    push_symbol(&mut buf, stock);
    push_be32(&mut buf, price_wire);
    push_be64(&mut buf, match_number);
    buf
}

/// Build an 'S' system-event message (12 bytes).
#[must_use]
pub fn build_system_event(event_code: u8, ts_ns: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MessageKind::SystemEvent.wire_size());
    push_prefix(&mut buf, MessageKind::SystemEvent, ts_ns);
    buf.push(event_code);
    buf
}

/// Concatenate messages into the length-prefixed stream format: each
/// message preceded by a 2-byte big-endian length.
#[must_use]
pub fn length_prefixed(messages: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = messages.iter().map(|m| m.len() + 2).sum();
    let mut buf = Vec::with_capacity(total);
    for msg in messages {
        push_be16(&mut buf, msg.len() as u16);
        buf.extend_from_slice(msg);
    }
    buf
}

/// Configuration for the synthetic order-flow generator
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Tickers to rotate through
    pub symbols: Vec<String>,
    /// First event timestamp (nanoseconds since midnight)
    pub start_time_ns: u64,
    /// Average spacing between events (nanoseconds)
    pub avg_event_interval_ns: u64,
    /// Starting price on the 4-decimal wire scale
    pub initial_price_wire: u32,
    /// Mean displayed share count
    pub avg_shares: u32,
    /// Probability that an event adds a new order rather than acting
    /// on a live one
    pub add_frequency: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "TSLA".to_string(),
                "NVDA".to_string(),
            ],
            start_time_ns: 34_200_000_000_000, // 09:30:00
            avg_event_interval_ns: 1_000_000,  // 1ms average
            initial_price_wire: 1_500_000,     // $150.0000
            avg_shares: 100,
            add_frequency: 0.5,
        }
    }
}

/// Seeded generator of self-consistent ITCH order-flow traffic.
///
/// Executions, cancels, deletes and replaces always target an order
/// reference that a previous add introduced, so downstream state
/// tracking sees a coherent stream.
pub struct SyntheticFeed {
    config: SyntheticConfig,
    rng: StdRng,
    clock_ns: u64,
    price_wire: u32,
    next_ref: u64,
    next_match: u64,
    live_refs: Vec<u64>,
}

impl SyntheticFeed {
    /// Create a generator with the default seed
    #[must_use]
    pub fn new(config: SyntheticConfig) -> Self {
        Self::with_seed(config, 42)
    }

    /// Create a generator with a specific seed
    #[must_use]
    pub fn with_seed(config: SyntheticConfig, seed: u64) -> Self {
        Self {
            clock_ns: config.start_time_ns,
            price_wire: config.initial_price_wire,
            next_ref: 1,
            next_match: 1,
            live_refs: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Generate the next wire message
    pub fn next_message(&mut self) -> Vec<u8> {
        let lo = self.config.avg_event_interval_ns / 2;
        let hi = self.config.avg_event_interval_ns * 2;
        self.clock_ns += self.rng.gen_range(lo..=hi);

        // Random walk on the wire price, one tick at a time
        if self.rng.gen_bool(0.5) {
            self.price_wire = self.price_wire.saturating_add(100);
        } else {
            self.price_wire = self.price_wire.saturating_sub(100).max(100);
        }

        if self.live_refs.is_empty() || self.rng.gen_bool(self.config.add_frequency) {
            return self.add_order();
        }

        let slot = self.rng.gen_range(0..self.live_refs.len());
        let order_ref = self.live_refs[slot];
        match self.rng.gen_range(0..5) {
            0 => {
                let shares = self.rng.gen_range(1..=self.config.avg_shares);
                let match_number = self.next_match;
                self.next_match += 1;
                build_order_executed(order_ref, shares, match_number, self.clock_ns)
            }
            1 => {
                let shares = self.rng.gen_range(1..=self.config.avg_shares);
                build_order_cancel(order_ref, shares, self.clock_ns)
            }
            2 => {
                self.live_refs.swap_remove(slot);
                build_order_delete(order_ref, self.clock_ns)
            }
            3 => {
                let new_ref = self.next_ref;
                self.next_ref += 1;
                self.live_refs[slot] = new_ref;
                let shares = self.rng.gen_range(1..=self.config.avg_shares * 2);
                build_order_replace(order_ref, new_ref, shares, self.price_wire, self.clock_ns)
            }
            _ => {
                let side = if self.rng.gen_bool(0.5) {
                    Side::Buy
                } else {
                    Side::Sell
                };
                let shares = self.rng.gen_range(1..=self.config.avg_shares);
                let symbol = self.pick_symbol();
                let match_number = self.next_match;
                self.next_match += 1;
                build_trade(
                    order_ref,
                    side,
                    shares,
                    &symbol,
                    self.price_wire,
                    match_number,
                    self.clock_ns,
                )
            }
        }
    }

    fn add_order(&mut self) -> Vec<u8> {
        let order_ref = self.next_ref;
        self.next_ref += 1;
        self.live_refs.push(order_ref);

        let side = if self.rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let shares = self.rng.gen_range(1..=self.config.avg_shares * 2);
        let symbol = self.pick_symbol();
        build_add_order(
            order_ref,
            side,
            shares,
            &symbol,
            self.price_wire,
            self.clock_ns,
        )
    }

    fn pick_symbol(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.config.symbols.len());
        self.config.symbols[idx].clone()
    }

    /// Generate N messages
    pub fn generate_n(&mut self, n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|_| self.next_message()).collect()
    }

    /// Generate N messages as one length-prefixed stream
    pub fn length_prefixed_stream(&mut self, n: usize) -> Vec<u8> {
        let messages = self.generate_n(n);
        length_prefixed(&messages)
    }
}
