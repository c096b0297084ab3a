//! Packet handler: the producer-side orchestrator.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tickwire_core::constants::{DEFAULT_RING_CAPACITY, MESSAGE_BLOCK_LEN};
use tickwire_core::endian::read_be16;
use tickwire_core::types::{NormalizedRecord, SequenceNumber};
use tickwire_itch::{Parser, ParserStats};
use tickwire_ring::SpscRing;
use tickwire_session::{Gap, PacketSink, SessionDecoder, SessionState, SessionStats};

use crate::net;

/// The record ring at its production capacity
pub type RecordRing = SpscRing<NormalizedRecord, DEFAULT_RING_CAPACITY>;

/// Callback fired once per newly detected gap, from the producer
/// context
pub type GapCallback = Box<dyn FnMut(&Gap) + Send>;

/// Producer-written counters, readable from any thread.
///
/// All loads and stores are `Relaxed`: readers may observe
/// inconsistent snapshots, which is accepted for operational
/// monitoring.
#[derive(Debug, Default)]
pub struct FeedCounters {
    /// Session-layer packets accepted
    pub packets_processed: AtomicU64,
    /// Bytes of accepted packets, including link-layer framing
    pub bytes_processed: AtomicU64,
    /// Packets dropped before or during session decoding
    pub invalid_packets: AtomicU64,
    /// Records successfully enqueued into the ring
    pub messages_pushed: AtomicU64,
    /// Records dropped because the ring was full
    pub buffer_full: AtomicU64,
}

impl FeedCounters {
    /// Copy the counters into a plain snapshot
    #[must_use]
    pub fn snapshot(&self) -> FeedCountersSnapshot {
        FeedCountersSnapshot {
            packets_processed: self.packets_processed.load(Ordering::Relaxed),
            bytes_processed: self.bytes_processed.load(Ordering::Relaxed),
            invalid_packets: self.invalid_packets.load(Ordering::Relaxed),
            messages_pushed: self.messages_pushed.load(Ordering::Relaxed),
            buffer_full: self.buffer_full.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value copy of [`FeedCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCountersSnapshot {
    /// Session-layer packets accepted
    pub packets_processed: u64,
    /// Bytes of accepted packets
    pub bytes_processed: u64,
    /// Packets dropped as invalid
    pub invalid_packets: u64,
    /// Records enqueued into the ring
    pub messages_pushed: u64,
    /// Records dropped on a full ring
    pub buffer_full: u64,
}

/// Aggregated statistics across the handler, parser and session layer
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HandlerStats {
    /// Handler-level counters
    pub handler: FeedCountersSnapshot,
    /// Message parser counters
    pub parser: ParserStats,
    /// Session-layer counters
    pub session: SessionStats,
}

/// Producer-side orchestrator.
///
/// Takes buffers from the ingest collaborator (live NIC poll loop or
/// capture replay), feeds the session decoder, parses each dispatched
/// message, and pushes one [`NormalizedRecord`] per order-flow event
/// into the shared ring. On a full ring the record is dropped and
/// counted; the producer never blocks on the consumer.
///
/// Packet buffers are borrowed for the duration of a single feed call
/// and no pointer into them is retained.
pub struct PacketHandler<const N: usize = DEFAULT_RING_CAPACITY> {
    session: SessionDecoder,
    parser: Parser,
    ring: Arc<SpscRing<NormalizedRecord, N>>,
    counters: Arc<FeedCounters>,
    running: Arc<AtomicBool>,
    gap_callback: Option<GapCallback>,
}

/// Adapter handing session-layer dispatch into the parser and ring.
struct IngestSink<'a, const N: usize> {
    parser: &'a mut Parser,
    ring: &'a SpscRing<NormalizedRecord, N>,
    counters: &'a FeedCounters,
    gap_callback: &'a mut Option<GapCallback>,
}

impl<const N: usize> PacketSink for IngestSink<'_, N> {
    fn on_message(&mut self, payload: &[u8], _sequence: SequenceNumber) {
        let mut sink = record_sink(self.ring, self.counters);
        self.parser.parse_message(payload, &mut sink);
    }

    fn on_gap(&mut self, gap: &Gap) {
        if let Some(callback) = self.gap_callback.as_mut() {
            callback(gap);
        }
    }
}

/// Record sink that enqueues into the ring and counts the outcome.
fn record_sink<'a, const N: usize>(
    ring: &'a SpscRing<NormalizedRecord, N>,
    counters: &'a FeedCounters,
) -> impl FnMut(NormalizedRecord) + 'a {
    move |record| {
        if ring.try_enqueue(record).is_ok() {
            counters.messages_pushed.fetch_add(1, Ordering::Relaxed);
        } else {
            counters.buffer_full.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl<const N: usize> PacketHandler<N> {
    /// Create a handler pushing into `ring`
    #[must_use]
    pub fn new(ring: Arc<SpscRing<NormalizedRecord, N>>) -> Self {
        Self {
            session: SessionDecoder::new(),
            parser: Parser::new(),
            ring,
            counters: Arc::new(FeedCounters::default()),
            running: Arc::new(AtomicBool::new(false)),
            gap_callback: None,
        }
    }

    /// Register the one-shot gap notification callback, invoked from
    /// the producer context the first time each gap is detected
    pub fn set_gap_callback(&mut self, callback: GapCallback) {
        self.gap_callback = Some(callback);
    }

    /// Feed a framed Ethernet/IPv4/UDP datagram
    pub fn feed_framed(&mut self, frame: &[u8]) -> bool {
        let Some(payload) = net::udp_payload(frame) else {
            self.counters.invalid_packets.fetch_add(1, Ordering::Relaxed);
            return false;
        };
        self.ingest(payload, frame.len())
    }

    /// Feed a bare session-layer packet
    pub fn feed_session(&mut self, packet: &[u8]) -> bool {
        self.ingest(packet, packet.len())
    }

    fn ingest(&mut self, payload: &[u8], wire_bytes: usize) -> bool {
        let mut sink = IngestSink {
            parser: &mut self.parser,
            ring: self.ring.as_ref(),
            counters: self.counters.as_ref(),
            gap_callback: &mut self.gap_callback,
        };

        match self.session.process_packet(payload, &mut sink) {
            Ok(status) => {
                self.counters.packets_processed.fetch_add(1, Ordering::Relaxed);
                self.counters
                    .bytes_processed
                    .fetch_add(wire_bytes as u64, Ordering::Relaxed);
                debug!(?status, "packet processed");
                true
            }
            Err(error) => {
                self.counters.invalid_packets.fetch_add(1, Ordering::Relaxed);
                debug!(%error, "packet rejected");
                false
            }
        }
    }

    /// Feed a raw stream of 2-byte-length-prefixed messages, bypassing
    /// the session layer. Returns the number of messages decoded.
    pub fn feed_file(&mut self, data: &[u8]) -> usize {
        let mut offset = 0usize;
        let mut decoded = 0usize;

        while offset + MESSAGE_BLOCK_LEN <= data.len() {
            let len = usize::from(read_be16(&data[offset..]));
            offset += MESSAGE_BLOCK_LEN;

            if offset + len > data.len() {
                break; // incomplete trailing message
            }

            let mut sink = record_sink(self.ring.as_ref(), self.counters.as_ref());
            if self.parser.parse_message(&data[offset..offset + len], &mut sink) > 0 {
                decoded += 1;
            }
            offset += len;
        }

        self.counters
            .bytes_processed
            .fetch_add(offset as u64, Ordering::Relaxed);
        decoded
    }

    /// Mark the feed as running
    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Signal polling loops to drain and exit on their next turn
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Whether the feed is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Shared handle on the running flag for polling loops
    #[must_use]
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Shared handle on the producer counters
    #[must_use]
    pub fn counters(&self) -> Arc<FeedCounters> {
        Arc::clone(&self.counters)
    }

    /// The ring this handler pushes into
    #[must_use]
    pub fn ring(&self) -> &Arc<SpscRing<NormalizedRecord, N>> {
        &self.ring
    }

    /// Session decoder state
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// Whether the session has pending gaps
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        self.session.has_gaps()
    }

    /// Read-only view of the session decoder
    #[must_use]
    pub const fn session(&self) -> &SessionDecoder {
        &self.session
    }

    /// Aggregate statistics snapshot
    #[must_use]
    pub fn stats(&self) -> HandlerStats {
        HandlerStats {
            handler: self.counters.snapshot(),
            parser: *self.parser.stats(),
            session: *self.session.stats(),
        }
    }
}
