//! Prometheus metrics fed from statistics snapshots.
//!
//! The hot path only bumps its own relaxed counters;
//! [`FeedMetrics::update`] folds a snapshot into the registry from
//! whatever thread serves the scrape endpoint.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

use crate::handler::HandlerStats;

/// Metrics registry for the feed handler
#[derive(Debug)]
pub struct FeedMetrics {
    registry: Registry,
    packets_processed: Counter,
    bytes_processed: Counter,
    invalid_packets: Counter,
    messages_pushed: Counter,
    buffer_full: Counter,
    messages_decoded: Counter,
    gaps_detected: Counter,
    heartbeats: Counter,
    ring_depth: Gauge,
    last: HandlerStats,
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedMetrics {
    /// Create a new registry with all feed metrics registered
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let packets_processed = Counter::default();
        registry.register(
            "tickwire_packets_processed",
            "Session-layer packets accepted",
            packets_processed.clone(),
        );

        let bytes_processed = Counter::default();
        registry.register(
            "tickwire_bytes_processed",
            "Bytes of accepted packets",
            bytes_processed.clone(),
        );

        let invalid_packets = Counter::default();
        registry.register(
            "tickwire_invalid_packets",
            "Packets dropped as invalid",
            invalid_packets.clone(),
        );

        let messages_pushed = Counter::default();
        registry.register(
            "tickwire_messages_pushed",
            "Records enqueued into the ring",
            messages_pushed.clone(),
        );

        let buffer_full = Counter::default();
        registry.register(
            "tickwire_buffer_full",
            "Records dropped on a full ring",
            buffer_full.clone(),
        );

        let messages_decoded = Counter::default();
        registry.register(
            "tickwire_messages_decoded",
            "Messages decoded by the parser",
            messages_decoded.clone(),
        );

        let gaps_detected = Counter::default();
        registry.register(
            "tickwire_gaps_detected",
            "Sequence gaps detected",
            gaps_detected.clone(),
        );

        let heartbeats = Counter::default();
        registry.register(
            "tickwire_heartbeats",
            "Heartbeat packets received",
            heartbeats.clone(),
        );

        let ring_depth = Gauge::default();
        registry.register(
            "tickwire_ring_depth",
            "Records currently waiting in the ring",
            ring_depth.clone(),
        );

        Self {
            registry,
            packets_processed,
            bytes_processed,
            invalid_packets,
            messages_pushed,
            buffer_full,
            messages_decoded,
            gaps_detected,
            heartbeats,
            ring_depth,
            last: HandlerStats::default(),
        }
    }

    /// Fold a statistics snapshot into the registry. Counters advance
    /// by the delta against the previous snapshot, so calling with a
    /// stale snapshot is harmless.
    pub fn update(&mut self, stats: &HandlerStats, ring_depth: usize) {
        let prev = self.last;
        self.packets_processed.inc_by(
            stats
                .handler
                .packets_processed
                .saturating_sub(prev.handler.packets_processed),
        );
        self.bytes_processed.inc_by(
            stats
                .handler
                .bytes_processed
                .saturating_sub(prev.handler.bytes_processed),
        );
        self.invalid_packets.inc_by(
            stats
                .handler
                .invalid_packets
                .saturating_sub(prev.handler.invalid_packets),
        );
        self.messages_pushed.inc_by(
            stats
                .handler
                .messages_pushed
                .saturating_sub(prev.handler.messages_pushed),
        );
        self.buffer_full
            .inc_by(stats.handler.buffer_full.saturating_sub(prev.handler.buffer_full));
        self.messages_decoded.inc_by(
            stats
                .parser
                .total_messages
                .saturating_sub(prev.parser.total_messages),
        );
        self.gaps_detected.inc_by(
            stats
                .session
                .gaps_detected
                .saturating_sub(prev.session.gaps_detected),
        );
        self.heartbeats.inc_by(
            stats
                .session
                .heartbeats_received
                .saturating_sub(prev.session.heartbeats_received),
        );
        self.ring_depth.set(ring_depth as i64);
        self.last = *stats;
    }

    /// Encode the registry in the Prometheus text format
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry).expect("metrics encoding is infallible");
        buffer
    }

    /// Get the registry reference
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
