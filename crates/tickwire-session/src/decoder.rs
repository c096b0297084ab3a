//! Session decoder: sequence tracking, gap detection, dispatch.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use tickwire_core::constants::{MAX_PENDING_GAPS, MESSAGE_BLOCK_LEN, PACKET_HEADER_LEN, SESSION_ID_LEN};
use tickwire_core::endian::read_be16;
use tickwire_core::types::SequenceNumber;

use crate::error::SessionError;
use crate::header::PacketHeader;

/// A contiguous range of missing sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// First missing sequence number
    pub start: SequenceNumber,
    /// Last missing sequence number, inclusive
    pub end: SequenceNumber,
    /// When the gap was detected; left at zero here, the embedding
    /// application stamps it if it needs timeout handling
    pub detected_at_ns: u64,
}

/// Session lifecycle state.
///
/// `EndOfSession` and `Error` are terminal; the decoder refuses
/// further packets once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No packet seen yet; the first packet adopts its session id
    #[default]
    Unknown,
    /// Normal operation, no outstanding gaps
    Active,
    /// At least one gap is pending retransmission
    Stale,
    /// The publisher announced the end of the session
    EndOfSession,
    /// Unrecoverable failure (session mismatch or gap overflow)
    Error,
}

/// Outcome of a successfully processed packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    /// Keep-alive; no sequence or state effect
    Heartbeat,
    /// The session is over
    EndOfSession,
    /// Regular packet; `messages` blocks were dispatched to the sink
    Dispatched {
        /// Number of fully contained blocks handed to the sink
        messages: usize,
    },
}

/// Consumer interface for per-message dispatch and gap notification.
///
/// `on_message` is called at most once per message block, in wire
/// order; `on_gap` once per newly detected gap, before the packet
/// that revealed it is dispatched.
pub trait PacketSink {
    /// One message block and the sequence number assigned to it
    fn on_message(&mut self, payload: &[u8], sequence: SequenceNumber);

    /// A gap was just detected
    fn on_gap(&mut self, _gap: &Gap) {}
}

impl<F: FnMut(&[u8], SequenceNumber)> PacketSink for F {
    #[inline]
    fn on_message(&mut self, payload: &[u8], sequence: SequenceNumber) {
        self(payload, sequence);
    }
}

/// Session statistics, written by the producer context only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Packets with a well-formed header
    pub packets_received: u64,
    /// Message blocks dispatched to the sink
    pub messages_received: u64,
    /// Gaps detected
    pub gaps_detected: u64,
    /// Heartbeats received
    pub heartbeats_received: u64,
    /// Packets whose block list was cut off by the packet boundary
    pub truncated_blocks: u64,
}

/// Per-stream session decoder.
///
/// Verifies the session identity, classifies each packet against the
/// expected sequence number, dispatches the embedded message blocks in
/// order, and maintains the pending gap list.
///
/// `expected_sequence` is the smallest sequence greater than every
/// sequence observed in a non-duplicate packet; it never decreases.
/// On a truncated packet it advances only by the blocks actually
/// dispatched, so a cut-off tail surfaces later as a gap instead of
/// being silently skipped.
#[derive(Debug)]
pub struct SessionDecoder {
    session_id: [u8; SESSION_ID_LEN],
    expected_sequence: SequenceNumber,
    state: SessionState,
    pending_gaps: Vec<Gap>,
    stats: SessionStats,
}

impl Default for SessionDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionDecoder {
    /// Create a decoder awaiting its first packet
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: [0u8; SESSION_ID_LEN],
            expected_sequence: 1,
            state: SessionState::Unknown,
            pending_gaps: Vec::with_capacity(MAX_PENDING_GAPS),
            stats: SessionStats::default(),
        }
    }

    /// Process one session-layer packet.
    ///
    /// Message blocks are handed to `sink` in wire order with their
    /// sequence numbers. A block cut off by the packet boundary stops
    /// iteration; blocks already dispatched are not rolled back.
    ///
    /// # Errors
    ///
    /// [`SessionError::MalformedHeader`] for a packet shorter than the
    /// header (state untouched), [`SessionError::SessionMismatch`] and
    /// [`SessionError::GapOverflow`] for the terminal failures, and
    /// [`SessionError::SessionEnded`] once a terminal state is
    /// reached.
    pub fn process_packet(
        &mut self,
        buf: &[u8],
        sink: &mut impl PacketSink,
    ) -> Result<PacketStatus, SessionError> {
        let Some(header) = PacketHeader::parse(buf) else {
            return Err(SessionError::MalformedHeader { len: buf.len() });
        };

        if matches!(self.state, SessionState::EndOfSession | SessionState::Error) {
            return Err(SessionError::SessionEnded(self.state));
        }

        self.stats.packets_received += 1;

        // First packet establishes the session identity
        if self.state == SessionState::Unknown {
            self.session_id = header.session;
            self.state = SessionState::Active;
            debug!(session = header.session_str(), "session adopted");
        } else if self.session_id != header.session {
            self.state = SessionState::Error;
            return Err(SessionError::SessionMismatch);
        }

        if header.is_heartbeat() {
            self.stats.heartbeats_received += 1;
            trace!(session = header.session_str(), "heartbeat");
            return Ok(PacketStatus::Heartbeat);
        }

        if header.is_end_of_session() {
            self.state = SessionState::EndOfSession;
            info!(session = header.session_str(), "end of session");
            return Ok(PacketStatus::EndOfSession);
        }

        let seq = header.sequence;
        let count = SequenceNumber::from(header.count);

        if seq > self.expected_sequence {
            self.record_gap(seq, sink)?;
        } else if seq < self.expected_sequence && count > 0 {
            // Duplicate or partially duplicate packet: it may close a
            // pending gap, and downstream still sees the recovered
            // data, but the sequence counter never moves backwards.
            self.check_gap_fill(seq, seq.saturating_add(count) - 1);
        }

        let dispatched = self.dispatch_blocks(buf, &header, PACKET_HEADER_LEN, sink);
        self.expected_sequence = self
            .expected_sequence
            .max(seq.saturating_add(dispatched as u64));

        if self.state == SessionState::Stale && self.pending_gaps.is_empty() {
            self.state = SessionState::Active;
        }

        Ok(PacketStatus::Dispatched {
            messages: dispatched,
        })
    }

    /// Feed out-of-band retransmission data: `count` length-prefixed
    /// blocks starting at sequence `start_seq`.
    ///
    /// The range is applied to the pending gap list and the blocks are
    /// dispatched, but `expected_sequence` is untouched; the session
    /// returns to `Active` once the gap list drains.
    pub fn process_retransmission(
        &mut self,
        start_seq: SequenceNumber,
        buf: &[u8],
        count: u16,
        sink: &mut impl PacketSink,
    ) {
        if count > 0 {
            self.check_gap_fill(start_seq, start_seq.saturating_add(u64::from(count)) - 1);
        }

        let header = PacketHeader {
            session: self.session_id,
            sequence: start_seq,
            count,
        };
        self.dispatch_blocks(buf, &header, 0, sink);

        if self.state == SessionState::Stale && self.pending_gaps.is_empty() {
            self.state = SessionState::Active;
        }
    }

    fn record_gap(
        &mut self,
        seq: SequenceNumber,
        sink: &mut impl PacketSink,
    ) -> Result<(), SessionError> {
        if self.pending_gaps.len() >= MAX_PENDING_GAPS {
            self.state = SessionState::Error;
            return Err(SessionError::GapOverflow);
        }

        let gap = Gap {
            start: self.expected_sequence,
            end: seq - 1,
            detected_at_ns: 0,
        };
        warn!(
            start = gap.start,
            end = gap.end,
            "sequence gap detected"
        );

        self.pending_gaps.push(gap);
        self.stats.gaps_detected += 1;
        self.state = SessionState::Stale;
        sink.on_gap(&gap);
        Ok(())
    }

    /// Walk the block list and dispatch every fully contained block.
    /// Returns the number of blocks dispatched.
    fn dispatch_blocks(
        &mut self,
        buf: &[u8],
        header: &PacketHeader,
        start_offset: usize,
        sink: &mut impl PacketSink,
    ) -> usize {
        let mut offset = start_offset;
        let mut sequence = header.sequence;
        let mut dispatched = 0usize;

        for _ in 0..header.count {
            if offset + MESSAGE_BLOCK_LEN > buf.len() {
                break;
            }
            let len = usize::from(read_be16(&buf[offset..]));
            offset += MESSAGE_BLOCK_LEN;

            if offset + len > buf.len() {
                // Block extends past the packet end
                break;
            }

            sink.on_message(&buf[offset..offset + len], sequence);
            self.stats.messages_received += 1;

            offset += len;
            sequence += 1;
            dispatched += 1;
        }

        if dispatched < usize::from(header.count) {
            self.stats.truncated_blocks += 1;
        }
        dispatched
    }

    /// Apply a received range `[range_start, range_end]` to the
    /// pending gap list.
    ///
    /// A range covering a gap removes it; a range touching a gap from
    /// either side shrinks it. A range strictly inside a gap leaves
    /// the gap intact: gaps are never split, so a partial in-middle
    /// fill keeps the whole gap pending.
    fn check_gap_fill(&mut self, range_start: SequenceNumber, range_end: SequenceNumber) {
        self.pending_gaps.retain_mut(|gap| {
            if range_start <= gap.start && range_end >= gap.end {
                false
            } else if range_start <= gap.start && range_end >= gap.start {
                gap.start = range_end + 1;
                true
            } else if range_start <= gap.end && range_end >= gap.end {
                gap.end = range_start - 1;
                true
            } else {
                true
            }
        });
    }

    /// Current session state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Next sequence number the decoder expects
    #[must_use]
    pub const fn expected_sequence(&self) -> SequenceNumber {
        self.expected_sequence
    }

    /// Whether any gap is pending
    #[must_use]
    pub fn has_gaps(&self) -> bool {
        !self.pending_gaps.is_empty()
    }

    /// Pending gaps, disjoint and strictly below `expected_sequence`
    #[must_use]
    pub fn pending_gaps(&self) -> &[Gap] {
        &self.pending_gaps
    }

    /// Adopted session identifier (all zeroes before the first packet)
    #[must_use]
    pub const fn session_id(&self) -> &[u8; SESSION_ID_LEN] {
        &self.session_id
    }

    /// Statistics snapshot
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Session is Active with no pending gaps
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.state == SessionState::Active && self.pending_gaps.is_empty()
    }

    /// Restore the decoder to its initial state for reuse
    pub fn reset(&mut self) {
        self.session_id = [0u8; SESSION_ID_LEN];
        self.expected_sequence = 1;
        self.state = SessionState::Unknown;
        self.pending_gaps.clear();
        self.stats = SessionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire;

    /// Sink collecting dispatched payloads and reported gaps
    #[derive(Default)]
    struct Collect {
        messages: Vec<(Vec<u8>, SequenceNumber)>,
        gaps: Vec<Gap>,
    }

    impl PacketSink for Collect {
        fn on_message(&mut self, payload: &[u8], sequence: SequenceNumber) {
            self.messages.push((payload.to_vec(), sequence));
        }

        fn on_gap(&mut self, gap: &Gap) {
            self.gaps.push(*gap);
        }
    }

    fn msg(byte: u8, len: usize) -> Vec<u8> {
        vec![byte; len]
    }

    #[test]
    fn test_in_order_stream_stays_active() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        // seq_k = 1 + sum of previous counts
        let counts = [2usize, 1, 3, 2];
        let mut seq = 1u64;
        let mut expected_payloads = Vec::new();
        for (i, &count) in counts.iter().enumerate() {
            let blocks: Vec<Vec<u8>> = (0..count).map(|j| msg(i as u8 * 10 + j as u8, 5)).collect();
            expected_payloads.extend(blocks.clone());
            let packet = wire::encode_packet("NASDAQ", seq, &blocks);
            let status = decoder.process_packet(&packet, &mut sink).unwrap();
            assert_eq!(status, PacketStatus::Dispatched { messages: count });
            assert_eq!(decoder.state(), SessionState::Active);
            assert!(!decoder.has_gaps());
            seq += count as u64;
        }

        assert_eq!(decoder.expected_sequence(), 9);
        assert_eq!(sink.messages.len(), 8);
        // Exact wire order and contiguous sequence numbers
        for (i, (payload, seq)) in sink.messages.iter().enumerate() {
            assert_eq!(*seq, i as u64 + 1);
            assert_eq!(payload, &expected_payloads[i]);
        }
        assert!(sink.gaps.is_empty());
    }

    #[test]
    fn test_gap_detection() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let p1 = wire::encode_packet("NASDAQ", 1, &[msg(1, 4), msg(2, 4)]);
        decoder.process_packet(&p1, &mut sink).unwrap();
        assert_eq!(decoder.expected_sequence(), 3);

        // Jump ahead: sequences 3 and 4 are missing
        let p2 = wire::encode_packet("NASDAQ", 5, &[msg(5, 4)]);
        let status = decoder.process_packet(&p2, &mut sink).unwrap();

        assert_eq!(status, PacketStatus::Dispatched { messages: 1 });
        assert_eq!(decoder.state(), SessionState::Stale);
        assert!(decoder.has_gaps());
        assert_eq!(sink.gaps.len(), 1);
        assert_eq!(sink.gaps[0].start, 3);
        assert_eq!(sink.gaps[0].end, 4);
        assert_eq!(decoder.stats().gaps_detected, 1);
        // The post-gap message was still dispatched with its own sequence
        assert_eq!(sink.messages.last().unwrap().1, 5);
        assert_eq!(decoder.expected_sequence(), 6);
    }

    #[test]
    fn test_heartbeat_changes_nothing() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let p1 = wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]);
        decoder.process_packet(&p1, &mut sink).unwrap();
        let p2 = wire::encode_packet("NASDAQ", 5, &[msg(5, 4)]);
        decoder.process_packet(&p2, &mut sink).unwrap();
        assert_eq!(decoder.state(), SessionState::Stale);

        let before_gaps = decoder.pending_gaps().to_vec();
        let heartbeat = wire::heartbeat_packet("NASDAQ");
        let status = decoder.process_packet(&heartbeat, &mut sink).unwrap();

        assert_eq!(status, PacketStatus::Heartbeat);
        assert_eq!(decoder.state(), SessionState::Stale);
        assert_eq!(decoder.expected_sequence(), 6);
        assert_eq!(decoder.pending_gaps(), before_gaps.as_slice());
        assert_eq!(decoder.stats().heartbeats_received, 1);
    }

    #[test]
    fn test_session_adoption_and_mismatch() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let p1 = wire::encode_packet("SESSIONA", 1, &[msg(1, 4)]);
        decoder.process_packet(&p1, &mut sink).unwrap();
        assert_eq!(decoder.session_id(), b"SESSIONA  ");

        let p2 = wire::encode_packet("SESSIONB", 2, &[msg(2, 4)]);
        let err = decoder.process_packet(&p2, &mut sink).unwrap_err();
        assert_eq!(err, SessionError::SessionMismatch);
        assert_eq!(decoder.state(), SessionState::Error);

        // Terminal: even the right session is refused now
        let p3 = wire::encode_packet("SESSIONA", 2, &[msg(2, 4)]);
        assert_eq!(
            decoder.process_packet(&p3, &mut sink),
            Err(SessionError::SessionEnded(SessionState::Error))
        );
    }

    #[test]
    fn test_malformed_header_leaves_state_alone() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let err = decoder.process_packet(&[0u8; 19], &mut sink).unwrap_err();
        assert_eq!(err, SessionError::MalformedHeader { len: 19 });
        assert_eq!(decoder.state(), SessionState::Unknown);
        assert_eq!(decoder.expected_sequence(), 1);
        assert_eq!(decoder.stats().packets_received, 0);
    }

    #[test]
    fn test_duplicate_packet_dispatches_without_advancing() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let p1 = wire::encode_packet("NASDAQ", 1, &[msg(1, 4), msg(2, 4), msg(3, 4)]);
        decoder.process_packet(&p1, &mut sink).unwrap();
        assert_eq!(decoder.expected_sequence(), 4);

        // Retransmission of sequences 1..=2
        let dup = wire::encode_packet("NASDAQ", 1, &[msg(1, 4), msg(2, 4)]);
        let status = decoder.process_packet(&dup, &mut sink).unwrap();

        assert_eq!(status, PacketStatus::Dispatched { messages: 2 });
        assert_eq!(decoder.expected_sequence(), 4);
        assert_eq!(decoder.state(), SessionState::Active);
        assert_eq!(sink.messages.len(), 5);
    }

    #[test]
    fn test_duplicate_closes_gap() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 4, &[msg(4, 4)]), &mut sink)
            .unwrap();
        assert_eq!(decoder.state(), SessionState::Stale);
        assert_eq!(decoder.pending_gaps(), &[Gap { start: 2, end: 3, detected_at_ns: 0 }]);

        // Late arrival of exactly the missing range
        let fill = wire::encode_packet("NASDAQ", 2, &[msg(2, 4), msg(3, 4)]);
        decoder.process_packet(&fill, &mut sink).unwrap();

        assert!(!decoder.has_gaps());
        assert_eq!(decoder.state(), SessionState::Active);
        assert_eq!(decoder.expected_sequence(), 5);
        assert!(decoder.is_healthy());
    }

    #[test]
    fn test_partial_fill_shrinks_gap_from_low_side() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 10, &[msg(10, 4)]), &mut sink)
            .unwrap();
        assert_eq!(decoder.pending_gaps(), &[Gap { start: 2, end: 9, detected_at_ns: 0 }]);

        let fill = wire::encode_packet("NASDAQ", 2, &[msg(2, 4), msg(3, 4)]);
        decoder.process_packet(&fill, &mut sink).unwrap();

        assert_eq!(decoder.pending_gaps(), &[Gap { start: 4, end: 9, detected_at_ns: 0 }]);
        assert_eq!(decoder.state(), SessionState::Stale);
    }

    #[test]
    fn test_middle_hole_fill_leaves_gap_intact() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 10, &[msg(10, 4)]), &mut sink)
            .unwrap();

        // Strictly interior range: gaps are not split
        let fill = wire::encode_packet("NASDAQ", 5, &[msg(5, 4)]);
        decoder.process_packet(&fill, &mut sink).unwrap();

        assert_eq!(decoder.pending_gaps(), &[Gap { start: 2, end: 9, detected_at_ns: 0 }]);
    }

    #[test]
    fn test_partially_duplicate_packet() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        let p1 = wire::encode_packet("NASDAQ", 1, &[msg(1, 4), msg(2, 4), msg(3, 4)]);
        decoder.process_packet(&p1, &mut sink).unwrap();
        assert_eq!(decoder.expected_sequence(), 4);

        // Overlaps the tail and carries two new messages
        let p2 = wire::encode_packet(
            "NASDAQ",
            3,
            &[msg(3, 4), msg(4, 4), msg(5, 4)],
        );
        let status = decoder.process_packet(&p2, &mut sink).unwrap();

        assert_eq!(status, PacketStatus::Dispatched { messages: 3 });
        // Never decreases, extends to cover the new tail
        assert_eq!(decoder.expected_sequence(), 6);
        assert_eq!(decoder.state(), SessionState::Active);
    }

    #[test]
    fn test_truncated_block_stops_dispatch() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        // Declare three blocks but cut the packet inside the third
        let mut packet = wire::encode_packet_with_count(
            "NASDAQ",
            1,
            3,
            &[msg(1, 4), msg(2, 4), msg(3, 8)],
        );
        packet.truncate(packet.len() - 5);

        let status = decoder.process_packet(&packet, &mut sink).unwrap();

        assert_eq!(status, PacketStatus::Dispatched { messages: 2 });
        assert_eq!(sink.messages.len(), 2);
        // Advanced only past what was dispatched; the cut-off tail
        // will surface as a gap when sequence 4 arrives
        assert_eq!(decoder.expected_sequence(), 3);
        assert_eq!(decoder.stats().truncated_blocks, 1);

        let next = wire::encode_packet("NASDAQ", 4, &[msg(4, 4)]);
        decoder.process_packet(&next, &mut sink).unwrap();
        assert_eq!(decoder.pending_gaps(), &[Gap { start: 3, end: 3, detected_at_ns: 0 }]);
    }

    #[test]
    fn test_end_of_session_is_terminal() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        let status = decoder
            .process_packet(&wire::end_of_session_packet("NASDAQ"), &mut sink)
            .unwrap();
        assert_eq!(status, PacketStatus::EndOfSession);
        assert_eq!(decoder.state(), SessionState::EndOfSession);

        let late = wire::encode_packet("NASDAQ", 2, &[msg(2, 4)]);
        assert_eq!(
            decoder.process_packet(&late, &mut sink),
            Err(SessionError::SessionEnded(SessionState::EndOfSession))
        );
    }

    #[test]
    fn test_retransmission_fills_gap_without_advancing() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 4, &[msg(4, 4)]), &mut sink)
            .unwrap();
        assert_eq!(decoder.state(), SessionState::Stale);
        let expected_before = decoder.expected_sequence();

        // Gap-fill blocks arrive out of band, without a packet header
        let blocks = wire::encode_blocks(&[msg(2, 4), msg(3, 4)]);
        decoder.process_retransmission(2, &blocks, 2, &mut sink);

        assert!(!decoder.has_gaps());
        assert_eq!(decoder.state(), SessionState::Active);
        assert_eq!(decoder.expected_sequence(), expected_before);
        let tail: Vec<u64> = sink.messages.iter().map(|(_, s)| *s).rev().take(2).collect();
        assert_eq!(tail, vec![3, 2]);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 5, &[msg(5, 4)]), &mut sink)
            .unwrap();
        decoder
            .process_packet(&wire::heartbeat_packet("NASDAQ"), &mut sink)
            .unwrap();

        decoder.reset();

        assert_eq!(decoder.state(), SessionState::Unknown);
        assert_eq!(decoder.expected_sequence(), 1);
        assert!(!decoder.has_gaps());
        assert_eq!(*decoder.stats(), SessionStats::default());
    }

    #[test]
    fn test_gap_overflow_is_terminal() {
        let mut decoder = SessionDecoder::new();
        let mut sink = Collect::default();

        decoder
            .process_packet(&wire::encode_packet("NASDAQ", 1, &[msg(1, 4)]), &mut sink)
            .unwrap();

        // Every packet skips one sequence, opening a fresh gap
        let mut seq = 3u64;
        let mut result = Ok(PacketStatus::Heartbeat);
        for _ in 0..=MAX_PENDING_GAPS {
            let packet = wire::encode_packet("NASDAQ", seq, &[msg(0, 4)]);
            result = decoder.process_packet(&packet, &mut sink);
            if result.is_err() {
                break;
            }
            seq += 2;
        }

        assert_eq!(result, Err(SessionError::GapOverflow));
        assert_eq!(decoder.state(), SessionState::Error);
        assert_eq!(decoder.pending_gaps().len(), MAX_PENDING_GAPS);
    }
}
