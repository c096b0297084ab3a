//! MoldUDP64 packet header.
//!
//! Layout (20 bytes, big-endian integers):
//!
//! | offset | field      | size |
//! |--------|------------|------|
//! | 0      | session id | 10   |
//! | 10     | sequence   | 8    |
//! | 18     | count      | 2    |
//!
//! Each of the `count` following blocks is a 2-byte big-endian length
//! and exactly that many bytes of message payload.

use tickwire_core::constants::{PACKET_HEADER_LEN, SESSION_ID_LEN};
use tickwire_core::endian::{read_be16, read_be64};
use tickwire_core::types::{MessageCount, SequenceNumber};

/// Sequence number of a heartbeat packet (together with count 0)
pub const HEARTBEAT_SEQUENCE: SequenceNumber = 0;

/// Sequence number announcing the end of the session
pub const END_OF_SESSION_SEQUENCE: SequenceNumber = u64::MAX;

/// Parsed session-layer packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Session identifier, ASCII right-padded with spaces
    pub session: [u8; SESSION_ID_LEN],
    /// Sequence number of the first message in this packet
    pub sequence: SequenceNumber,
    /// Number of message blocks in this packet
    pub count: MessageCount,
}

impl PacketHeader {
    /// Parse the 20-byte header off the front of `buf`. Returns `None`
    /// if the buffer is too short.
    #[must_use]
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < PACKET_HEADER_LEN {
            return None;
        }
        let mut session = [0u8; SESSION_ID_LEN];
        session.copy_from_slice(&buf[..SESSION_ID_LEN]);
        Some(Self {
            session,
            sequence: read_be64(&buf[10..18]),
            count: read_be16(&buf[18..20]),
        })
    }

    /// Heartbeat: sequence 0 with no messages
    #[inline]
    #[must_use]
    pub const fn is_heartbeat(&self) -> bool {
        self.sequence == HEARTBEAT_SEQUENCE && self.count == 0
    }

    /// End-of-session announcement
    #[inline]
    #[must_use]
    pub const fn is_end_of_session(&self) -> bool {
        self.sequence == END_OF_SESSION_SEQUENCE
    }

    /// Session identifier with trailing spaces trimmed
    #[must_use]
    pub fn session_str(&self) -> &str {
        std::str::from_utf8(&self.session)
            .unwrap_or("")
            .trim_end_matches(' ')
    }
}
