//! Session-layer packet encoders.
//!
//! Byte-exact builders for tests, benches and replay tooling. The
//! decoder itself never writes packets.

use tickwire_core::constants::{PACKET_HEADER_LEN, SESSION_ID_LEN};

use crate::header::END_OF_SESSION_SEQUENCE;

fn push_session(buf: &mut Vec<u8>, session: &str) {
    let mut id = [b' '; SESSION_ID_LEN];
    for (dst, src) in id.iter_mut().zip(session.bytes()) {
        *dst = src;
    }
    buf.extend_from_slice(&id);
}

/// Encode message bodies as length-prefixed blocks, without a packet
/// header. This is the shape retransmission payloads arrive in.
#[must_use]
pub fn encode_blocks(messages: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = messages.iter().map(|m| m.len() + 2).sum();
    let mut buf = Vec::with_capacity(total);
    for message in messages {
        buf.extend_from_slice(&(message.len() as u16).to_be_bytes());
        buf.extend_from_slice(message);
    }
    buf
}

/// Encode a packet whose declared count matches the block list.
#[must_use]
pub fn encode_packet(session: &str, sequence: u64, messages: &[Vec<u8>]) -> Vec<u8> {
    encode_packet_with_count(session, sequence, messages.len() as u16, messages)
}

/// Encode a packet with an explicit declared count, which tests use
/// to build truncated or inconsistent packets.
#[must_use]
pub fn encode_packet_with_count(
    session: &str,
    sequence: u64,
    count: u16,
    messages: &[Vec<u8>],
) -> Vec<u8> {
    let blocks = encode_blocks(messages);
    let mut buf = Vec::with_capacity(PACKET_HEADER_LEN + blocks.len());
    push_session(&mut buf, session);
    buf.extend_from_slice(&sequence.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    buf.extend_from_slice(&blocks);
    buf
}

/// Encode a heartbeat: sequence 0, count 0, no blocks.
#[must_use]
pub fn heartbeat_packet(session: &str) -> Vec<u8> {
    encode_packet(session, 0, &[])
}

/// Encode an end-of-session announcement.
#[must_use]
pub fn end_of_session_packet(session: &str) -> Vec<u8> {
    encode_packet(session, END_OF_SESSION_SEQUENCE, &[])
}
