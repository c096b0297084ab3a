//! Ethernet/IPv4/UDP header readers.
//!
//! Just enough link-layer handling to strip the framing off a
//! multicast datagram and hand the session payload onwards. The IPv4
//! header is skipped by its encoded length, so options are tolerated;
//! checksums are not verified.

use tickwire_core::constants::PACKET_HEADER_LEN;
use tickwire_core::endian::read_be16;

/// Ethernet II header size
pub const ETHERNET_HEADER_LEN: usize = 14;

/// IPv4 header size without options
pub const IPV4_MIN_HEADER_LEN: usize = 20;

/// UDP header size
pub const UDP_HEADER_LEN: usize = 8;

/// EtherType for IPv4
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// IP protocol number for UDP
pub const IP_PROTO_UDP: u8 = 17;

/// Smallest framed packet that can carry a session-layer header
pub const MIN_FRAMED_LEN: usize =
    ETHERNET_HEADER_LEN + IPV4_MIN_HEADER_LEN + UDP_HEADER_LEN + PACKET_HEADER_LEN;

/// Strip Ethernet, IPv4 and UDP headers off `frame` and return the
/// UDP payload.
///
/// Returns `None` when the frame is too short, not IPv4, not UDP, or
/// its IPv4 header length field is inconsistent.
#[must_use]
pub fn udp_payload(frame: &[u8]) -> Option<&[u8]> {
    if frame.len() < MIN_FRAMED_LEN {
        return None;
    }

    let ether_type = read_be16(&frame[12..14]);
    if ether_type != ETHERTYPE_IPV4 {
        return None;
    }

    let ip = &frame[ETHERNET_HEADER_LEN..];
    // Low nibble of the first byte is the header length in 32-bit words
    let ip_header_len = usize::from(ip[0] & 0x0F) * 4;
    if ip_header_len < IPV4_MIN_HEADER_LEN {
        return None;
    }
    if ip[9] != IP_PROTO_UDP {
        return None;
    }

    let payload_offset = ETHERNET_HEADER_LEN + ip_header_len + UDP_HEADER_LEN;
    if payload_offset > frame.len() {
        return None;
    }
    Some(&frame[payload_offset..])
}

/// Wrap `payload` in minimal Ethernet/IPv4/UDP framing, for tests and
/// capture replay tooling.
#[must_use]
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(MIN_FRAMED_LEN + payload.len());

    // Ethernet: zeroed MACs, IPv4 ethertype
    frame.extend_from_slice(&[0u8; 12]);
    frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    // IPv4: version 4, IHL 5, UDP, zeroed checksum and addresses
    let total_len = (IPV4_MIN_HEADER_LEN + UDP_HEADER_LEN + payload.len()) as u16;
    frame.push(0x45);
    frame.push(0);
    frame.extend_from_slice(&total_len.to_be_bytes());
    frame.extend_from_slice(&[0u8; 4]); // identification, flags/fragment
    frame.push(64); // ttl
    frame.push(IP_PROTO_UDP);
    frame.extend_from_slice(&[0u8; 10]); // checksum, src, dst

    // UDP: zeroed ports and checksum
    let udp_len = (UDP_HEADER_LEN + payload.len()) as u16;
    frame.extend_from_slice(&[0u8; 4]);
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&[0u8; 2]);

    frame.extend_from_slice(payload);
    frame
}
