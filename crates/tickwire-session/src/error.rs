//! Session-layer error types.

use thiserror::Error;

use crate::decoder::SessionState;

/// Failures surfaced by the session decoder.
///
/// A truncated message block inside an otherwise valid packet is not
/// an error: dispatch stops at the last complete block and the packet
/// is accepted up to that point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Packet shorter than the 20-byte session header. State is not
    /// mutated.
    #[error("packet too short for session header: {len} bytes")]
    MalformedHeader {
        /// Length of the rejected packet
        len: usize,
    },

    /// Session identifier does not match the one adopted from the
    /// first packet. Fatal for this decoder instance.
    #[error("session identifier mismatch")]
    SessionMismatch,

    /// The pending gap list hit its bound. Fatal: the producer path
    /// may not allocate without limit.
    #[error("pending gap list overflow")]
    GapOverflow,

    /// Packet arrived after the session reached a terminal state.
    #[error("session already terminated in state {0:?}")]
    SessionEnded(SessionState),
}
