//! # tickwire-session
//!
//! MoldUDP64 session-layer decoder.
//!
//! MoldUDP64 is the venue's session protocol wrapping the message
//! stream: a 20-byte header (10-byte ASCII session identifier, 64-bit
//! sequence number, 16-bit message count) followed by length-prefixed
//! message blocks. This crate provides:
//! - [`PacketHeader`]: header parsing plus heartbeat / end-of-session
//!   classification
//! - [`SessionDecoder`]: sequence tracking, gap detection, in-order
//!   dispatch of the embedded messages, and session state management
//! - [`wire`]: packet encoders for tests, benches and replay tooling
//!
//! Retransmission requests are out of scope: the decoder only detects
//! gaps, reports them through the sink, and accepts gap-fill data when
//! it arrives.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

mod decoder;
mod error;
mod header;
pub mod wire;

pub use decoder::{
    Gap, PacketSink, PacketStatus, SessionDecoder, SessionState, SessionStats,
};
pub use error::SessionError;
pub use header::{PacketHeader, END_OF_SESSION_SEQUENCE, HEARTBEAT_SEQUENCE};
