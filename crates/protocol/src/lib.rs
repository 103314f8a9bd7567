//! esrelay protocol - fluentd forward wire format
//!
//! The forward protocol is a raw TCP stream of MessagePack-encoded
//! 3-element tuples: `[tag, timestamp, fields]`. There is no framing
//! beyond MessagePack itself, so the decoder works incrementally over a
//! growable read buffer and yields one [`WireRecord`] per complete tuple.
//!
//! # Design
//!
//! - **Dynamically typed payloads**: field values are [`rmpv::Value`],
//!   since log shippers send arbitrary key/value maps.
//! - **Checked extraction**: every shape assumption about the tuple is a
//!   typed [`ProtocolError`], never an unchecked cast. A malformed tuple
//!   terminates the producing connection, nothing else.
//! - **Incremental decode**: [`FrameDecoder::decode`] distinguishes
//!   "needs more bytes" from "malformed stream" so a connection handler can
//!   keep reading until a tuple completes.

mod decoder;
mod error;
mod record;

pub use decoder::FrameDecoder;
pub use error::ProtocolError;
pub use record::WireRecord;

pub use rmpv::Value;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

// Test modules - only compiled during testing
#[cfg(test)]
mod decoder_test;
