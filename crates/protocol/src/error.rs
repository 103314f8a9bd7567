//! Protocol error types
//!
//! Errors that can occur while decoding forward-protocol records.

use thiserror::Error;

/// Errors that can occur during protocol operations
///
/// All of these are connection-local: the handler logs the error and
/// closes the offending connection, leaving every other connection and
/// the process itself untouched.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Top-level value is not a MessagePack array
    #[error("record is not an array: got {0}")]
    NotAnArray(&'static str),

    /// Tuple does not have exactly three elements
    #[error("record has {0} elements, expected 3 (tag, timestamp, fields)")]
    WrongArity(usize),

    /// Tag element is missing or not a UTF-8 string
    #[error("record tag is not a UTF-8 string: got {0}")]
    InvalidTag(&'static str),

    /// Timestamp element is not an integer that fits in i64
    #[error("record timestamp is not an integer: got {0}")]
    InvalidTimestamp(&'static str),

    /// Fields element is not a map
    #[error("record fields is not a map: got {0}")]
    InvalidFields(&'static str),

    /// A fields-map key is not a UTF-8 string
    #[error("field key is not a UTF-8 string: got {0}")]
    NonStringKey(&'static str),

    /// The byte stream itself is not valid MessagePack
    #[error("malformed msgpack stream: {0}")]
    Malformed(#[from] rmpv::decode::Error),
}
