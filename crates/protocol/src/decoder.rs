//! Incremental frame decoder
//!
//! MessagePack is self-delimiting, so decoding straight off the read
//! buffer works: if the buffer holds a complete value we consume exactly
//! its bytes, and a truncated value surfaces as `UnexpectedEof` from the
//! cursor, which means "wait for the next socket read".

use std::io::{Cursor, ErrorKind};

use bytes::{Buf, BytesMut};
use rmpv::decode;

use crate::{ProtocolError, Result, WireRecord};

/// Incremental decoder for a stream of forward-protocol tuples
///
/// One decoder instance per connection. Feed it the connection's read
/// buffer after every socket read and drain records until it returns
/// `Ok(None)`.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    records: u64,
}

impl FrameDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records decoded so far on this connection
    pub fn records_decoded(&self) -> u64 {
        self.records
    }

    /// Try to decode one record from the front of `buf`
    ///
    /// - `Ok(Some(record))`: a complete tuple was consumed from `buf`.
    /// - `Ok(None)`: `buf` holds only a partial value; read more bytes.
    /// - `Err(_)`: the stream is malformed; the connection must be closed.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<WireRecord>> {
        if buf.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(&buf[..]);
        match decode::read_value(&mut cursor) {
            Ok(value) => {
                let consumed = cursor.position() as usize;
                buf.advance(consumed);
                let record = WireRecord::from_value(value)?;
                self.records += 1;
                Ok(Some(record))
            }
            Err(err) if is_incomplete(&err) => Ok(None),
            Err(err) => Err(ProtocolError::Malformed(err)),
        }
    }
}

/// A decode error caused by buffer truncation rather than bad data
fn is_incomplete(err: &decode::Error) -> bool {
    match err {
        decode::Error::InvalidMarkerRead(io) | decode::Error::InvalidDataRead(io) => {
            io.kind() == ErrorKind::UnexpectedEof
        }
        _ => false,
    }
}
