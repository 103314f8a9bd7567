//! Frame decoder tests

use bytes::BytesMut;
use rmpv::Value;

use crate::{FrameDecoder, ProtocolError};

/// Encode one forward tuple to raw msgpack bytes
fn encode_tuple(tag: &str, ts: i64, fields: Vec<(Value, Value)>) -> Vec<u8> {
    let value = Value::Array(vec![
        Value::from(tag),
        Value::from(ts),
        Value::Map(fields),
    ]);
    let mut out = Vec::new();
    rmpv::encode::write_value(&mut out, &value).unwrap();
    out
}

#[test]
fn test_decode_single_record() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&encode_tuple(
        "app.test",
        1700000000,
        vec![(Value::from("k"), Value::from("v"))],
    ));

    let mut decoder = FrameDecoder::new();
    let record = decoder.decode(&mut buf).unwrap().unwrap();

    assert_eq!(record.tag, "app.test");
    assert_eq!(record.timestamp, 1700000000);
    assert!(buf.is_empty());
    assert_eq!(decoder.records_decoded(), 1);
}

#[test]
fn test_decode_empty_buffer() {
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::new();
    assert!(decoder.decode(&mut buf).unwrap().is_none());
}

#[test]
fn test_decode_consecutive_records() {
    let mut buf = BytesMut::new();
    for i in 0..5i64 {
        buf.extend_from_slice(&encode_tuple("t", i, vec![]));
    }

    let mut decoder = FrameDecoder::new();
    for i in 0..5i64 {
        let record = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(record.timestamp, i);
    }
    assert!(decoder.decode(&mut buf).unwrap().is_none());
    assert_eq!(decoder.records_decoded(), 5);
}

#[test]
fn test_decode_partial_then_complete() {
    let encoded = encode_tuple("t", 42, vec![(Value::from("k"), Value::from("v"))]);
    let split = encoded.len() / 2;

    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::new();

    // First half: not enough bytes yet, buffer must stay intact
    buf.extend_from_slice(&encoded[..split]);
    assert!(decoder.decode(&mut buf).unwrap().is_none());
    assert_eq!(buf.len(), split);

    // Second half completes the tuple
    buf.extend_from_slice(&encoded[split..]);
    let record = decoder.decode(&mut buf).unwrap().unwrap();
    assert_eq!(record.timestamp, 42);
    assert!(buf.is_empty());
}

#[test]
fn test_decode_every_split_point() {
    let encoded = encode_tuple("split", 7, vec![(Value::from("a"), Value::from(1))]);

    for split in 1..encoded.len() {
        let mut decoder = FrameDecoder::new();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(&encoded[..split]);
        while decoder.decode(&mut buf).unwrap().is_some() {}

        buf.extend_from_slice(&encoded[split..]);
        let record = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(record.tag, "split");
    }
}

#[test]
fn test_decode_valid_msgpack_invalid_shape() {
    // A bare string is valid msgpack but not a forward tuple
    let mut bytes = Vec::new();
    rmpv::encode::write_value(&mut bytes, &Value::from("oops")).unwrap();
    let mut buf = BytesMut::from(&bytes[..]);

    let mut decoder = FrameDecoder::new();
    let err = decoder.decode(&mut buf).unwrap_err();
    assert!(matches!(err, ProtocolError::NotAnArray(_)));
}

#[test]
fn test_decode_record_order_preserved() {
    let mut buf = BytesMut::new();
    buf.extend_from_slice(&encode_tuple("first", 1, vec![]));
    buf.extend_from_slice(&encode_tuple("second", 2, vec![]));

    let mut decoder = FrameDecoder::new();
    assert_eq!(decoder.decode(&mut buf).unwrap().unwrap().tag, "first");
    assert_eq!(decoder.decode(&mut buf).unwrap().unwrap().tag, "second");
}
