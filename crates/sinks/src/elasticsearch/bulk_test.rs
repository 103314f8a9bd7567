//! Bulk buffer tests

use serde_json::json;

use super::bulk::{build_body, BulkBuffer};

#[test]
fn test_count_trigger() {
    let mut buffer = BulkBuffer::new(3, usize::MAX);

    buffer.push(&json!({"n": 1})).unwrap();
    buffer.push(&json!({"n": 2})).unwrap();
    assert!(!buffer.is_full());

    buffer.push(&json!({"n": 3})).unwrap();
    assert!(buffer.is_full());
}

#[test]
fn test_byte_trigger() {
    let mut buffer = BulkBuffer::new(usize::MAX, 20);

    buffer.push(&json!({"k": "v"})).unwrap();
    assert!(!buffer.is_full());

    buffer.push(&json!({"k": "a much longer value"})).unwrap();
    assert!(buffer.is_full());
    assert!(buffer.byte_size() >= 20);
}

#[test]
fn test_take_resets_buffer() {
    let mut buffer = BulkBuffer::new(2, usize::MAX);
    buffer.push(&json!({"n": 1})).unwrap();
    buffer.push(&json!({"n": 2})).unwrap();
    assert!(buffer.is_full());

    let docs = buffer.take();

    assert_eq!(docs.len(), 2);
    assert!(buffer.is_empty());
    assert_eq!(buffer.byte_size(), 0);
    assert!(!buffer.is_full());
}

#[test]
fn test_take_preserves_arrival_order() {
    let mut buffer = BulkBuffer::new(10, usize::MAX);
    for i in 0..5 {
        buffer.push(&json!({"seq": i})).unwrap();
    }

    let docs = buffer.take();

    for (i, doc) in docs.iter().enumerate() {
        let parsed: serde_json::Value = serde_json::from_slice(doc).unwrap();
        assert_eq!(parsed["seq"], json!(i));
    }
}

#[test]
fn test_build_body_ndjson_shape() {
    let docs = vec![
        serde_json::to_vec(&json!({"a": 1})).unwrap(),
        serde_json::to_vec(&json!({"b": 2})).unwrap(),
    ];

    let body = build_body("logs-2024.03.07", "main", &docs);
    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    for action_line in [lines[0], lines[2]] {
        let action: serde_json::Value = serde_json::from_str(action_line).unwrap();
        assert_eq!(action["index"]["_index"], json!("logs-2024.03.07"));
        assert_eq!(action["index"]["_type"], json!("main"));
        assert!(action["index"].get("_id").is_none());
    }
    assert_eq!(lines[1], r#"{"a":1}"#);
    assert_eq!(lines[3], r#"{"b":2}"#);
    assert!(text.ends_with('\n'));
}

#[test]
fn test_build_body_empty() {
    assert!(build_body("idx", "t", &[]).is_empty());
}
