//! Stream batch tests

use serde_json::json;

use super::batch::{EncodedRecord, StreamBatch};

fn record_of_size(bytes: usize) -> EncodedRecord {
    EncodedRecord {
        json: json!({}),
        data: vec![b'x'; bytes],
    }
}

#[test]
fn test_accepts_until_budget() {
    let mut batch = StreamBatch::new(100);

    assert!(batch.push(record_of_size(40)).is_none());
    assert!(batch.push(record_of_size(40)).is_none());
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.byte_size(), 80);
}

#[test]
fn test_overflowing_record_is_returned_intact() {
    let mut batch = StreamBatch::new(100);
    batch.push(record_of_size(80));

    let returned = batch.push(record_of_size(30));

    let returned = returned.expect("record should not fit");
    assert_eq!(returned.len(), 30);
    // the batch is untouched by the refused push
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.byte_size(), 80);
}

#[test]
fn test_oversized_record_accepted_when_empty() {
    let mut batch = StreamBatch::new(100);

    assert!(batch.push(record_of_size(500)).is_none());
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.byte_size(), 500);
}

#[test]
fn test_take_resets_batch() {
    let mut batch = StreamBatch::new(100);
    batch.push(record_of_size(60));

    let records = batch.take();

    assert_eq!(records.len(), 1);
    assert!(batch.is_empty());
    assert_eq!(batch.byte_size(), 0);

    // a previously refused size now fits
    assert!(batch.push(record_of_size(90)).is_none());
}

#[test]
fn test_returned_record_fits_fresh_batch() {
    let mut batch = StreamBatch::new(100);
    batch.push(record_of_size(80));

    let returned = batch.push(record_of_size(50)).expect("should overflow");
    batch.take();

    assert!(batch.push(returned).is_none());
    assert_eq!(batch.byte_size(), 50);
}
