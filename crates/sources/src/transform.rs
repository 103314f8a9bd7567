//! Record transformer
//!
//! Pure conversions from one [`WireRecord`] into the documents the sinks
//! consume: an index document for Elasticsearch and, when the secondary
//! pipeline runs, a stream record for Kinesis. The two derivations take
//! independent copies of the fields map, since each mutates different
//! keys.

use esrelay_protocol::{Value, WireRecord};
use serde_json::{json, Map, Value as Json};

/// Cycle length stamped into every stream-record metric entry (seconds)
const METRIC_CYCLE_SECS: i64 = 30;

/// Per-record document builder
///
/// Holds the (optional) enrichment field names so the connection handler
/// does not have to thread configuration through every call.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    /// Document key that receives the record tag, if configured
    pub tag_field: Option<String>,

    /// Document key that receives the timestamp in milliseconds, if
    /// configured
    pub time_field: Option<String>,
}

impl Transformer {
    /// Build the Elasticsearch document for a record
    ///
    /// The document is the fields map itself; tag and time enrichment are
    /// only added when the corresponding field name is configured, so an
    /// unconfigured transformer returns the raw fields unmodified.
    pub fn index_document(&self, record: &WireRecord) -> Json {
        let mut doc = fields_to_json(record);

        if let Some(tag_field) = &self.tag_field {
            doc.insert(tag_field.clone(), Json::from(record.tag.clone()));
        }
        if let Some(time_field) = &self.time_field {
            // Saturating: a hostile timestamp must not trip the debug
            // overflow check
            doc.insert(
                time_field.clone(),
                Json::from(record.timestamp.saturating_mul(1000)),
            );
        }

        Json::Object(doc)
    }

    /// Build the Kinesis stream record for a record, or `None` to drop it
    ///
    /// `instanceid` becomes `namespace` and `_value` becomes `value`,
    /// each removed after the copy. A record without a usable
    /// `instanceid` or `_value` is dropped silently: that is defined
    /// filtering, not an error.
    pub fn stream_record(&self, record: &WireRecord, received_at: i64) -> Option<Json> {
        let mut doc = fields_to_json(record);

        let namespace = take_required(&mut doc, "instanceid")?;
        let value = take_required(&mut doc, "_value")?;

        doc.insert("namespace".into(), namespace);
        doc.insert("timestamp".into(), Json::from(record.timestamp));
        doc.insert("value".into(), value.clone());
        doc.insert("receivetime".into(), Json::from(received_at));
        doc.insert(
            "metrics".into(),
            Json::Array(vec![json!({
                "name": record.tag,
                "value": value,
                "type": "number",
                "cycle": METRIC_CYCLE_SECS,
            })]),
        );

        Some(Json::Object(doc))
    }
}

/// Remove a key that must exist with a non-null value
fn take_required(doc: &mut Map<String, Json>, key: &str) -> Option<Json> {
    match doc.remove(key) {
        Some(Json::Null) | None => None,
        Some(value) => Some(value),
    }
}

/// Copy the record's fields map into a fresh JSON object
fn fields_to_json(record: &WireRecord) -> Map<String, Json> {
    let mut doc = Map::with_capacity(record.fields.len());
    for (key, value) in &record.fields {
        doc.insert(key.clone(), msgpack_to_json(value));
    }
    doc
}

/// Convert a dynamically typed MessagePack value to JSON
///
/// Binary payloads are carried as (lossy) UTF-8 strings; ext values have
/// no JSON counterpart and collapse to null.
fn msgpack_to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Boolean(b) => Json::from(*b),
        Value::Integer(i) => {
            if let Some(n) = i.as_i64() {
                Json::from(n)
            } else if let Some(n) = i.as_u64() {
                Json::from(n)
            } else {
                Json::Null
            }
        }
        Value::F32(f) => serde_json::Number::from_f64(f64::from(*f))
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::F64(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String(s) => Json::from(String::from_utf8_lossy(s.as_bytes()).into_owned()),
        Value::Binary(b) => Json::from(String::from_utf8_lossy(b).into_owned()),
        Value::Array(items) => Json::Array(items.iter().map(msgpack_to_json).collect()),
        Value::Map(pairs) => {
            let mut obj = Map::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = match key.as_str() {
                    Some(s) => s.to_string(),
                    None => key.to_string(),
                };
                obj.insert(key, msgpack_to_json(value));
            }
            Json::Object(obj)
        }
        Value::Ext(..) => Json::Null,
    }
}
