//! Wire record - the decoded forward-protocol tuple

use rmpv::Value;

use crate::{ProtocolError, Result};

/// One decoded forward-protocol record: `[tag, timestamp, fields]`
///
/// The fields map keeps its original key order and its dynamically typed
/// values. Map keys are converted to owned strings at decode time so the
/// downstream transformers never have to re-check them.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRecord {
    /// Routing tag assigned by the shipping agent (e.g. `app.nginx`)
    pub tag: String,

    /// Event time in seconds since the Unix epoch
    pub timestamp: i64,

    /// Event payload as ordered key/value pairs
    pub fields: Vec<(String, Value)>,
}

impl WireRecord {
    /// Validate and convert a decoded MessagePack value into a record
    ///
    /// The tuple must be a 3-element array of `(string, integer, map)`
    /// with string map keys. Anything else is a protocol error.
    pub fn from_value(value: Value) -> Result<Self> {
        let elems = match value {
            Value::Array(elems) => elems,
            other => return Err(ProtocolError::NotAnArray(type_name(&other))),
        };

        let len = elems.len();
        let [tag_value, ts_value, fields_value]: [Value; 3] = elems
            .try_into()
            .map_err(|_| ProtocolError::WrongArity(len))?;

        let tag = match tag_value {
            Value::String(s) => s
                .into_str()
                .ok_or(ProtocolError::InvalidTag("non-UTF-8 string"))?,
            other => return Err(ProtocolError::InvalidTag(type_name(&other))),
        };

        let timestamp = match ts_value {
            Value::Integer(i) => i
                .as_i64()
                .ok_or(ProtocolError::InvalidTimestamp("out-of-range integer"))?,
            other => return Err(ProtocolError::InvalidTimestamp(type_name(&other))),
        };

        let pairs = match fields_value {
            Value::Map(pairs) => pairs,
            other => return Err(ProtocolError::InvalidFields(type_name(&other))),
        };

        let mut fields = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let key = match key {
                Value::String(s) => s
                    .into_str()
                    .ok_or(ProtocolError::NonStringKey("non-UTF-8 string"))?,
                other => return Err(ProtocolError::NonStringKey(type_name(&other))),
            };
            fields.push((key, value));
        }

        Ok(Self {
            tag,
            timestamp,
            fields,
        })
    }

    /// Look up a field value by key (first match wins)
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

/// Human-readable MessagePack type name for error messages
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::F32(_) | Value::F64(_) => "float",
        Value::String(_) => "string",
        Value::Binary(_) => "binary",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Ext(..) => "ext",
    }
}
