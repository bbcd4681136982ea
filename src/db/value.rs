//! Firestore typed values
//!
//! The REST API wraps every field in a single-key object naming its type
//! (`{"stringValue": "Lamp"}`, `{"integerValue": "42"}`, ...). Entities are
//! decoded from plain JSON, so documents are converted at the store boundary.

use std::collections::HashMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single Firestore field value in its REST encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue(()),
    BooleanValue(bool),
    /// int64 travels as a decimal string
    #[serde(with = "int64")]
    IntegerValue(i64),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, FirestoreValue>,
}

mod int64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
            Raw::Number(n) => Ok(n),
        }
    }
}

impl FirestoreValue {
    /// Converts into plain JSON; timestamps, bytes and references become strings
    pub fn into_json(self) -> Value {
        match self {
            FirestoreValue::NullValue(()) => Value::Null,
            FirestoreValue::BooleanValue(b) => Value::Bool(b),
            FirestoreValue::IntegerValue(i) => Value::from(i),
            FirestoreValue::DoubleValue(d) => Number::from_f64(d).map(Value::Number).unwrap_or(Value::Null),
            FirestoreValue::TimestampValue(s)
            | FirestoreValue::StringValue(s)
            | FirestoreValue::BytesValue(s)
            | FirestoreValue::ReferenceValue(s) => Value::String(s),
            FirestoreValue::GeoPointValue(point) => {
                let mut map = Map::new();
                map.insert("latitude".to_string(), Value::from(point.latitude));
                map.insert("longitude".to_string(), Value::from(point.longitude));
                Value::Object(map)
            }
            FirestoreValue::ArrayValue(array) => {
                Value::Array(array.values.into_iter().map(FirestoreValue::into_json).collect())
            }
            FirestoreValue::MapValue(map) => Value::Object(decode_fields(map.fields)),
        }
    }

    /// Encodes plain JSON. RFC 3339 strings are written as timestamps so that
    /// ordering on date fields behaves like the seeded data.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FirestoreValue::NullValue(()),
            Value::Bool(b) => FirestoreValue::BooleanValue(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FirestoreValue::IntegerValue(i),
                None => FirestoreValue::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) if DateTime::parse_from_rfc3339(s).is_ok() => {
                FirestoreValue::TimestampValue(s.clone())
            }
            Value::String(s) => FirestoreValue::StringValue(s.clone()),
            Value::Array(values) => FirestoreValue::ArrayValue(ArrayValue {
                values: values.iter().map(FirestoreValue::from_json).collect(),
            }),
            Value::Object(map) => FirestoreValue::MapValue(MapValue {
                fields: encode_fields(map),
            }),
        }
    }
}

/// Converts a Firestore field map into a plain JSON object
pub fn decode_fields(fields: HashMap<String, FirestoreValue>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| (name, value.into_json()))
        .collect()
}

/// Converts a plain JSON object into a Firestore field map
pub fn encode_fields(fields: &Map<String, Value>) -> HashMap<String, FirestoreValue> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), FirestoreValue::from_json(value)))
        .collect()
}
