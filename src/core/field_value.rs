//! Values stored in the data map of a log record

use super::value_serializer::to_field_value;
use chrono::{DateTime, Utc};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Value type for structured logging fields
#[derive(Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
    Timestamp(DateTime<Utc>),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    /// A value whose conversion failed; it fails again when serialized
    Unencodable(String),
}

impl FieldValue {
    /// Convert any serde-serializable value.
    ///
    /// A value that cannot be converted is kept as [`FieldValue::Unencodable`]
    /// so the failure is reported by the serializer instead of being lost.
    /// Floats are kept as they are, so NaN and infinities fail there too.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match to_field_value(value) {
            Ok(field) => field,
            Err(e) => FieldValue::Unencodable(e.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(l) => Some(l),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::UInt(u) => serializer.serialize_u64(*u),
            FieldValue::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            FieldValue::Float(f) => Err(S::Error::custom(format!(
                "float value {} is not representable",
                f
            ))),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Timestamp(t) => serializer.serialize_str(&t.to_rfc3339()),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            FieldValue::Unencodable(reason) => Err(S::Error::custom(format!(
                "value is not representable: {}",
                reason
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => FieldValue::Map(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

// Terminal-oriented dump used by the single-line serializer.
impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{:?}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => f.write_str("null"),
            FieldValue::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            FieldValue::List(items) => f.debug_list().entries(items).finish(),
            FieldValue::Map(entries) => f.debug_map().entries(entries).finish(),
            FieldValue::Unencodable(reason) => write!(f, "<unencodable: {}>", reason),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::UInt(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(t)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(entries: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_json() {
        assert_eq!(serde_json::to_string(&FieldValue::from("v")).unwrap(), "\"v\"");
        assert_eq!(serde_json::to_string(&FieldValue::from(-3)).unwrap(), "-3");
        assert_eq!(serde_json::to_string(&FieldValue::from(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        assert!(serde_json::to_string(&FieldValue::Float(f64::NAN)).is_err());
        assert!(serde_json::to_string(&FieldValue::Float(f64::INFINITY)).is_err());
        assert_eq!(serde_json::to_string(&FieldValue::Float(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_nested_unencodable_is_rejected() {
        let value = FieldValue::List(vec![
            FieldValue::from(1),
            FieldValue::Unencodable("bad key".to_string()),
        ]);
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(serde::Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let value = FieldValue::from_serialize(&Point { x: 1, y: 2 });
        let map = value.as_map().expect("struct becomes a map");
        assert_eq!(map["x"], FieldValue::Int(1));
        assert_eq!(map["y"], FieldValue::Int(2));
    }

    #[test]
    fn test_from_serialize_failure_is_kept() {
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], "non-string key");

        let value = FieldValue::from_serialize(&bad);
        assert!(matches!(value, FieldValue::Unencodable(_)));
    }

    #[test]
    fn test_from_serialize_keeps_non_finite_float() {
        #[derive(serde::Serialize)]
        struct Stats {
            ratio: f64,
        }

        let value = FieldValue::from_serialize(&Stats { ratio: f64::NAN });
        let map = value.as_map().expect("struct becomes a map");
        assert!(matches!(map["ratio"], FieldValue::Float(f) if f.is_nan()));
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_debug_dump() {
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), FieldValue::from("v"));
        map.insert("n".to_string(), FieldValue::from(vec![1, 2]));
        assert_eq!(format!("{:?}", FieldValue::Map(map)), r#"{"k": "v", "n": [1, 2]}"#);
    }
}
