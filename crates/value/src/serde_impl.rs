//! Serde support for [`Value`].
//!
//! Encodings are JSON-natural: scalars map to their JSON counterparts and
//! instants serialize as RFC 3339 strings. Non-finite floats round-trip
//! through the strings `"+Infinity"` / `"-Infinity"` / `"NaN"` (JSON has no
//! spelling for them). Arrays and objects are not part of this value model
//! and are rejected on deserialization; custom values serialize lossily
//! through their `Display` form.
//!
//! Deserialization never guesses at instants: an RFC 3339 string comes
//! back as [`Value::Text`]. Hosts that store instants in configuration
//! build those values programmatically.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::ValueError;
use crate::Value;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => {
                if f.is_nan() {
                    serializer.serialize_str("NaN")
                } else if f.is_infinite() {
                    serializer.serialize_str(if *f > 0.0 { "+Infinity" } else { "-Infinity" })
                } else {
                    serializer.serialize_f64(*f)
                }
            }
            Value::Text(t) => serializer.serialize_str(t),
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Custom(c) => serializer.serialize_str(&c.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a scalar value (null, boolean, number or string)")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if let Ok(i) = i64::try_from(v) {
            Ok(Value::Integer(i))
        } else {
            Ok(Value::Float(v as f64))
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match v {
            "+Infinity" => Ok(Value::Float(f64::INFINITY)),
            "-Infinity" => Ok(Value::Float(f64::NEG_INFINITY)),
            "NaN" => Ok(Value::Float(f64::NAN)),
            _ => Ok(Value::Text(v.to_owned())),
        }
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match v.as_str() {
            "+Infinity" | "-Infinity" | "NaN" => self.visit_str(&v),
            _ => Ok(Value::Text(v)),
        }
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }

    fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        Err(de::Error::invalid_type(de::Unexpected::Seq, &self))
    }

    fn visit_map<A>(self, _map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        Err(de::Error::invalid_type(de::Unexpected::Map, &self))
    }
}

/// Lossless except for custom values, which become their `Display` string,
/// and non-finite floats, which become their marker strings.
impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f).map_or_else(
                || {
                    let marker = if f.is_nan() {
                        "NaN"
                    } else if f > 0.0 {
                        "+Infinity"
                    } else {
                        "-Infinity"
                    };
                    serde_json::Value::String(marker.to_owned())
                },
                serde_json::Value::Number,
            ),
            Value::Text(t) => serde_json::Value::String(t),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Custom(c) => serde_json::Value::String(c.to_string()),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(ValueError::UnsupportedJson { found: "number" })
                }
            }
            serde_json::Value::String(s) => match s.as_str() {
                "+Infinity" => Ok(Value::Float(f64::INFINITY)),
                "-Infinity" => Ok(Value::Float(f64::NEG_INFINITY)),
                "NaN" => Ok(Value::Float(f64::NAN)),
                _ => Ok(Value::Text(s)),
            },
            serde_json::Value::Array(_) => Err(ValueError::UnsupportedJson { found: "array" }),
            serde_json::Value::Object(_) => Err(ValueError::UnsupportedJson { found: "object" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn scalars_round_trip() {
        for value in [
            Value::Null,
            Value::Boolean(true),
            Value::Integer(-42),
            Value::Float(2.5),
            Value::Text("hello".into()),
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn non_finite_floats_round_trip_as_strings() {
        let json = serde_json::to_string(&Value::Float(f64::INFINITY)).unwrap();
        assert_eq!(json, r#""+Infinity""#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Float(f64::INFINITY));

        let json = serde_json::to_string(&Value::Float(f64::NAN)).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        match back {
            Value::Float(f) => assert!(f.is_nan()),
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn instants_serialize_as_rfc3339_text() {
        let dt = Utc.with_ymd_and_hms(2001, 7, 4, 9, 0, 0).unwrap();
        let json = serde_json::to_string(&Value::DateTime(dt)).unwrap();
        assert_eq!(json, r#""2001-07-04T09:00:00+00:00""#);
        // Strings come back as text; instant parsing is the host's call.
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Text("2001-07-04T09:00:00+00:00".into()));
    }

    #[test]
    fn containers_are_rejected() {
        let err = serde_json::from_str::<Value>("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("scalar"));
        assert!(serde_json::from_str::<Value>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn json_value_conversion_is_symmetric_for_scalars() {
        let original = Value::Integer(7);
        let json: serde_json::Value = original.clone().into();
        assert_eq!(Value::try_from(json).unwrap(), original);

        let err = Value::try_from(serde_json::json!([1])).unwrap_err();
        assert_eq!(err, ValueError::UnsupportedJson { found: "array" });
    }
}
