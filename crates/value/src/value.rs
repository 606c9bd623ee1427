//! The value model shared by conditions, converters and comparers.
//!
//! The variant set is deliberately small: scalars, text, one instant type,
//! and an escape hatch for host-defined types. "No value at all" is never a
//! variant: it is `Option<Value>` = `None` at every API boundary, and it is
//! always distinct from [`Value::Null`] ("a value that is null").

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::kind::ValueKind;

/// A host-defined value carried inside [`Value::Custom`].
///
/// Implementations live behind an `Arc` and are matched by registered
/// converters/comparers, typically on [`type_name`](CustomValue::type_name).
pub trait CustomValue: fmt::Debug + fmt::Display + Send + Sync {
    /// Identifies the concrete host type, e.g. `"TimeSpan"`.
    fn type_name(&self) -> &str;

    /// Equality against another custom value. Return `false` when `other`
    /// is a different concrete type.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    /// Downcast support, so converters and comparers that recognize the
    /// concrete type can reach its payload.
    fn as_any(&self) -> &dyn Any;
}

/// A runtime value under evaluation.
///
/// Equality here is structural: `Integer(1)` and `Float(1.0)` are *not*
/// equal as `Value`s. Semantic equality (numeric promotion, day-count
/// normalization of instants) is the comparer service's job.
///
/// # Examples
///
/// ```rust
/// use parallax_value::{Value, ValueKind};
///
/// let v = Value::from("hello");
/// assert_eq!(v.kind(), ValueKind::Text);
/// assert_eq!(v.as_text(), Some("hello"));
/// assert_ne!(Value::from(1_i64), Value::from(1.0_f64));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// A present-but-null value.
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// An instant in time, stored in UTC.
    DateTime(DateTime<Utc>),
    /// A host-defined type, reached through registered converters/comparers.
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Wraps a host-defined value.
    pub fn custom(value: impl CustomValue + 'static) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// The field-less discriminant of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Custom(_) => ValueKind::Custom,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload. No coercion: floats return `None`.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// A numeric reading of this value, promoting integers to `f64`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.eq_value(b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(t) => f.write_str(t),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Custom(c) => write!(f, "{c}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Errors from strict typed extraction out of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("expected a {expected} value, found {found}")]
    KindMismatch {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("JSON {found} has no value representation")]
    UnsupportedJson { found: &'static str },
}

impl TryFrom<Value> for i64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_integer().ok_or(ValueError::KindMismatch {
            expected: ValueKind::Integer,
            found: value.kind(),
        })
    }
}

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or(ValueError::KindMismatch {
            expected: ValueKind::Float,
            found: value.kind(),
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or(ValueError::KindMismatch {
            expected: ValueKind::Boolean,
            found: value.kind(),
        })
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(t) => Ok(t),
            other => Err(ValueError::KindMismatch {
                expected: ValueKind::Text,
                found: other.kind(),
            }),
        }
    }
}
