//! Numeric rounding.

use crate::lookup::{keys, LookupKey};
use crate::Value;

use super::ValueConverter;

/// Rounds numbers half away from zero under the integer key. Integers pass
/// through untouched; non-finite floats and floats beyond the `i64` range
/// produce no value.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntegerConverter;

impl ValueConverter for IntegerConverter {
    fn name(&self) -> &'static str {
        "Integer"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::INTEGER
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        value.kind().is_numeric() && source_key.is_some_and(|k| *k == keys::INTEGER)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        match value {
            Value::Integer(i) => Some(Value::Integer(*i)),
            Value::Float(f) => {
                if !f.is_finite() {
                    return None;
                }
                // `f64::round` rounds half away from zero.
                let rounded = f.round();
                if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
                    return None;
                }
                Some(Value::Integer(rounded as i64))
            }
            _ => None,
        }
    }
}
