//! Text reshaping.

use crate::lookup::{keys, LookupKey};
use crate::Value;

use super::ValueConverter;

/// Lowercases text under the case-insensitive keys so that `"ABC"` and
/// `"abc"` compare equal downstream. Uses Unicode lowercasing.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitiveStringConverter;

impl ValueConverter for CaseInsensitiveStringConverter {
    fn name(&self) -> &'static str {
        "CaseInsensitiveString"
    }

    fn result_key(&self) -> &LookupKey {
        &keys::LOWERCASE
    }

    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool {
        matches!(value, Value::Text(_))
            && source_key.is_some_and(|k| *k == keys::CASE_INSENSITIVE || *k == keys::LOWERCASE)
    }

    fn convert(&self, value: &Value, _source_key: Option<&LookupKey>) -> Option<Value> {
        let Value::Text(text) = value else {
            return None;
        };
        Some(Value::Text(text.to_lowercase()))
    }
}
