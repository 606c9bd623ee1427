//! Condition identity: the type tag and the coarse category.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// String tag identifying a condition family.
///
/// The factory dispatches on this tag, and hosts mint their own tags for
/// custom conditions; nothing validates that a tag is "known" outside of
/// factory lookup. Equality is case-sensitive string equality.
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::ConditionType;
///
/// assert_eq!(ConditionType::RANGE.as_str(), "Range");
/// assert_eq!(ConditionType::new("Range"), ConditionType::RANGE);
/// assert_ne!(ConditionType::new("range"), ConditionType::RANGE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionType(Cow<'static, str>);

impl ConditionType {
    pub const REQUIRE_TEXT: Self = Self::from_static("RequireText");
    pub const NOT_NULL: Self = Self::from_static("NotNull");
    pub const DATA_TYPE_CHECK: Self = Self::from_static("DataTypeCheck");
    pub const REG_EXP: Self = Self::from_static("RegExp");
    pub const RANGE: Self = Self::from_static("Range");
    pub const STRING_LENGTH: Self = Self::from_static("StringLength");
    pub const EQUAL_TO: Self = Self::from_static("EqualTo");
    pub const NOT_EQUAL_TO: Self = Self::from_static("NotEqualTo");
    pub const GREATER_THAN: Self = Self::from_static("GreaterThan");
    pub const GREATER_THAN_OR_EQUAL: Self = Self::from_static("GreaterThanOrEqual");
    pub const LESS_THAN: Self = Self::from_static("LessThan");
    pub const LESS_THAN_OR_EQUAL: Self = Self::from_static("LessThanOrEqual");
    pub const ALL_MATCH: Self = Self::from_static("AllMatch");
    pub const ANY_MATCH: Self = Self::from_static("AnyMatch");
    pub const COUNT_MATCHES: Self = Self::from_static("CountMatches");
    pub const NOT: Self = Self::from_static("Not");
    /// Placeholder for configs that never set a type.
    pub const UNKNOWN: Self = Self::from_static("Unknown");

    /// Creates a type tag from any string. `&'static str` stays borrowed.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    /// Creates a type tag from a static string in const context.
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// The tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConditionType {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ConditionType {
    fn from(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }
}

impl From<String> for ConditionType {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl PartialEq<str> for ConditionType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ConditionType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Coarse grouping used by validators for ordering and severity defaults.
///
/// Purely descriptive; nothing in evaluation logic branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionCategory {
    /// The value must be present (requiredness checks).
    Required,
    /// The value relates to a bound or another value.
    Comparison,
    /// The host's text-to-native conversion succeeded.
    DataTypeCheck,
    /// The condition combines child conditions.
    Children,
    /// The value's content matches a shape (patterns).
    Contents,
    /// No better classification applies.
    Undetermined,
}

impl ConditionCategory {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Comparison => "Comparison",
            Self::DataTypeCheck => "DataTypeCheck",
            Self::Children => "Children",
            Self::Contents => "Contents",
            Self::Undetermined => "Undetermined",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_unknown_placeholder() {
        assert_eq!(ConditionType::default(), ConditionType::UNKNOWN);
    }

    #[test]
    fn owned_and_static_tags_compare_equal() {
        let owned = ConditionType::from(String::from("GreaterThan"));
        assert_eq!(owned, ConditionType::GREATER_THAN);
        assert_eq!(owned, "GreaterThan");
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&ConditionType::ALL_MATCH).unwrap();
        assert_eq!(json, r#""AllMatch""#);
        let back: ConditionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConditionType::ALL_MATCH);
    }

    #[test]
    fn category_names_match_variants() {
        assert_eq!(ConditionCategory::Contents.name(), "Contents");
        assert_eq!(ConditionCategory::Children.to_string(), "Children");
    }
}
