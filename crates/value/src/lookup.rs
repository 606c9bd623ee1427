//! Lookup keys: string tags naming a semantic data type or comparison intent.
//!
//! A key carries no structure and no registry-enforced meaning. Converters
//! and comparers match keys by string equality, and hosts mint new keys
//! freely; nothing ever validates that a key is "known".

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A string tag identifying a semantic data type or a comparison intent.
///
/// Equality is case-sensitive string equality. Callers that have no key
/// pass `Option<&LookupKey>` = `None`, meaning "infer from the runtime
/// type".
///
/// # Examples
///
/// ```rust
/// use parallax_value::{LookupKey, keys};
///
/// let custom = LookupKey::new("PhoneNumber");
/// assert_ne!(custom, keys::NUMBER);
/// assert_eq!(LookupKey::new("Integer"), keys::INTEGER);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupKey(Cow<'static, str>);

impl LookupKey {
    /// Creates a key from any string. `&'static str` stays borrowed.
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    /// Creates a key from a static string in const context.
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for LookupKey {
    fn from(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }
}

impl From<String> for LookupKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl PartialEq<str> for LookupKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LookupKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Keys understood by the built-in converters.
///
/// This list is closed only in the sense that these are the keys with
/// shipped behavior; host-defined keys live alongside them without any
/// registration step.
pub mod keys {
    use super::LookupKey;

    /// Any numeric value, integer or floating point.
    pub static NUMBER: LookupKey = LookupKey::from_static("Number");
    /// Whole numbers; what the integer-rounding converter produces.
    pub static INTEGER: LookupKey = LookupKey::from_static("Integer");
    pub static STRING: LookupKey = LookupKey::from_static("String");
    pub static BOOLEAN: LookupKey = LookupKey::from_static("Boolean");
    /// An instant read as a UTC calendar date; time of day is irrelevant.
    pub static DATE: LookupKey = LookupKey::from_static("Date");
    /// An instant read as a precise point in time.
    pub static DATE_TIME: LookupKey = LookupKey::from_static("DateTime");
    /// An instant read as a calendar date in the host's local time zone.
    pub static LOCAL_DATE: LookupKey = LookupKey::from_static("LocalDate");
    /// Minutes since midnight, UTC.
    pub static TIME_OF_DAY: LookupKey = LookupKey::from_static("TimeOfDay");
    /// Seconds since midnight, UTC.
    pub static TIME_OF_DAY_HMS: LookupKey = LookupKey::from_static("TimeOfDayHMS");
    /// Case-insensitive text comparison intent.
    pub static CASE_INSENSITIVE: LookupKey = LookupKey::from_static("CaseInsensitive");
    /// Lowercased text; what the case-insensitive converter produces.
    pub static LOWERCASE: LookupKey = LookupKey::from_static("Lowercase");
    /// Whole days since 1970-01-01.
    pub static TOTAL_DAYS: LookupKey = LookupKey::from_static("TotalDays");
    /// Milliseconds since the Unix epoch.
    pub static MILLISECONDS: LookupKey = LookupKey::from_static("Milliseconds");
    pub static SECONDS: LookupKey = LookupKey::from_static("Seconds");
    pub static MINUTES: LookupKey = LookupKey::from_static("Minutes");
}
