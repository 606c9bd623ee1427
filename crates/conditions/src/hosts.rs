//! The consumed interfaces onto host-application values.
//!
//! A [`ValueHost`] is the thing under evaluation: it exposes the live
//! native-typed value, the raw input text it was parsed from, a declared
//! data type, and a display label for message tokens. A
//! [`ValueHostResolver`] looks hosts up by name for cross-field rules.
//! [`StaticValueHost`] and [`StaticResolver`] are in-crate implementations
//! for hosts with plain in-memory values and for tests.

use std::borrow::{Borrow, Cow};
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use parallax_value::{LookupKey, Value};

// ============================================================================
// VALUE HOST NAME
// ============================================================================

/// Identifier of a named value, resolved live through a resolver.
///
/// Case-sensitive string equality, like every other tag in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueHostName(Cow<'static, str>);

impl ValueHostName {
    /// Creates a name from any string. `&'static str` stays borrowed.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValueHostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ValueHostName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ValueHostName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ValueHostName {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ValueHostName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl PartialEq<str> for ValueHostName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ValueHostName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// CONSUMED INTERFACES
// ============================================================================

/// The value context a condition evaluates against.
///
/// `value()` returning `None` means "no value at all" (an untouched field);
/// `Some(Value::Null)` means "a value that is null." Conditions treat the
/// two differently everywhere, so implementations must too.
pub trait ValueHost: Send + Sync {
    /// Identifier, unique within the resolver that owns this host.
    fn name(&self) -> &ValueHostName;

    /// Display label used in message tokens. Defaults to the name.
    fn label(&self) -> &str {
        self.name().as_str()
    }

    /// The current native-typed value, or `None` when there is none yet.
    fn value(&self) -> Option<Value>;

    /// The raw input text the native value was parsed from, when the host
    /// tracks one. `None` means no input has been supplied at all.
    fn input_value(&self) -> Option<String> {
        None
    }

    /// The declared data type of this host's value.
    fn data_type(&self) -> Option<&LookupKey> {
        None
    }

    /// The host's own text-to-native conversion error message, exposed via
    /// the `ConversionError` message token.
    fn conversion_error(&self) -> Option<&str> {
        None
    }
}

/// Looks up named value hosts at evaluation time.
///
/// Returning `None` means "unknown identifier", distinguishable from a
/// host that exists but currently holds a null or missing value.
pub trait ValueHostResolver: Send + Sync {
    fn value_host(&self, name: &str) -> Option<&dyn ValueHost>;
}

/// A resolver that knows no hosts; for standalone and test evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyResolver;

impl ValueHostResolver for EmptyResolver {
    fn value_host(&self, _name: &str) -> Option<&dyn ValueHost> {
        None
    }
}

// ============================================================================
// STATIC IMPLEMENTATIONS
// ============================================================================

/// A [`ValueHost`] over plain in-memory state.
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::{StaticValueHost, ValueHost};
/// use parallax_value::Value;
///
/// let host = StaticValueHost::new("price", Some(Value::from(12.5)))
///     .with_label("Price")
///     .with_input_value("12.50");
///
/// assert_eq!(host.label(), "Price");
/// assert_eq!(host.value(), Some(Value::Float(12.5)));
/// ```
#[derive(Debug, Clone)]
pub struct StaticValueHost {
    name: ValueHostName,
    label: Option<String>,
    value: Option<Value>,
    input_value: Option<String>,
    data_type: Option<LookupKey>,
    conversion_error: Option<String>,
}

impl StaticValueHost {
    /// A host holding `value`; `None` models a field with no value yet.
    pub fn new(name: impl Into<ValueHostName>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            label: None,
            value,
            input_value: None,
            data_type: None,
            conversion_error: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Option<Value>) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_input_value(mut self, input: impl Into<String>) -> Self {
        self.input_value = Some(input.into());
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: LookupKey) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn with_conversion_error(mut self, message: impl Into<String>) -> Self {
        self.conversion_error = Some(message.into());
        self
    }
}

impl ValueHost for StaticValueHost {
    fn name(&self) -> &ValueHostName {
        &self.name
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.name.as_str())
    }

    fn value(&self) -> Option<Value> {
        self.value.clone()
    }

    fn input_value(&self) -> Option<String> {
        self.input_value.clone()
    }

    fn data_type(&self) -> Option<&LookupKey> {
        self.data_type.as_ref()
    }

    fn conversion_error(&self) -> Option<&str> {
        self.conversion_error.as_deref()
    }
}

/// A [`ValueHostResolver`] over an owned name → host map.
#[derive(Debug, Default)]
pub struct StaticResolver {
    hosts: BTreeMap<ValueHostName, StaticValueHost>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            hosts: BTreeMap::new(),
        }
    }

    /// Adds a host, replacing any existing host with the same name.
    pub fn add(&mut self, host: StaticValueHost) {
        self.hosts.insert(host.name.clone(), host);
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with_host(mut self, host: StaticValueHost) -> Self {
        self.add(host);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl ValueHostResolver for StaticResolver {
    fn value_host(&self, name: &str) -> Option<&dyn ValueHost> {
        self.hosts.get(name).map(|host| host as &dyn ValueHost)
    }
}
