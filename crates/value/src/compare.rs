//! The type comparer service.
//!
//! Given two values, already passed through any caller-requested
//! conversion, produce an ordering/equality verdict or admit that no
//! relationship exists. Host-registered comparers are consulted first,
//! primitives compare natively, and anything non-primitive is normalized
//! through the converter service. That last rule is why two instants
//! compare by calendar day by default: the pre-registered day-count
//! converter claims them.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::convert::ConverterRegistry;
use crate::Value;

/// Verdict of a comparison.
///
/// `NotEqual` is "definitely different but not ordered" (booleans, custom
/// equality); `Incomparable` is "no relationship could be established at
/// all" (nulls, kind mismatches, failed normalization). Callers treat the
/// two differently, so the distinction is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonResult {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    Incomparable,
}

impl ComparisonResult {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not-equal",
            Self::LessThan => "less-than",
            Self::GreaterThan => "greater-than",
            Self::Incomparable => "incomparable",
        }
    }

    /// Whether an ordering or equality was established.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Equal | Self::LessThan | Self::GreaterThan)
    }

    #[must_use]
    pub const fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::LessThan,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::GreaterThan,
        }
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host extension point: a comparer claiming specific operand pairs.
///
/// Like converters, comparers are stateless and consulted in registration
/// order; the first `supports` hit wins and short-circuits every built-in
/// rule, including the null rule.
pub trait ValueComparer: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn supports(&self, left: &Value, right: &Value) -> bool;

    fn compare(&self, left: &Value, right: &Value) -> ComparisonResult;
}

/// Booleans compare for equality only. Ordering questions about booleans
/// are unanswerable; callers map the resulting `NotEqual`/`Equal` verdicts
/// accordingly instead of ever seeing `LessThan`/`GreaterThan`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanComparer;

impl ValueComparer for BooleanComparer {
    fn name(&self) -> &'static str {
        "Boolean"
    }

    fn supports(&self, left: &Value, right: &Value) -> bool {
        matches!((left, right), (Value::Boolean(_), Value::Boolean(_)))
    }

    fn compare(&self, left: &Value, right: &Value) -> ComparisonResult {
        match (left, right) {
            (Value::Boolean(a), Value::Boolean(b)) if a == b => ComparisonResult::Equal,
            (Value::Boolean(_), Value::Boolean(_)) => ComparisonResult::NotEqual,
            _ => ComparisonResult::Incomparable,
        }
    }
}

/// Ordered, append-only comparer registry plus the native comparison rules.
///
/// Registration happens at host startup and takes `&mut self`; comparison
/// takes `&self`, so a populated registry is freely shareable.
#[derive(Debug, Default)]
pub struct ComparerRegistry {
    comparers: Vec<Arc<dyn ValueComparer>>,
}

impl ComparerRegistry {
    /// An empty registry: native rules only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            comparers: Vec::new(),
        }
    }

    /// Ships the boolean equality comparer.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BooleanComparer));
        registry
    }

    /// Appends a comparer; earlier registrations win lookups.
    pub fn register(&mut self, comparer: Arc<dyn ValueComparer>) {
        tracing::debug!(comparer = comparer.name(), "registered value comparer");
        self.comparers.push(comparer);
    }

    /// The first registered comparer claiming the pair.
    #[must_use]
    pub fn find(&self, left: &Value, right: &Value) -> Option<&dyn ValueComparer> {
        self.comparers
            .iter()
            .find(|c| c.supports(left, right))
            .map(AsRef::as_ref)
    }

    /// Compares two values, delegating to `converters` to normalize
    /// non-primitive operands.
    #[must_use]
    pub fn compare(
        &self,
        left: &Value,
        right: &Value,
        converters: &ConverterRegistry,
    ) -> ComparisonResult {
        if let Some(comparer) = self.find(left, right) {
            return comparer.compare(left, right);
        }
        if left.is_null() || right.is_null() {
            return ComparisonResult::Incomparable;
        }
        let Some(left) = normalize(left, converters) else {
            return ComparisonResult::Incomparable;
        };
        let Some(right) = normalize(right, converters) else {
            return ComparisonResult::Incomparable;
        };
        native_compare(&left, &right)
    }
}

/// Primitives pass through; everything else must resolve through the
/// converter service to take part in a comparison.
fn normalize<'a>(value: &'a Value, converters: &ConverterRegistry) -> Option<Cow<'a, Value>> {
    if value.kind().is_comparison_primitive() {
        return Some(Cow::Borrowed(value));
    }
    converters
        .convert_until_result(value, None)
        .into_result()
        .map(Cow::Owned)
}

fn native_compare(left: &Value, right: &Value) -> ComparisonResult {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => ComparisonResult::from_ordering(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => float_compare(*a, *b),
        (Value::Integer(a), Value::Float(b)) => float_compare(*a as f64, *b),
        (Value::Float(a), Value::Integer(b)) => float_compare(*a, *b as f64),
        (Value::Text(a), Value::Text(b)) => ComparisonResult::from_ordering(a.cmp(b)),
        // Reachable only when the boolean comparer was not registered.
        (Value::Boolean(a), Value::Boolean(b)) if a == b => ComparisonResult::Equal,
        (Value::Boolean(_), Value::Boolean(_)) => ComparisonResult::NotEqual,
        _ => {
            tracing::debug!(
                left = left.kind().name(),
                right = right.kind().name(),
                "no native ordering between operand kinds"
            );
            ComparisonResult::Incomparable
        }
    }
}

fn float_compare(a: f64, b: f64) -> ComparisonResult {
    a.partial_cmp(&b)
        .map_or(ComparisonResult::Incomparable, ComparisonResult::from_ordering)
}
