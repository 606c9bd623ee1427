//! The type converter service.
//!
//! Converters reshape values so that downstream comparison can work on
//! primitives: an instant becomes its UTC day count, text becomes its
//! lowercase form, a float rounds to an integer. The registry keeps
//! converters in registration order and the first one whose
//! [`supports`](ValueConverter::supports) passes wins, so earlier
//! registrations take precedence.
//!
//! `None` out of [`ValueConverter::convert`] always means "could not
//! produce a value" and is distinct from a legitimate `Some(Value::Null)`
//! result.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::lookup::LookupKey;
use crate::Value;

mod numeric;
mod temporal;
mod text;

pub use numeric::IntegerConverter;
pub use temporal::{
    DateTimeConverter, LocalDateOnlyConverter, TimeOfDayConverter, TimeOfDayHmsConverter,
    TotalDaysConverter, UtcDateOnlyConverter,
};
pub use text::CaseInsensitiveStringConverter;

/// Longest chain [`ConverterRegistry::convert_until_result`] will follow
/// before giving up on a pathological converter set.
const MAX_CHAIN_STEPS: usize = 8;

/// Reshapes values of one semantic type into another.
///
/// Implementations are stateless. `convert` is only called after `supports`
/// returned `true` for the same arguments, but it must still return `None`
/// rather than panic when the payload itself cannot be converted (e.g. a
/// non-finite float asked to become an integer).
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Short name used in logs and conversion trails.
    fn name(&self) -> &'static str;

    /// The semantic type this converter produces. Used to disambiguate
    /// between converters that accept the same input but project to
    /// different shapes.
    fn result_key(&self) -> &LookupKey;

    /// Whether this converter claims `value` under `source_key`.
    /// `source_key` = `None` means "infer from the runtime type".
    fn supports(&self, value: &Value, source_key: Option<&LookupKey>) -> bool;

    /// Produces the reshaped value, or `None` when the payload is invalid.
    fn convert(&self, value: &Value, source_key: Option<&LookupKey>) -> Option<Value>;
}

/// One applied conversion inside a chain.
#[derive(Debug, Clone)]
pub struct ChainStep {
    converter: &'static str,
    produced: Value,
}

impl ChainStep {
    #[must_use]
    pub fn converter_name(&self) -> &'static str {
        self.converter
    }

    #[must_use]
    pub fn produced(&self) -> &Value {
        &self.produced
    }
}

/// Outcome of [`ConverterRegistry::convert_until_result`], keeping every
/// step taken for diagnostics.
#[derive(Debug, Clone)]
pub struct ChainedConversion {
    steps: SmallVec<[ChainStep; 2]>,
    resolved: bool,
}

impl ChainedConversion {
    /// The final value. Present only when the chain ended on a comparison
    /// primitive.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        if self.resolved {
            self.steps.last().map(ChainStep::produced)
        } else {
            None
        }
    }

    /// Consumes the chain, yielding the final value if it resolved.
    #[must_use]
    pub fn into_result(self) -> Option<Value> {
        if self.resolved {
            self.steps.into_iter().last().map(|step| step.produced)
        } else {
            None
        }
    }

    /// Every step taken, in order, whether or not the chain resolved.
    #[must_use]
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// The steps before the final result; all steps when nothing resolved.
    #[must_use]
    pub fn intermediates(&self) -> &[ChainStep] {
        if self.resolved && !self.steps.is_empty() {
            &self.steps[..self.steps.len() - 1]
        } else {
            &self.steps
        }
    }
}

/// Ordered, append-only converter registry.
///
/// Registration happens at host startup and takes `&mut self`; lookups take
/// `&self`, so a populated registry is freely shareable across concurrent
/// evaluations.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn ValueConverter>>,
}

impl ConverterRegistry {
    /// An empty registry with no converters at all.
    #[must_use]
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// A registry with the one pre-registered default: instants reduce to
    /// their UTC day count when no explicit key says otherwise. Everything
    /// else is opt-in via [`register`](Self::register) or
    /// [`register_standard`](Self::register_standard).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(UtcDateOnlyConverter));
        registry
    }

    /// Appends a converter. Duplicate-looking registrations are allowed;
    /// earlier registrations win lookups.
    pub fn register(&mut self, converter: Arc<dyn ValueConverter>) {
        tracing::debug!(converter = converter.name(), "registered value converter");
        self.converters.push(converter);
    }

    /// Registers the seven opt-in built-ins: case-insensitive text, the
    /// instant projections and integer rounding. The UTC day-count default
    /// is already present on a [`with_defaults`](Self::with_defaults)
    /// registry and is not added again here.
    pub fn register_standard(&mut self) {
        self.register(Arc::new(CaseInsensitiveStringConverter));
        self.register(Arc::new(DateTimeConverter));
        self.register(Arc::new(LocalDateOnlyConverter));
        self.register(Arc::new(TimeOfDayConverter));
        self.register(Arc::new(TimeOfDayHmsConverter));
        self.register(Arc::new(IntegerConverter));
        self.register(Arc::new(TotalDaysConverter));
    }

    /// Number of registered converters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// The first registered converter claiming `value` under `source_key`.
    #[must_use]
    pub fn find(&self, value: &Value, source_key: Option<&LookupKey>) -> Option<&dyn ValueConverter> {
        self.converters
            .iter()
            .find(|c| c.supports(value, source_key))
            .map(AsRef::as_ref)
    }

    /// The first converter accepting `value` under `source_key` *and*
    /// projecting to `result_key`.
    #[must_use]
    pub fn find_to(
        &self,
        value: &Value,
        source_key: Option<&LookupKey>,
        result_key: &LookupKey,
    ) -> Option<&dyn ValueConverter> {
        self.converters
            .iter()
            .find(|c| c.result_key() == result_key && c.supports(value, source_key))
            .map(AsRef::as_ref)
    }

    /// Single-step conversion: `None` when no converter claims the value or
    /// the claiming converter could not produce a result.
    #[must_use]
    pub fn convert(&self, value: &Value, source_key: Option<&LookupKey>) -> Option<Value> {
        self.find(value, source_key)?.convert(value, source_key)
    }

    /// Whether some converter accepts `value` under `source_key` and
    /// projects to `result_key`.
    #[must_use]
    pub fn can_convert(
        &self,
        value: &Value,
        source_key: Option<&LookupKey>,
        result_key: &LookupKey,
    ) -> bool {
        self.find_to(value, source_key, result_key).is_some()
    }

    /// Single-step conversion constrained by the result shape.
    #[must_use]
    pub fn convert_to(
        &self,
        value: &Value,
        source_key: Option<&LookupKey>,
        result_key: &LookupKey,
    ) -> Option<Value> {
        self.find_to(value, source_key, result_key)?
            .convert(value, source_key)
    }

    /// Chained conversion: applies converters until the value reaches a
    /// comparison primitive.
    ///
    /// The source key is consulted for the first step only; follow-up steps
    /// infer from the produced value, which is what lets a host wrapper
    /// type unwrap to an instant and then continue to the instant's day
    /// count. The chain always terminates: it stops when the produced value
    /// is a primitive, when no converter claims the intermediate, when a
    /// step fails to change the value's kind, or at [`MAX_CHAIN_STEPS`].
    #[must_use]
    pub fn convert_until_result(
        &self,
        value: &Value,
        source_key: Option<&LookupKey>,
    ) -> ChainedConversion {
        let mut steps: SmallVec<[ChainStep; 2]> = SmallVec::new();
        let mut current = value.clone();
        let mut key = source_key;

        for _ in 0..MAX_CHAIN_STEPS {
            let Some(converter) = self.find(&current, key) else {
                break;
            };
            let name = converter.name();
            let Some(next) = converter.convert(&current, key) else {
                // Claimed but produced nothing: the payload is invalid and
                // the chain is dead.
                tracing::trace!(converter = name, "converter produced no value");
                return ChainedConversion {
                    steps,
                    resolved: false,
                };
            };
            tracing::trace!(
                converter = name,
                produced = next.kind().name(),
                "conversion step"
            );
            let advanced = next.kind() != current.kind();
            steps.push(ChainStep {
                converter: name,
                produced: next.clone(),
            });
            current = next;
            key = None;
            if current.kind().is_comparison_primitive() {
                return ChainedConversion {
                    steps,
                    resolved: true,
                };
            }
            if !advanced {
                break;
            }
        }

        ChainedConversion {
            steps,
            resolved: false,
        }
    }
}
