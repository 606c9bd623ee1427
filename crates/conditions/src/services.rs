//! The services a condition evaluates with, and the per-call context.
//!
//! [`ConditionServices`] bundles the converter registry, the comparer
//! registry, and the condition factory. Registration happens at host
//! startup through the `_mut` accessors; after that the bundle is
//! read-only and freely shareable across concurrent evaluations.

use parallax_value::compare::{ComparerRegistry, ComparisonResult};
use parallax_value::convert::ConverterRegistry;
use parallax_value::{LookupKey, Value};

use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::{ValueHost, ValueHostName, ValueHostResolver};
use crate::types::ConditionType;

// ============================================================================
// SERVICES
// ============================================================================

/// Everything conditions need beyond the values themselves.
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::ConditionServices;
///
/// let mut services = ConditionServices::with_defaults();
/// services.converters_mut().register_standard();
/// ```
#[derive(Debug, Default)]
pub struct ConditionServices {
    converters: ConverterRegistry,
    comparers: ComparerRegistry,
    factory: ConditionFactory,
}

impl ConditionServices {
    /// Empty registries and an empty factory; everything is opt-in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard bundle: the default day-count converter, the boolean
    /// comparer, and a factory knowing every built-in condition family.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            converters: ConverterRegistry::with_defaults(),
            comparers: ComparerRegistry::with_defaults(),
            factory: ConditionFactory::with_defaults(),
        }
    }

    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    #[must_use]
    pub fn comparers(&self) -> &ComparerRegistry {
        &self.comparers
    }

    pub fn comparers_mut(&mut self) -> &mut ComparerRegistry {
        &mut self.comparers
    }

    #[must_use]
    pub fn factory(&self) -> &ConditionFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut ConditionFactory {
        &mut self.factory
    }

    /// Compares two values, letting the comparer registry normalize
    /// non-primitives through the converter registry.
    #[must_use]
    pub fn compare_values(&self, left: &Value, right: &Value) -> ComparisonResult {
        self.comparers.compare(left, right, &self.converters)
    }

    /// Applies a condition's configured conversion to an operand.
    ///
    /// With no key the operand passes through untouched (the comparer will
    /// still normalize non-primitives on its own). With a key, the chained
    /// converter runs; `None` means the operand could not be converted,
    /// which conditions treat as a soft evaluation gap.
    #[must_use]
    pub fn convert_for_comparison(
        &self,
        value: &Value,
        key: Option<&LookupKey>,
    ) -> Option<Value> {
        match key {
            None => Some(value.clone()),
            Some(key) => self
                .converters
                .convert_until_result(value, Some(key))
                .into_result(),
        }
    }
}

// ============================================================================
// EVALUATION CONTEXT
// ============================================================================

/// Borrowed environment for one evaluation call: the resolver for named
/// values plus the shared services.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    resolver: &'a dyn ValueHostResolver,
    services: &'a ConditionServices,
}

impl<'a> EvalContext<'a> {
    #[must_use]
    pub fn new(resolver: &'a dyn ValueHostResolver, services: &'a ConditionServices) -> Self {
        Self { resolver, services }
    }

    #[must_use]
    pub fn resolver(&self) -> &'a dyn ValueHostResolver {
        self.resolver
    }

    #[must_use]
    pub fn services(&self) -> &'a ConditionServices {
        self.services
    }

    #[must_use]
    pub fn converters(&self) -> &'a ConverterRegistry {
        self.services.converters()
    }

    #[must_use]
    pub fn comparers(&self) -> &'a ComparerRegistry {
        self.services.comparers()
    }

    /// Resolves the primary value host for a condition.
    ///
    /// A configured name takes precedence and must resolve; an unknown
    /// name is a hard configuration error. Without a configured name, the
    /// host under evaluation applies; having neither is equally hard.
    pub fn primary_host<'h>(
        &'h self,
        config_name: Option<&ValueHostName>,
        value_host: Option<&'h dyn ValueHost>,
        condition_type: &ConditionType,
    ) -> Result<&'h dyn ValueHost, ConditionError> {
        match config_name {
            Some(name) => self.resolver.value_host(name.as_str()).ok_or_else(|| {
                tracing::error!(
                    condition = %condition_type,
                    value_host = %name,
                    "configured value host is not known to the resolver"
                );
                ConditionError::UnknownValueHost { name: name.clone() }
            }),
            None => value_host.ok_or_else(|| {
                tracing::error!(
                    condition = %condition_type,
                    "no value host to evaluate: config names none and none was passed"
                );
                ConditionError::MissingValueHost {
                    condition_type: condition_type.clone(),
                }
            }),
        }
    }

    /// [`primary_host`](Self::primary_host) without the error channel, for
    /// side-channel queries (message tokens) that must stay silent.
    #[must_use]
    pub fn lookup_primary<'h>(
        &'h self,
        config_name: Option<&ValueHostName>,
        value_host: Option<&'h dyn ValueHost>,
    ) -> Option<&'h dyn ValueHost> {
        match config_name {
            Some(name) => self.resolver.value_host(name.as_str()),
            None => value_host,
        }
    }
}
