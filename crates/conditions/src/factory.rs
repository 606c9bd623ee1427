//! Builds conditions from configuration by type name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::combinators::{
    AllMatchCondition, AnyMatchCondition, CountMatchesCondition, NotCondition,
};
use crate::condition::Condition;
use crate::conditions::{
    CompareCondition, CompareOperator, DataTypeCheckCondition, NotNullCondition, RangeCondition,
    RegExpCondition, RequireTextCondition, StringLengthCondition,
};
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::types::ConditionType;

/// Builder callback: turns one config node into a live condition.
///
/// The factory passes itself back in so conditions with children can
/// recurse through the same registrations.
pub type ConditionBuilder =
    Arc<dyn Fn(&ConditionConfig, &ConditionFactory) -> Result<Box<dyn Condition>, ConditionError> + Send + Sync>;

// ============================================================================
// FACTORY
// ============================================================================

/// Registry of condition builders keyed by [`ConditionType`].
///
/// Hosts register custom families next to the built-ins; a later
/// registration under the same type replaces the earlier one.
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::{ConditionConfig, ConditionFactory, ConditionType};
///
/// let factory = ConditionFactory::with_defaults();
/// let config = ConditionConfig::new(ConditionType::NOT_NULL)
///     .with_value_host_name("email");
/// let condition = factory.create(&config).unwrap();
/// assert_eq!(condition.condition_type(), &ConditionType::NOT_NULL);
/// ```
#[derive(Default)]
pub struct ConditionFactory {
    builders: HashMap<ConditionType, ConditionBuilder>,
}

impl ConditionFactory {
    /// An empty factory; every family is opt-in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory knowing every built-in condition family.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(ConditionType::REQUIRE_TEXT, |config, _| {
            Ok(Box::new(RequireTextCondition::new(config)))
        });
        factory.register(ConditionType::NOT_NULL, |config, _| {
            Ok(Box::new(NotNullCondition::new(config)))
        });
        factory.register(ConditionType::DATA_TYPE_CHECK, |config, _| {
            Ok(Box::new(DataTypeCheckCondition::new(config)))
        });
        factory.register(ConditionType::REG_EXP, |config, _| {
            Ok(Box::new(RegExpCondition::new(config)?))
        });
        factory.register(ConditionType::RANGE, |config, _| {
            Ok(Box::new(RangeCondition::new(config)))
        });
        factory.register(ConditionType::STRING_LENGTH, |config, _| {
            Ok(Box::new(StringLengthCondition::new(config)?))
        });
        for operator in CompareOperator::ALL {
            factory.register(operator.default_type(), move |config, _| {
                Ok(Box::new(CompareCondition::new(config, operator)))
            });
        }
        factory.register(ConditionType::ALL_MATCH, |config, factory| {
            Ok(Box::new(AllMatchCondition::new(config, factory)?))
        });
        factory.register(ConditionType::ANY_MATCH, |config, factory| {
            Ok(Box::new(AnyMatchCondition::new(config, factory)?))
        });
        factory.register(ConditionType::COUNT_MATCHES, |config, factory| {
            Ok(Box::new(CountMatchesCondition::new(config, factory)?))
        });
        factory.register(ConditionType::NOT, |config, factory| {
            Ok(Box::new(NotCondition::new(config, factory)?))
        });
        factory
    }

    /// Registers a builder for `condition_type`, replacing any previous one.
    pub fn register<F>(&mut self, condition_type: ConditionType, builder: F)
    where
        F: Fn(&ConditionConfig, &ConditionFactory) -> Result<Box<dyn Condition>, ConditionError>
            + Send
            + Sync
            + 'static,
    {
        self.builders.insert(condition_type, Arc::new(builder));
    }

    #[must_use]
    pub fn contains(&self, condition_type: &ConditionType) -> bool {
        self.builders.contains_key(condition_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Builds the condition described by `config`.
    ///
    /// # Errors
    ///
    /// [`ConditionError::UnknownConditionType`] when no builder is
    /// registered for the config's type; otherwise whatever the builder
    /// reports about the config itself.
    pub fn create(&self, config: &ConditionConfig) -> Result<Box<dyn Condition>, ConditionError> {
        match self.builders.get(&config.condition_type) {
            Some(builder) => builder(config, self),
            None => {
                tracing::error!(
                    condition = %config.condition_type,
                    "no condition registered for type"
                );
                Err(ConditionError::UnknownConditionType {
                    condition_type: config.condition_type.clone(),
                })
            }
        }
    }
}

impl fmt::Debug for ConditionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<&str> = self.builders.keys().map(ConditionType::as_str).collect();
        registered.sort_unstable();
        f.debug_struct("ConditionFactory")
            .field("registered", &registered)
            .finish()
    }
}
