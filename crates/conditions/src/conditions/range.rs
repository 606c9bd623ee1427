//! Inclusive bounds over any comparable value.

use std::collections::BTreeSet;

use smallvec::smallvec;

use parallax_value::compare::ComparisonResult;
use parallax_value::Value;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::tokens::{MessageTokenSource, TokenPurpose, TokenValue, TokenValues};
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches a value lying inclusively between `minimum` and `maximum`.
///
/// Either bound may be omitted for a one-sided range. The bounds go through
/// the comparer untouched; only the evaluated value honors
/// `conversion_lookup_key`, so a date can be ranged against plain integer
/// day counts. A bound the comparer cannot order against the value is a
/// config smell, reported as Undetermined rather than an error so sibling
/// rules keep running.
#[derive(Debug)]
pub struct RangeCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
}

impl RangeCondition {
    #[must_use]
    pub fn new(config: &ConditionConfig) -> Self {
        Self {
            condition_type: config.resolved_type(ConditionType::RANGE),
            config: config.clone(),
        }
    }

    /// NoMatch when the value falls outside `bound`, None when it stays in.
    fn check_bound(
        &self,
        value: &Value,
        bound: &Value,
        which: &'static str,
        outside: ComparisonResult,
        ctx: &EvalContext<'_>,
    ) -> Option<Verdict> {
        let outcome = ctx.services().compare_values(value, bound);
        if outcome == outside {
            return Some(Verdict::NoMatch);
        }
        match outcome {
            ComparisonResult::Equal | ComparisonResult::LessThan | ComparisonResult::GreaterThan => {
                None
            }
            ComparisonResult::NotEqual | ComparisonResult::Incomparable => {
                tracing::warn!(
                    condition = %self.condition_type,
                    bound = which,
                    outcome = ?outcome,
                    "bound does not order against the value"
                );
                Some(Verdict::Undetermined)
            }
        }
    }
}

impl Condition for RangeCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.config
            .category
            .unwrap_or(ConditionCategory::Comparison)
    }

    fn evaluate(
        &self,
        value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> Result<Evaluation, ConditionError> {
        let host = ctx.primary_host(
            self.config.value_host_name.as_ref(),
            value_host,
            &self.condition_type,
        )?;
        let value = match host.value() {
            None | Some(Value::Null) => return Ok(Verdict::Undetermined.into()),
            Some(value) => value,
        };

        let key = self.config.conversion_lookup_key.as_ref();
        let Some(value) = ctx.services().convert_for_comparison(&value, key) else {
            tracing::info!(
                condition = %self.condition_type,
                value_host = %host.name(),
                lookup_key = ?key,
                "value did not convert for comparison"
            );
            return Ok(Verdict::Undetermined.into());
        };

        if let Some(minimum) = &self.config.minimum {
            if let Some(verdict) =
                self.check_bound(&value, minimum, "minimum", ComparisonResult::LessThan, ctx)
            {
                return Ok(verdict.into());
            }
        }
        if let Some(maximum) = &self.config.maximum {
            if let Some(verdict) =
                self.check_bound(&value, maximum, "maximum", ComparisonResult::GreaterThan, ctx)
            {
                return Ok(verdict.into());
            }
        }
        Ok(Verdict::Match.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        if let Some(name) = &self.config.value_host_name {
            names.insert(name.clone());
        }
    }

    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        Some(self)
    }
}

impl MessageTokenSource for RangeCondition {
    fn token_values(
        &self,
        _value_host: Option<&dyn ValueHost>,
        _ctx: &EvalContext<'_>,
    ) -> TokenValues {
        smallvec![
            TokenValue::new(
                "Minimum",
                self.config.minimum.clone(),
                TokenPurpose::Parameter
            ),
            TokenValue::new(
                "Maximum",
                self.config.maximum.clone(),
                TokenPurpose::Parameter
            ),
        ]
    }
}
