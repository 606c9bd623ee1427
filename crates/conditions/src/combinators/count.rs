//! Tallying over child conditions.

use std::collections::BTreeSet;

use smallvec::smallvec;

use parallax_value::Value;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::tokens::{MessageTokenSource, TokenPurpose, TokenValue, TokenValues};
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches when the number of matching children lies inclusively within
/// the bounds.
///
/// Every child is evaluated; a tally cannot short-circuit. Children still
/// Undetermined after `treat_undetermined_as` substitution are excluded
/// from the tally rather than counted against it. No children means
/// Undetermined even when bounds are set; children with no bounds at all
/// always Match.
#[derive(Debug)]
pub struct CountMatchesCondition {
    condition_type: ConditionType,
    category: ConditionCategory,
    treat_undetermined_as: Option<Verdict>,
    minimum: Option<i64>,
    maximum: Option<i64>,
    children: Vec<Box<dyn Condition>>,
}

impl CountMatchesCondition {
    /// # Errors
    ///
    /// [`ConditionError::InvalidParameter`] for a non-integer bound, plus
    /// whatever the factory reports about a child config.
    pub fn new(config: &ConditionConfig, factory: &ConditionFactory) -> Result<Self, ConditionError> {
        let condition_type = config.resolved_type(ConditionType::COUNT_MATCHES);
        let minimum =
            crate::conditions::integer_bound(&condition_type, "minimum", config.minimum.as_ref())?;
        let maximum =
            crate::conditions::integer_bound(&condition_type, "maximum", config.maximum.as_ref())?;
        Ok(Self {
            condition_type,
            category: config.category.unwrap_or(ConditionCategory::Children),
            treat_undetermined_as: config.treat_undetermined_as,
            minimum,
            maximum,
            children: super::build_children(config, factory)?,
        })
    }
}

impl Condition for CountMatchesCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.category
    }

    fn evaluate(
        &self,
        value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> Result<Evaluation, ConditionError> {
        if self.children.is_empty() {
            return Ok(Verdict::Undetermined.into());
        }
        let mut matches: i64 = 0;
        for child in &self.children {
            match super::evaluate_child(
                child.as_ref(),
                &self.condition_type,
                self.treat_undetermined_as,
                value_host,
                ctx,
            )? {
                Verdict::Match => matches += 1,
                Verdict::NoMatch | Verdict::Undetermined => {}
            }
        }
        let verdict = if self.minimum.is_some_and(|minimum| matches < minimum)
            || self.maximum.is_some_and(|maximum| matches > maximum)
        {
            Verdict::NoMatch
        } else {
            Verdict::Match
        };
        Ok(verdict.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        for child in &self.children {
            child.gather_value_host_names(names);
        }
    }

    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        Some(self)
    }
}

impl MessageTokenSource for CountMatchesCondition {
    fn token_values(
        &self,
        _value_host: Option<&dyn ValueHost>,
        _ctx: &EvalContext<'_>,
    ) -> TokenValues {
        smallvec![
            TokenValue::new(
                "Minimum",
                self.minimum.map(Value::from),
                TokenPurpose::Parameter
            ),
            TokenValue::new(
                "Maximum",
                self.maximum.map(Value::from),
                TokenPurpose::Parameter
            ),
        ]
    }
}
