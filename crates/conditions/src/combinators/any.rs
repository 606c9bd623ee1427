//! Disjunction over child conditions.

use std::collections::BTreeSet;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches when at least one child matches.
///
/// The mirror image of [`AllMatchCondition`](super::AllMatchCondition):
/// Match short-circuits, an unsettled Undetermined downgrades the running
/// NoMatch, and no children means Undetermined.
#[derive(Debug)]
pub struct AnyMatchCondition {
    condition_type: ConditionType,
    category: ConditionCategory,
    treat_undetermined_as: Option<Verdict>,
    children: Vec<Box<dyn Condition>>,
}

impl AnyMatchCondition {
    /// # Errors
    ///
    /// Whatever the factory reports about a child config.
    pub fn new(config: &ConditionConfig, factory: &ConditionFactory) -> Result<Self, ConditionError> {
        Ok(Self {
            condition_type: config.resolved_type(ConditionType::ANY_MATCH),
            category: config.category.unwrap_or(ConditionCategory::Children),
            treat_undetermined_as: config.treat_undetermined_as,
            children: super::build_children(config, factory)?,
        })
    }
}

impl Condition for AnyMatchCondition {
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
        let mut running = Verdict::NoMatch;
        for child in &self.children {
            match super::evaluate_child(
                child.as_ref(),
                &self.condition_type,
                self.treat_undetermined_as,
                value_host,
                ctx,
            )? {
                Verdict::Match => return Ok(Verdict::Match.into()),
                Verdict::Undetermined => running = Verdict::Undetermined,
                Verdict::NoMatch => {}
            }
        }
        Ok(running.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        for child in &self.children {
            child.gather_value_host_names(names);
        }
    }
}
