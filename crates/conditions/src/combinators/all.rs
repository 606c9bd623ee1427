//! Conjunction over child conditions.

use std::collections::BTreeSet;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches when every child matches.
///
/// NoMatch short-circuits the fold. A child left Undetermined (after any
/// `treat_undetermined_as` substitution) downgrades the running result but
/// the fold continues, so a later NoMatch still wins. No children means
/// there is nothing to affirm: Undetermined.
#[derive(Debug)]
pub struct AllMatchCondition {
    condition_type: ConditionType,
    category: ConditionCategory,
    treat_undetermined_as: Option<Verdict>,
    children: Vec<Box<dyn Condition>>,
}

impl AllMatchCondition {
    /// # Errors
    ///
    /// Whatever the factory reports about a child config.
    pub fn new(config: &ConditionConfig, factory: &ConditionFactory) -> Result<Self, ConditionError> {
        Ok(Self {
            condition_type: config.resolved_type(ConditionType::ALL_MATCH),
            category: config.category.unwrap_or(ConditionCategory::Children),
            treat_undetermined_as: config.treat_undetermined_as,
            children: super::build_children(config, factory)?,
        })
    }
}

impl Condition for AllMatchCondition {
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
        let mut running = Verdict::Match;
        for child in &self.children {
            match super::evaluate_child(
                child.as_ref(),
                &self.condition_type,
                self.treat_undetermined_as,
                value_host,
                ctx,
            )? {
                Verdict::NoMatch => return Ok(Verdict::NoMatch.into()),
                Verdict::Undetermined => running = Verdict::Undetermined,
                Verdict::Match => {}
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
