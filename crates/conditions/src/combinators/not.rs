//! Negation of a single child condition.

use std::collections::BTreeSet;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Inverts its child: Match becomes NoMatch and vice versa.
///
/// Undetermined passes through untouched: not knowing whether the child
/// holds says nothing about its negation. Exactly one child is required.
#[derive(Debug)]
pub struct NotCondition {
    condition_type: ConditionType,
    category: ConditionCategory,
    child: Box<dyn Condition>,
}

impl NotCondition {
    /// # Errors
    ///
    /// [`ConditionError::InvalidParameter`] unless the config carries
    /// exactly one child, plus whatever the factory reports about it.
    pub fn new(config: &ConditionConfig, factory: &ConditionFactory) -> Result<Self, ConditionError> {
        let condition_type = config.resolved_type(ConditionType::NOT);
        let mut children = super::build_children(config, factory)?;
        if children.len() != 1 {
            let found = children.len();
            tracing::error!(condition = %condition_type, found, "expected exactly one child");
            return Err(ConditionError::InvalidParameter {
                condition_type,
                field: "children",
                reason: format!("expected exactly one child, found {found}"),
            });
        }
        Ok(Self {
            condition_type,
            category: config.category.unwrap_or(ConditionCategory::Children),
            child: children.swap_remove(0),
        })
    }
}

impl Condition for NotCondition {
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
        let verdict = match super::evaluate_child(
            self.child.as_ref(),
            &self.condition_type,
            None,
            value_host,
            ctx,
        )? {
            Verdict::Match => Verdict::NoMatch,
            Verdict::NoMatch => Verdict::Match,
            Verdict::Undetermined => Verdict::Undetermined,
        };
        Ok(verdict.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        self.child.gather_value_host_names(names);
    }
}
