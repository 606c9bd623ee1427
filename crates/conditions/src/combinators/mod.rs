//! Conditions over other conditions.
//!
//! Combinators build their children eagerly through the factory, so a bad
//! child config fails when the tree is built, not mid-fold. During a fold,
//! children inherit the combinator's received value host: a child naming no
//! `value_host_name` judges the same value the parent was asked about.

mod all;
mod any;
mod count;
mod not;

pub use all::AllMatchCondition;
pub use any::AnyMatchCondition;
pub use count::CountMatchesCondition;
pub use not::NotCondition;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::factory::ConditionFactory;
use crate::hosts::ValueHost;
use crate::services::EvalContext;
use crate::types::ConditionType;
use crate::verdict::{Evaluation, Verdict};

/// Builds the eager child list every combinator shares.
pub(crate) fn build_children(
    config: &ConditionConfig,
    factory: &ConditionFactory,
) -> Result<Vec<Box<dyn Condition>>, ConditionError> {
    config
        .children
        .iter()
        .map(|child| factory.create(child))
        .collect()
}

/// Runs one child to a settled verdict, applying the parent's
/// undetermined substitution.
///
/// Combinator folds are synchronous; a child that answers with a pending
/// evaluation cannot be folded and aborts the parent outright.
pub(crate) fn evaluate_child(
    child: &dyn Condition,
    parent_type: &ConditionType,
    treat_undetermined_as: Option<Verdict>,
    value_host: Option<&dyn ValueHost>,
    ctx: &EvalContext<'_>,
) -> Result<Verdict, ConditionError> {
    match child.evaluate(value_host, ctx)? {
        Evaluation::Ready(verdict) => Ok(verdict.substitute_undetermined(treat_undetermined_as)),
        Evaluation::Pending(_) => {
            tracing::error!(
                condition = %parent_type,
                child = %child.condition_type(),
                "child conditions must settle synchronously"
            );
            Err(ConditionError::PendingChild {
                condition_type: parent_type.clone(),
            })
        }
    }
}
