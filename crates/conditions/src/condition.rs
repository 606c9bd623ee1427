//! The condition contract.
//!
//! Every predicate in this crate, and every host-defined one, implements
//! [`Condition`]. Conditions are stateless evaluators built from exactly one
//! [`ConditionConfig`](crate::ConditionConfig): evaluating one never mutates
//! its configuration or any sibling, so a built condition can be evaluated
//! repeatedly and concurrently.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::tokens::MessageTokenSource;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

// ============================================================================
// CONDITION TRAIT
// ============================================================================

/// A stateless predicate over host-supplied values.
///
/// # Evaluation contract
///
/// `evaluate` receives the value host under evaluation (if the caller has
/// one) and the evaluation context, and returns
/// [`Evaluation::Ready`](crate::Evaluation::Ready) with a three-valued
/// [`Verdict`], or [`Evaluation::Pending`](crate::Evaluation::Pending) for
/// the one asynchronous escape hatch. Configuration mistakes (an unknown
/// primary host name, most prominently) come back as `Err` and abort the
/// evaluation; everything the host must tolerate at runtime (empty fields,
/// wrong types, unordered operands) is `Ok(Ready(Undetermined))` instead.
///
/// # Primary host resolution
///
/// A `value_host_name` in the condition's config takes precedence and is
/// resolved through the context; only when the config names nothing does the
/// passed `value_host` apply. See
/// [`EvalContext::primary_host`](crate::EvalContext::primary_host).
///
/// # Capabilities
///
/// Optional contracts are discovered through typed queries rather than
/// downcasting: [`as_during_edit`](Self::as_during_edit) for live-edit
/// evaluation and [`as_token_source`](Self::as_token_source) for message
/// tokens. Both default to `None`.
///
/// # Examples
///
/// ```rust,ignore
/// let services = ConditionServices::with_defaults();
/// let condition = services.factory().create(
///     &ConditionConfig::new(ConditionType::REQUIRE_TEXT),
/// )?;
///
/// let host = StaticValueHost::new("name", Some(Value::from("Ada")));
/// let ctx = EvalContext::new(&resolver, &services);
/// let verdict = condition.evaluate(Some(&host), &ctx)?;
/// ```
pub trait Condition: fmt::Debug + Send + Sync {
    /// Identity tag; never changes after construction.
    fn condition_type(&self) -> &ConditionType;

    /// Coarse grouping for validator ordering and severity defaults.
    /// Evaluation logic never branches on it.
    fn category(&self) -> ConditionCategory {
        ConditionCategory::Undetermined
    }

    /// Evaluates this condition against the current values.
    fn evaluate(
        &self,
        value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> Result<Evaluation, ConditionError>;

    /// Collects every named value this condition depends on, for
    /// change-propagation. Combinators recurse; implicit "value under
    /// evaluation" references contribute nothing.
    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>);

    /// The during-edit capability, when this condition supports it.
    fn as_during_edit(&self) -> Option<&dyn EvaluateDuringEdit> {
        None
    }

    /// The message-token capability, when this condition contributes any.
    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        None
    }
}

// ============================================================================
// DURING-EDIT CAPABILITY
// ============================================================================

/// Evaluation over raw, not-yet-committed text.
///
/// Runs while the user is still typing, before the host has parsed the text
/// into a native value, so it only sees a `&str`. Verdicts are two-valued in
/// practice: the text is always present, so the usual Undetermined triggers
/// (missing value, wrong runtime type) cannot arise.
pub trait EvaluateDuringEdit: Send + Sync {
    fn evaluate_during_edit(
        &self,
        text: &str,
        value_host: &dyn ValueHost,
        ctx: &EvalContext<'_>,
    ) -> Result<Verdict, ConditionError>;
}
