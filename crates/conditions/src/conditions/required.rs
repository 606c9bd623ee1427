//! Presence checks: text that must be filled in, values that must not be
//! null.

use std::collections::BTreeSet;

use parallax_value::Value;

use crate::condition::{Condition, EvaluateDuringEdit};
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

// ============================================================================
// REQUIRE TEXT
// ============================================================================

/// Matches a non-empty `Text` value, with no implicit trimming.
///
/// Null maps to the configured `null_value_result` (default NoMatch) so the
/// host decides whether null counts as "not filled in." Undefined and
/// non-text values stay out of the verdict entirely.
#[derive(Debug)]
pub struct RequireTextCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
}

impl RequireTextCondition {
    #[must_use]
    pub fn new(config: &ConditionConfig) -> Self {
        Self {
            condition_type: config.resolved_type(ConditionType::REQUIRE_TEXT),
            config: config.clone(),
        }
    }
}

impl Condition for RequireTextCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.config.category.unwrap_or(ConditionCategory::Required)
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
        let verdict = match host.value() {
            None => Verdict::Undetermined,
            Some(Value::Null) => self.config.null_value_result.unwrap_or(Verdict::NoMatch),
            Some(Value::Text(text)) => {
                if text.is_empty() {
                    Verdict::NoMatch
                } else {
                    Verdict::Match
                }
            }
            Some(other) => {
                tracing::info!(
                    condition = %self.condition_type,
                    value_host = %host.name(),
                    kind = %other.kind(),
                    "expected a text value"
                );
                Verdict::Undetermined
            }
        };
        Ok(verdict.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        if let Some(name) = &self.config.value_host_name {
            names.insert(name.clone());
        }
    }

    fn as_during_edit(&self) -> Option<&dyn EvaluateDuringEdit> {
        Some(self)
    }
}

impl EvaluateDuringEdit for RequireTextCondition {
    fn evaluate_during_edit(
        &self,
        text: &str,
        _value_host: &dyn ValueHost,
        _ctx: &EvalContext<'_>,
    ) -> Result<Verdict, ConditionError> {
        let text = if self.config.trim.unwrap_or(true) {
            text.trim()
        } else {
            text
        };
        Ok(if text.is_empty() {
            Verdict::NoMatch
        } else {
            Verdict::Match
        })
    }
}

// ============================================================================
// NOT NULL
// ============================================================================

/// Matches any defined, non-null value, `false`, `0` and `""` included.
#[derive(Debug)]
pub struct NotNullCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
}

impl NotNullCondition {
    #[must_use]
    pub fn new(config: &ConditionConfig) -> Self {
        Self {
            condition_type: config.resolved_type(ConditionType::NOT_NULL),
            config: config.clone(),
        }
    }
}

impl Condition for NotNullCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.config.category.unwrap_or(ConditionCategory::Required)
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
        let verdict = match host.value() {
            None => Verdict::Undetermined,
            Some(Value::Null) => Verdict::NoMatch,
            Some(_) => Verdict::Match,
        };
        Ok(verdict.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        if let Some(name) = &self.config.value_host_name {
            names.insert(name.clone());
        }
    }
}
