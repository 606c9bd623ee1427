//! Pattern containment over text values.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use parallax_value::Value;

use crate::condition::{Condition, EvaluateDuringEdit};
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches text containing the configured pattern.
///
/// Containment, not a full match: `^…$` anchors only when the pattern
/// anchors itself. The pattern compiles once, at construction, so a broken
/// expression surfaces when the condition is built rather than on the first
/// evaluation. `not: true` swaps Match and NoMatch but never touches the
/// Undetermined path.
#[derive(Debug)]
pub struct RegExpCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
    regex: Regex,
}

impl RegExpCondition {
    /// Compiles `expression` with the `ignore_case`/`multiline` flags.
    ///
    /// # Errors
    ///
    /// [`ConditionError::MissingParameter`] without an expression,
    /// [`ConditionError::InvalidParameter`] when it does not compile.
    pub fn new(config: &ConditionConfig) -> Result<Self, ConditionError> {
        let condition_type = config.resolved_type(ConditionType::REG_EXP);
        let Some(expression) = config.expression.as_deref() else {
            tracing::error!(condition = %condition_type, "a pattern expression is required");
            return Err(ConditionError::MissingParameter {
                condition_type,
                field: "expression",
            });
        };
        let regex = RegexBuilder::new(expression)
            .case_insensitive(config.ignore_case.unwrap_or(false))
            .multi_line(config.multiline.unwrap_or(false))
            .build()
            .map_err(|source| {
                tracing::error!(
                    condition = %condition_type,
                    expression,
                    error = %source,
                    "pattern does not compile"
                );
                ConditionError::InvalidParameter {
                    condition_type: condition_type.clone(),
                    field: "expression",
                    reason: source.to_string(),
                }
            })?;
        Ok(Self::with_regex(regex, config))
    }

    /// Wraps a pattern the host compiled itself; the `expression` and flag
    /// fields of `config` are ignored.
    #[must_use]
    pub fn with_regex(regex: Regex, config: &ConditionConfig) -> Self {
        Self {
            condition_type: config.resolved_type(ConditionType::REG_EXP),
            config: config.clone(),
            regex,
        }
    }

    fn judge(&self, text: &str) -> Verdict {
        let matched = self.regex.is_match(text);
        if matched != self.config.not.unwrap_or(false) {
            Verdict::Match
        } else {
            Verdict::NoMatch
        }
    }
}

impl Condition for RegExpCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.config.category.unwrap_or(ConditionCategory::Contents)
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
            None | Some(Value::Null) => Verdict::Undetermined,
            Some(Value::Text(text)) => self.judge(&text),
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
        if self.config.supports_during_edit.unwrap_or(false) {
            Some(self)
        } else {
            None
        }
    }
}

impl EvaluateDuringEdit for RegExpCondition {
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
        Ok(self.judge(text))
    }
}
