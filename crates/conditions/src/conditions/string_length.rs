//! Character-count bounds over text values.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use smallvec::smallvec;

use parallax_value::Value;

use crate::condition::{Condition, EvaluateDuringEdit};
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::tokens::{MessageTokenSource, TokenPurpose, TokenValue, TokenValues};
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches text whose character count lies inclusively within the bounds.
///
/// Counts `char`s, not bytes, so accented and emoji input is judged by
/// what the user sees. Trims by default (`trim: false` disables). The last
/// counted length is remembered for the `{Length}` message token; it reads
/// 0 until the first evaluation.
#[derive(Debug)]
pub struct StringLengthCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
    minimum: Option<i64>,
    maximum: Option<i64>,
    last_length: AtomicUsize,
}

impl StringLengthCondition {
    /// # Errors
    ///
    /// [`ConditionError::InvalidParameter`] when a bound is present but not
    /// an Integer value.
    pub fn new(config: &ConditionConfig) -> Result<Self, ConditionError> {
        let condition_type = config.resolved_type(ConditionType::STRING_LENGTH);
        let minimum = super::integer_bound(&condition_type, "minimum", config.minimum.as_ref())?;
        let maximum = super::integer_bound(&condition_type, "maximum", config.maximum.as_ref())?;
        Ok(Self {
            condition_type,
            config: config.clone(),
            minimum,
            maximum,
            last_length: AtomicUsize::new(0),
        })
    }

    fn judge(&self, text: &str) -> Verdict {
        let text = if self.config.trim.unwrap_or(true) {
            text.trim()
        } else {
            text
        };
        let length = text.chars().count();
        self.last_length.store(length, Ordering::Relaxed);

        let length = i64::try_from(length).unwrap_or(i64::MAX);
        if self.minimum.is_some_and(|minimum| length < minimum)
            || self.maximum.is_some_and(|maximum| length > maximum)
        {
            Verdict::NoMatch
        } else {
            Verdict::Match
        }
    }
}

impl Condition for StringLengthCondition {
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
        Some(self)
    }

    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        Some(self)
    }
}

impl EvaluateDuringEdit for StringLengthCondition {
    fn evaluate_during_edit(
        &self,
        text: &str,
        _value_host: &dyn ValueHost,
        _ctx: &EvalContext<'_>,
    ) -> Result<Verdict, ConditionError> {
        Ok(self.judge(text))
    }
}

impl MessageTokenSource for StringLengthCondition {
    fn token_values(
        &self,
        _value_host: Option<&dyn ValueHost>,
        _ctx: &EvalContext<'_>,
    ) -> TokenValues {
        let length = self.last_length.load(Ordering::Relaxed);
        let length = i64::try_from(length).unwrap_or(i64::MAX);
        smallvec![
            TokenValue::new("Length", Some(Value::from(length)), TokenPurpose::Value),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::{EmptyResolver, StaticValueHost};
    use crate::services::ConditionServices;

    fn verdict_for(condition: &StringLengthCondition, value: Option<Value>) -> Verdict {
        let services = ConditionServices::new();
        let resolver = EmptyResolver;
        let ctx = EvalContext::new(&resolver, &services);
        let host = StaticValueHost::new("field", value);
        condition
            .evaluate(Some(&host), &ctx)
            .unwrap()
            .as_ready()
            .unwrap()
    }

    fn bounded(minimum: i64, maximum: i64) -> StringLengthCondition {
        StringLengthCondition::new(
            &ConditionConfig::default()
                .with_minimum(Value::from(minimum))
                .with_maximum(Value::from(maximum)),
        )
        .unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let condition = bounded(2, 4);
        assert_eq!(verdict_for(&condition, Some(Value::from("a"))), Verdict::NoMatch);
        assert_eq!(verdict_for(&condition, Some(Value::from("ab"))), Verdict::Match);
        assert_eq!(
            verdict_for(&condition, Some(Value::from("abcd"))),
            Verdict::Match
        );
        assert_eq!(
            verdict_for(&condition, Some(Value::from("abcde"))),
            Verdict::NoMatch
        );
    }

    #[test]
    fn characters_count_not_bytes() {
        // Five chars, more than five bytes.
        let condition = bounded(5, 5);
        assert_eq!(
            verdict_for(&condition, Some(Value::from("héllo"))),
            Verdict::Match
        );
    }

    #[test]
    fn trimming_is_on_by_default() {
        let condition = bounded(3, 3);
        assert_eq!(
            verdict_for(&condition, Some(Value::from("  abc  "))),
            Verdict::Match
        );

        let raw = StringLengthCondition::new(
            &ConditionConfig::default()
                .with_minimum(Value::from(3))
                .with_maximum(Value::from(3))
                .with_trim(false),
        )
        .unwrap();
        assert_eq!(
            verdict_for(&raw, Some(Value::from("  abc  "))),
            Verdict::NoMatch
        );
    }

    #[test]
    fn non_text_undefined_and_null_are_undetermined() {
        let condition = bounded(1, 10);
        assert_eq!(verdict_for(&condition, None), Verdict::Undetermined);
        assert_eq!(
            verdict_for(&condition, Some(Value::Null)),
            Verdict::Undetermined
        );
        assert_eq!(
            verdict_for(&condition, Some(Value::from(12345))),
            Verdict::Undetermined
        );
    }

    #[test]
    fn non_integer_bounds_are_rejected_at_build() {
        let err = StringLengthCondition::new(
            &ConditionConfig::default().with_minimum(Value::from(2.5)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConditionError::InvalidParameter {
                field: "minimum",
                ..
            }
        ));
    }

    #[test]
    fn length_token_remembers_the_last_evaluation() {
        let condition = bounded(1, 10);
        let services = ConditionServices::new();
        let resolver = EmptyResolver;
        let ctx = EvalContext::new(&resolver, &services);
        let source = condition.as_token_source().unwrap();

        let tokens = source.token_values(None, &ctx);
        assert_eq!(tokens[0].label, "Length");
        assert_eq!(tokens[0].value, Some(Value::Integer(0)));

        verdict_for(&condition, Some(Value::from("hello")));
        let tokens = source.token_values(None, &ctx);
        assert_eq!(tokens[0].value, Some(Value::Integer(5)));
        assert_eq!(tokens[1].value, Some(Value::Integer(1)));
        assert_eq!(tokens[2].value, Some(Value::Integer(10)));
    }

    #[test]
    fn during_edit_judges_and_remembers_too() {
        let condition = bounded(2, 4);
        let services = ConditionServices::new();
        let resolver = EmptyResolver;
        let ctx = EvalContext::new(&resolver, &services);
        let host = StaticValueHost::new("field", None);
        let editor = condition.as_during_edit().unwrap();

        assert_eq!(
            editor.evaluate_during_edit(" abc ", &host, &ctx).unwrap(),
            Verdict::Match
        );
        assert_eq!(
            condition.last_length.load(Ordering::Relaxed),
            3
        );
    }
}
