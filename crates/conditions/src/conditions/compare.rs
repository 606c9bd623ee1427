//! The binary comparison family: one condition, six operators.

use std::collections::BTreeSet;
use std::fmt;

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

// ============================================================================
// OPERATOR
// ============================================================================

/// Which comparison outcome satisfies a [`CompareCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOperator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl CompareOperator {
    pub const ALL: [Self; 6] = [
        Self::EqualTo,
        Self::NotEqualTo,
        Self::GreaterThan,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::LessThanOrEqual,
    ];

    /// The condition type this operator registers under by default.
    #[must_use]
    pub const fn default_type(self) -> ConditionType {
        match self {
            Self::EqualTo => ConditionType::EQUAL_TO,
            Self::NotEqualTo => ConditionType::NOT_EQUAL_TO,
            Self::GreaterThan => ConditionType::GREATER_THAN,
            Self::GreaterThanOrEqual => ConditionType::GREATER_THAN_OR_EQUAL,
            Self::LessThan => ConditionType::LESS_THAN,
            Self::LessThanOrEqual => ConditionType::LESS_THAN_OR_EQUAL,
        }
    }

    /// Ordering operators refuse boolean operands.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        !matches!(self, Self::EqualTo | Self::NotEqualTo)
    }

    /// Maps a comparer outcome onto the three-valued verdict.
    ///
    /// Incomparable never satisfies or fails an operator, and an ordering
    /// operator never coerces an unordered NotEqual into NoMatch.
    #[must_use]
    pub fn verdict(self, outcome: ComparisonResult) -> Verdict {
        match (self, outcome) {
            (_, ComparisonResult::Incomparable) => Verdict::Undetermined,
            (Self::EqualTo, ComparisonResult::Equal) => Verdict::Match,
            (Self::EqualTo, _) => Verdict::NoMatch,
            (Self::NotEqualTo, ComparisonResult::Equal) => Verdict::NoMatch,
            (Self::NotEqualTo, _) => Verdict::Match,
            (_, ComparisonResult::NotEqual) => Verdict::Undetermined,
            (Self::GreaterThan, ComparisonResult::GreaterThan)
            | (Self::GreaterThanOrEqual, ComparisonResult::GreaterThan | ComparisonResult::Equal)
            | (Self::LessThan, ComparisonResult::LessThan)
            | (Self::LessThanOrEqual, ComparisonResult::LessThan | ComparisonResult::Equal) => {
                Verdict::Match
            }
            _ => Verdict::NoMatch,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_type().as_str())
    }
}

// ============================================================================
// CONDITION
// ============================================================================

/// Compares the primary value against a second operand.
///
/// The second operand is either a live named value
/// (`second_value_host_name`, resolved on every evaluation) or a
/// `second_value` literal. Gaps around the second operand (an unknown
/// host name, an undefined or null second value) are deliberately soft:
/// the rule withdraws with Undetermined instead of failing, unlike the
/// primary reference where an unknown name is a config error.
#[derive(Debug)]
pub struct CompareCondition {
    condition_type: ConditionType,
    operator: CompareOperator,
    config: ConditionConfig,
}

impl CompareCondition {
    #[must_use]
    pub fn new(config: &ConditionConfig, operator: CompareOperator) -> Self {
        Self {
            condition_type: config.resolved_type(operator.default_type()),
            operator,
            config: config.clone(),
        }
    }

    #[must_use]
    pub fn operator(&self) -> CompareOperator {
        self.operator
    }

    /// The converted second operand, or `None` for any soft gap around it.
    fn second_operand(&self, ctx: &EvalContext<'_>) -> Option<Value> {
        let raw = if let Some(name) = &self.config.second_value_host_name {
            let Some(host) = ctx.resolver().value_host(name.as_str()) else {
                tracing::warn!(
                    condition = %self.condition_type,
                    value_host = %name,
                    "second value host is not known to the resolver"
                );
                return None;
            };
            match host.value() {
                None | Some(Value::Null) => {
                    tracing::info!(
                        condition = %self.condition_type,
                        value_host = %name,
                        "second value host has nothing to compare against"
                    );
                    return None;
                }
                Some(value) => value,
            }
        } else if let Some(value) = &self.config.second_value {
            if value.is_null() {
                tracing::info!(condition = %self.condition_type, "second value is null");
                return None;
            }
            value.clone()
        } else {
            tracing::warn!(condition = %self.condition_type, "no second operand configured");
            return None;
        };

        let key = self.config.second_conversion_lookup_key.as_ref();
        let converted = ctx.services().convert_for_comparison(&raw, key);
        if converted.is_none() {
            tracing::info!(
                condition = %self.condition_type,
                lookup_key = ?key,
                "second value did not convert for comparison"
            );
        }
        converted
    }

    /// [`second_operand`](Self::second_operand) without the logging, for
    /// the token side channel.
    fn peek_second(&self, ctx: &EvalContext<'_>) -> Option<Value> {
        let raw = if let Some(name) = &self.config.second_value_host_name {
            ctx.resolver().value_host(name.as_str())?.value()?
        } else {
            self.config.second_value.clone()?
        };
        ctx.services()
            .convert_for_comparison(&raw, self.config.second_conversion_lookup_key.as_ref())
    }
}

impl Condition for CompareCondition {
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

        let Some(second) = self.second_operand(ctx) else {
            return Ok(Verdict::Undetermined.into());
        };

        if self.operator.is_ordering()
            && (matches!(value, Value::Boolean(_)) || matches!(second, Value::Boolean(_)))
        {
            tracing::info!(
                condition = %self.condition_type,
                "booleans have no ordering"
            );
            return Ok(Verdict::Undetermined.into());
        }

        let outcome = ctx.services().compare_values(&value, &second);
        Ok(self.operator.verdict(outcome).into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        if let Some(name) = &self.config.value_host_name {
            names.insert(name.clone());
        }
        if let Some(name) = &self.config.second_value_host_name {
            names.insert(name.clone());
        }
    }

    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        Some(self)
    }
}

impl MessageTokenSource for CompareCondition {
    fn token_values(
        &self,
        _value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> TokenValues {
        let second_label = self
            .config
            .second_value_host_name
            .as_ref()
            .and_then(|name| ctx.resolver().value_host(name.as_str()))
            .map_or_else(String::new, |host| host.label().to_owned());
        smallvec![
            TokenValue::new(
                "SecondLabel",
                Some(Value::from(second_label)),
                TokenPurpose::Label
            ),
            TokenValue::new("CompareTo", self.peek_second(ctx), TokenPurpose::Value),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::{EmptyResolver, StaticResolver, StaticValueHost};
    use crate::services::ConditionServices;
    use parallax_value::keys;

    fn against_literal(operator: CompareOperator, second: Value) -> CompareCondition {
        CompareCondition::new(
            &ConditionConfig::default().with_second_value(second),
            operator,
        )
    }

    fn verdict_for(condition: &CompareCondition, value: Option<Value>) -> Verdict {
        let mut services = ConditionServices::with_defaults();
        services.converters_mut().register_standard();
        let resolver = EmptyResolver;
        let ctx = EvalContext::new(&resolver, &services);
        let host = StaticValueHost::new("field", value);
        condition
            .evaluate(Some(&host), &ctx)
            .unwrap()
            .as_ready()
            .unwrap()
    }

    #[test]
    fn equality_operators() {
        let equal = against_literal(CompareOperator::EqualTo, Value::from(5));
        assert_eq!(verdict_for(&equal, Some(Value::from(5))), Verdict::Match);
        assert_eq!(verdict_for(&equal, Some(Value::from(6))), Verdict::NoMatch);

        let not_equal = against_literal(CompareOperator::NotEqualTo, Value::from(5));
        assert_eq!(verdict_for(&not_equal, Some(Value::from(6))), Verdict::Match);
        assert_eq!(
            verdict_for(&not_equal, Some(Value::from(5))),
            Verdict::NoMatch
        );
    }

    #[test]
    fn ordering_operators() {
        let greater = against_literal(CompareOperator::GreaterThan, Value::from(5));
        assert_eq!(verdict_for(&greater, Some(Value::from(7))), Verdict::Match);
        assert_eq!(verdict_for(&greater, Some(Value::from(5))), Verdict::NoMatch);
        assert_eq!(verdict_for(&greater, Some(Value::from(3))), Verdict::NoMatch);

        let at_least = against_literal(CompareOperator::GreaterThanOrEqual, Value::from(5));
        assert_eq!(verdict_for(&at_least, Some(Value::from(5))), Verdict::Match);

        let less = against_literal(CompareOperator::LessThan, Value::from(5));
        assert_eq!(verdict_for(&less, Some(Value::from(3))), Verdict::Match);
        assert_eq!(verdict_for(&less, Some(Value::from(5))), Verdict::NoMatch);

        let at_most = against_literal(CompareOperator::LessThanOrEqual, Value::from(5));
        assert_eq!(verdict_for(&at_most, Some(Value::from(5))), Verdict::Match);
        assert_eq!(verdict_for(&at_most, Some(Value::from(6))), Verdict::NoMatch);
    }

    #[test]
    fn integers_and_floats_promote() {
        let equal = against_literal(CompareOperator::EqualTo, Value::from(1.0));
        assert_eq!(verdict_for(&equal, Some(Value::from(1))), Verdict::Match);
    }

    #[test]
    fn booleans_compare_for_equality_but_never_order() {
        let equal = against_literal(CompareOperator::EqualTo, Value::from(true));
        assert_eq!(verdict_for(&equal, Some(Value::from(true))), Verdict::Match);
        assert_eq!(
            verdict_for(&equal, Some(Value::from(false))),
            Verdict::NoMatch
        );

        let greater = against_literal(CompareOperator::GreaterThan, Value::from(false));
        assert_eq!(
            verdict_for(&greater, Some(Value::from(true))),
            Verdict::Undetermined
        );
    }

    #[test]
    fn incomparable_kinds_are_undetermined() {
        let equal = against_literal(CompareOperator::EqualTo, Value::from(5));
        assert_eq!(
            verdict_for(&equal, Some(Value::from("five"))),
            Verdict::Undetermined
        );
    }

    #[test]
    fn undefined_and_null_primaries_are_undetermined() {
        let equal = against_literal(CompareOperator::EqualTo, Value::from(5));
        assert_eq!(verdict_for(&equal, None), Verdict::Undetermined);
        assert_eq!(
            verdict_for(&equal, Some(Value::Null)),
            Verdict::Undetermined
        );
    }

    #[test]
    fn conversion_key_rounds_before_comparing() {
        let condition = CompareCondition::new(
            &ConditionConfig::default()
                .with_conversion_lookup_key(keys::INTEGER.clone())
                .with_second_value(Value::from(100)),
            CompareOperator::EqualTo,
        );
        assert_eq!(
            verdict_for(&condition, Some(Value::from(99.9))),
            Verdict::Match
        );
        assert_eq!(
            verdict_for(&condition, Some(Value::from(100.6))),
            Verdict::NoMatch
        );
    }

    #[test]
    fn second_host_resolves_live() {
        let mut services = ConditionServices::with_defaults();
        services.converters_mut().register_standard();
        let resolver = StaticResolver::new()
            .with_host(StaticValueHost::new("limit", Some(Value::from(10))).with_label("Limit"));
        let ctx = EvalContext::new(&resolver, &services);

        let condition = CompareCondition::new(
            &ConditionConfig::default().with_second_value_host_name("limit"),
            CompareOperator::LessThan,
        );
        let host = StaticValueHost::new("field", Some(Value::from(5)));
        assert_eq!(
            condition
                .evaluate(Some(&host), &ctx)
                .unwrap()
                .as_ready()
                .unwrap(),
            Verdict::Match
        );
    }

    #[test]
    fn second_operand_gaps_are_soft() {
        let services = ConditionServices::with_defaults();
        let resolver = StaticResolver::new()
            .with_host(StaticValueHost::new("nothing", None))
            .with_host(StaticValueHost::new("nullish", Some(Value::Null)));
        let ctx = EvalContext::new(&resolver, &services);
        let host = StaticValueHost::new("field", Some(Value::from(5)));

        for config in [
            ConditionConfig::default().with_second_value_host_name("missing"),
            ConditionConfig::default().with_second_value_host_name("nothing"),
            ConditionConfig::default().with_second_value_host_name("nullish"),
            ConditionConfig::default().with_second_value(Value::Null),
            ConditionConfig::default(),
        ] {
            let condition = CompareCondition::new(&config, CompareOperator::EqualTo);
            assert_eq!(
                condition
                    .evaluate(Some(&host), &ctx)
                    .unwrap()
                    .as_ready()
                    .unwrap(),
                Verdict::Undetermined
            );
        }
    }

    #[test]
    fn gathers_both_operand_hosts() {
        let condition = CompareCondition::new(
            &ConditionConfig::default()
                .with_value_host_name("start")
                .with_second_value_host_name("end"),
            CompareOperator::LessThanOrEqual,
        );
        let mut names = BTreeSet::new();
        condition.gather_value_host_names(&mut names);
        assert_eq!(names.len(), 2);
        assert!(names.contains("start"));
        assert!(names.contains("end"));
    }

    #[test]
    fn tokens_describe_the_second_operand() {
        let services = ConditionServices::with_defaults();
        let resolver = StaticResolver::new()
            .with_host(StaticValueHost::new("limit", Some(Value::from(10))).with_label("Limit"));
        let ctx = EvalContext::new(&resolver, &services);

        let against_host = CompareCondition::new(
            &ConditionConfig::default().with_second_value_host_name("limit"),
            CompareOperator::LessThan,
        );
        let tokens = against_host.as_token_source().unwrap().token_values(None, &ctx);
        assert_eq!(tokens[0].label, "SecondLabel");
        assert_eq!(tokens[0].value, Some(Value::from("Limit")));
        assert_eq!(tokens[0].purpose, TokenPurpose::Label);
        assert_eq!(tokens[1].label, "CompareTo");
        assert_eq!(tokens[1].value, Some(Value::Integer(10)));

        let against_literal = CompareCondition::new(
            &ConditionConfig::default().with_second_value(Value::from(3)),
            CompareOperator::LessThan,
        );
        let tokens = against_literal
            .as_token_source()
            .unwrap()
            .token_values(None, &ctx);
        assert_eq!(tokens[0].value, Some(Value::from("")));
        assert_eq!(tokens[1].value, Some(Value::Integer(3)));
    }

    #[test]
    fn operator_verdict_table() {
        use ComparisonResult as R;
        use Verdict as V;

        let cases = [
            (CompareOperator::EqualTo, R::Equal, V::Match),
            (CompareOperator::EqualTo, R::LessThan, V::NoMatch),
            (CompareOperator::EqualTo, R::NotEqual, V::NoMatch),
            (CompareOperator::NotEqualTo, R::Equal, V::NoMatch),
            (CompareOperator::NotEqualTo, R::NotEqual, V::Match),
            (CompareOperator::NotEqualTo, R::GreaterThan, V::Match),
            (CompareOperator::GreaterThan, R::GreaterThan, V::Match),
            (CompareOperator::GreaterThan, R::Equal, V::NoMatch),
            (CompareOperator::GreaterThan, R::NotEqual, V::Undetermined),
            (CompareOperator::GreaterThanOrEqual, R::Equal, V::Match),
            (CompareOperator::GreaterThanOrEqual, R::LessThan, V::NoMatch),
            (CompareOperator::LessThan, R::LessThan, V::Match),
            (CompareOperator::LessThan, R::GreaterThan, V::NoMatch),
            (CompareOperator::LessThanOrEqual, R::Equal, V::Match),
            (CompareOperator::LessThanOrEqual, R::NotEqual, V::Undetermined),
        ];
        for (operator, outcome, expected) in cases {
            assert_eq!(operator.verdict(outcome), expected, "{operator} {outcome:?}");
        }
        for operator in CompareOperator::ALL {
            assert_eq!(operator.verdict(R::Incomparable), V::Undetermined);
        }
    }
}
