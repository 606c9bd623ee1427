//! The condition configuration record.
//!
//! A [`ConditionConfig`] is an immutable descriptor: the host application
//! builds one (in code or by deserializing), hands it to the factory, and
//! never mutates it again. Conditions own a clone and treat it as read-only
//! for their entire lifetime; "changing" a rule means building a new config
//! and a new condition.

use serde::{Deserialize, Serialize};

use parallax_value::{LookupKey, Value};

use crate::hosts::ValueHostName;
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::Verdict;

/// Immutable descriptor of one predicate instance.
///
/// One record shape serves every condition family; each family reads the
/// fields it understands and ignores the rest. Host-defined condition types
/// park their own parameters in [`extra`](Self::extra).
///
/// # Examples
///
/// ```rust
/// use parallax_conditions::{ConditionConfig, ConditionType};
/// use parallax_value::Value;
///
/// let config = ConditionConfig::new(ConditionType::RANGE)
///     .with_value_host_name("quantity")
///     .with_minimum(Value::from(1))
///     .with_maximum(Value::from(99));
///
/// assert_eq!(config.condition_type, ConditionType::RANGE);
/// assert_eq!(config.minimum, Some(Value::Integer(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionConfig {
    /// The type tag the factory dispatches on.
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    /// The named value this condition evaluates; `None` means "the value
    /// under evaluation by the parent context."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_host_name: Option<ValueHostName>,

    /// Overrides the condition's default category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ConditionCategory>,

    /// Forces the primary value through a conversion before comparison.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_lookup_key: Option<LookupKey>,

    /// The second operand of a binary comparison, as a live named value.
    /// Takes precedence over [`second_value`](Self::second_value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_value_host_name: Option<ValueHostName>,

    /// Forces the second operand through a conversion before comparison.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_conversion_lookup_key: Option<LookupKey>,

    /// The second operand of a binary comparison, as a literal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_value: Option<Value>,

    /// Inclusive lower bound: a value for Range, an integer for
    /// StringLength and CountMatches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,

    /// Inclusive upper bound; same shapes as `minimum`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,

    /// Pattern source for RegExp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// RegExp flag: case-insensitive matching.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,

    /// RegExp flag: `^`/`$` match at line boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,

    /// RegExp: inverts Match/NoMatch. Never inverts Undetermined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<bool>,

    /// Trim text before during-edit checks and length counting.
    /// Defaults to true wherever it applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<bool>,

    /// Opts a RegExp condition into during-edit evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_during_edit: Option<bool>,

    /// RequireText: the verdict for a null value (default NoMatch).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_value_result: Option<Verdict>,

    /// Combinators: substitute child Undetermined verdicts before folding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_undetermined_as: Option<Verdict>,

    /// Combinators: the child condition descriptors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConditionConfig>,

    /// Parameters for host-defined condition types.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConditionConfig {
    /// A config for `condition_type` with every other field unset.
    #[must_use]
    pub fn new(condition_type: impl Into<ConditionType>) -> Self {
        Self {
            condition_type: condition_type.into(),
            ..Self::default()
        }
    }

    /// The configured type when one was set, else `fallback`: the per-type
    /// default a condition reports as its identity.
    #[must_use]
    pub fn resolved_type(&self, fallback: ConditionType) -> ConditionType {
        if self.condition_type == ConditionType::UNKNOWN {
            fallback
        } else {
            self.condition_type.clone()
        }
    }

    #[must_use]
    pub fn with_value_host_name(mut self, name: impl Into<ValueHostName>) -> Self {
        self.value_host_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ConditionCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_conversion_lookup_key(mut self, key: LookupKey) -> Self {
        self.conversion_lookup_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_second_value_host_name(mut self, name: impl Into<ValueHostName>) -> Self {
        self.second_value_host_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_second_conversion_lookup_key(mut self, key: LookupKey) -> Self {
        self.second_conversion_lookup_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_second_value(mut self, value: Value) -> Self {
        self.second_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_minimum(mut self, minimum: Value) -> Self {
        self.minimum = Some(minimum);
        self
    }

    #[must_use]
    pub fn with_maximum(mut self, maximum: Value) -> Self {
        self.maximum = Some(maximum);
        self
    }

    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    #[must_use]
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }

    #[must_use]
    pub fn with_multiline(mut self, multiline: bool) -> Self {
        self.multiline = Some(multiline);
        self
    }

    #[must_use]
    pub fn with_not(mut self, not: bool) -> Self {
        self.not = Some(not);
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    #[must_use]
    pub fn with_supports_during_edit(mut self, supported: bool) -> Self {
        self.supports_during_edit = Some(supported);
        self
    }

    #[must_use]
    pub fn with_null_value_result(mut self, verdict: Verdict) -> Self {
        self.null_value_result = Some(verdict);
        self
    }

    #[must_use]
    pub fn with_treat_undetermined_as(mut self, verdict: Verdict) -> Self {
        self.treat_undetermined_as = Some(verdict);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ConditionConfig) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ConditionConfig>) -> Self {
        self.children.extend(children);
        self
    }
}
