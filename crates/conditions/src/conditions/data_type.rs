//! Did the host manage to parse what the user typed?

use std::collections::BTreeSet;

use parallax_value::Value;

use crate::condition::Condition;
use crate::config::ConditionConfig;
use crate::error::ConditionError;
use crate::hosts::{ValueHost, ValueHostName};
use crate::services::EvalContext;
use crate::tokens::{MessageTokenSource, TokenPurpose, TokenValue, TokenValues};
use crate::types::{ConditionCategory, ConditionType};
use crate::verdict::{Evaluation, Verdict};

/// Matches when the host's raw input text produced a native value.
///
/// The host owns text-to-native conversion; this condition only inspects
/// the outcome. Input text with no native value means that conversion
/// failed. A native `Null` still counts as converted; null-ness is
/// [`NotNullCondition`](crate::conditions::NotNullCondition)'s business.
#[derive(Debug)]
pub struct DataTypeCheckCondition {
    condition_type: ConditionType,
    config: ConditionConfig,
}

impl DataTypeCheckCondition {
    #[must_use]
    pub fn new(config: &ConditionConfig) -> Self {
        Self {
            condition_type: config.resolved_type(ConditionType::DATA_TYPE_CHECK),
            config: config.clone(),
        }
    }
}

impl Condition for DataTypeCheckCondition {
    fn condition_type(&self) -> &ConditionType {
        &self.condition_type
    }

    fn category(&self) -> ConditionCategory {
        self.config
            .category
            .unwrap_or(ConditionCategory::DataTypeCheck)
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
        let verdict = if host.input_value().is_none() {
            tracing::info!(
                condition = %self.condition_type,
                value_host = %host.name(),
                "no input text to check"
            );
            Verdict::Undetermined
        } else if host.value().is_some() {
            Verdict::Match
        } else {
            Verdict::NoMatch
        };
        Ok(verdict.into())
    }

    fn gather_value_host_names(&self, names: &mut BTreeSet<ValueHostName>) {
        if let Some(name) = &self.config.value_host_name {
            names.insert(name.clone());
        }
    }

    fn as_token_source(&self) -> Option<&dyn MessageTokenSource> {
        Some(self)
    }
}

impl MessageTokenSource for DataTypeCheckCondition {
    fn token_values(
        &self,
        value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> TokenValues {
        let host = ctx.lookup_primary(self.config.value_host_name.as_ref(), value_host);
        let error = host
            .and_then(ValueHost::conversion_error)
            .map(Value::from);
        let mut tokens = TokenValues::new();
        tokens.push(TokenValue::new(
            "ConversionError",
            error,
            TokenPurpose::Message,
        ));
        tokens
    }
}
