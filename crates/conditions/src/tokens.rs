//! Message-token contribution.
//!
//! Conditions expose the data needed to fill placeholders like `{Minimum}`
//! or `{CompareTo}` in human-readable messages. This is a pure side channel:
//! querying tokens never evaluates anything and never changes a verdict.
//! The message formatter consuming these triples lives outside this crate.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use parallax_value::Value;

use crate::hosts::ValueHost;
use crate::services::EvalContext;

/// What a token is for, so the formatter can pick rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// A display label, e.g. the second value host's label.
    Label,
    /// A configured parameter, e.g. a range bound.
    Parameter,
    /// A live evaluated value, e.g. the last string length.
    Value,
    /// A complete message fragment supplied by the host.
    Message,
}

/// One `{token}` placeholder filling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenValue {
    /// The placeholder name without braces.
    pub label: Cow<'static, str>,
    /// The filling; `None` renders as an absent/empty token.
    pub value: Option<Value>,
    pub purpose: TokenPurpose,
}

impl TokenValue {
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        value: Option<Value>,
        purpose: TokenPurpose,
    ) -> Self {
        Self {
            label: label.into(),
            value,
            purpose,
        }
    }
}

/// Token lists are short; four slots cover every built-in condition.
pub type TokenValues = SmallVec<[TokenValue; 4]>;

/// Capability trait for conditions that contribute message tokens.
///
/// Obtained through
/// [`Condition::as_token_source`](crate::Condition::as_token_source), never
/// by downcasting. Implementations derive tokens from configuration, the
/// resolver, and at most a remembered last-evaluated datum, never by
/// re-running evaluation.
pub trait MessageTokenSource: Send + Sync {
    fn token_values(
        &self,
        value_host: Option<&dyn ValueHost>,
        ctx: &EvalContext<'_>,
    ) -> TokenValues;
}
