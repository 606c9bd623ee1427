//! Hard configuration errors.
//!
//! Only programmer and configuration mistakes surface as [`ConditionError`]:
//! an unregistered type, a missing primary host, a pattern that will not
//! compile. Legitimate "cannot judge right now" states are never errors:
//! they are [`Verdict::Undetermined`](crate::Verdict::Undetermined) plus a
//! warn/info log, and evaluation carries on.

use thiserror::Error;

use crate::hosts::ValueHostName;
use crate::types::ConditionType;

/// A configuration mistake the host cannot recover from at evaluation time.
///
/// Every variant is logged at error level at the site that produces it, so
/// the `Err` and the log line always agree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// The factory has no builder registered for the requested type tag.
    #[error("no condition registered for type `{condition_type}`")]
    UnknownConditionType { condition_type: ConditionType },

    /// A configured primary value host name that the resolver does not know.
    #[error("value host `{name}` is not known to the resolver")]
    UnknownValueHost { name: ValueHostName },

    /// The condition has neither a configured host name nor a host under
    /// evaluation to fall back to.
    #[error("condition `{condition_type}` has no value host to evaluate")]
    MissingValueHost { condition_type: ConditionType },

    /// A required configuration field was left out.
    #[error("condition `{condition_type}` requires the `{field}` parameter")]
    MissingParameter {
        condition_type: ConditionType,
        field: &'static str,
    },

    /// A configuration field is present but unusable.
    #[error("condition `{condition_type}`: invalid `{field}`: {reason}")]
    InvalidParameter {
        condition_type: ConditionType,
        field: &'static str,
        reason: String,
    },

    /// A combinator child returned a pending result; combinators fold
    /// synchronously and cannot await.
    #[error("condition `{condition_type}` has a child with a pending result")]
    PendingChild { condition_type: ConditionType },
}
