//! # parallax-conditions
//!
//! The Parallax condition engine: config-driven predicates over named
//! values, answering with a three-valued [`Verdict`].
//!
//! - [`Verdict`] / [`Evaluation`]: Match, NoMatch, or Undetermined, the
//!   last meaning "this rule has no business judging what it saw." Data
//!   mismatches land there; only configuration mistakes become errors.
//! - [`ConditionConfig`]: one serializable descriptor shape for every
//!   condition family, nested `children` included.
//! - [`ConditionFactory`]: builds condition trees from configs; hosts
//!   register custom families next to the built-ins.
//! - [`conditions`]: the built-in leaf families for presence, data-type,
//!   pattern, range, length checks and the six-operator comparison.
//! - [`combinators`]: AllMatch, AnyMatch, CountMatches and Not over
//!   child conditions.
//! - [`ConditionServices`] / [`EvalContext`]: the converter, comparer and
//!   factory bundle plus the per-call resolver borrow.
//!
//! # Examples
//!
//! ```rust
//! use parallax_conditions::prelude::*;
//! use parallax_value::Value;
//!
//! // The quantity must be filled in AND lie between 1 and 99.
//! let mut services = ConditionServices::with_defaults();
//! services.converters_mut().register_standard();
//!
//! let config = ConditionConfig::new(ConditionType::ALL_MATCH)
//!     .with_child(ConditionConfig::new(ConditionType::NOT_NULL))
//!     .with_child(
//!         ConditionConfig::new(ConditionType::RANGE)
//!             .with_minimum(Value::from(1))
//!             .with_maximum(Value::from(99)),
//!     );
//! let condition = services.factory().create(&config)?;
//!
//! // Children name no value host, so they judge the one passed in.
//! let resolver = StaticResolver::new();
//! let ctx = EvalContext::new(&resolver, &services);
//! let quantity = StaticValueHost::new("quantity", Some(Value::from(12)));
//!
//! let evaluation = condition.evaluate(Some(&quantity), &ctx)?;
//! assert_eq!(evaluation.as_ready(), Some(Verdict::Match));
//! # Ok::<(), parallax_conditions::ConditionError>(())
//! ```

mod condition;
mod config;
mod error;
mod factory;
mod hosts;
mod services;
mod tokens;
mod types;
mod verdict;

pub mod combinators;
pub mod conditions;

pub use condition::{Condition, EvaluateDuringEdit};
pub use config::ConditionConfig;
pub use error::ConditionError;
pub use factory::{ConditionBuilder, ConditionFactory};
pub use hosts::{
    EmptyResolver, StaticResolver, StaticValueHost, ValueHost, ValueHostName, ValueHostResolver,
};
pub use services::{ConditionServices, EvalContext};
pub use tokens::{MessageTokenSource, TokenPurpose, TokenValue, TokenValues};
pub use types::{ConditionCategory, ConditionType};
pub use verdict::{Evaluation, PendingVerdict, Verdict};

/// Everything a host typically needs in scope.
pub mod prelude {
    pub use crate::combinators::{
        AllMatchCondition, AnyMatchCondition, CountMatchesCondition, NotCondition,
    };
    pub use crate::conditions::{
        CompareCondition, CompareOperator, DataTypeCheckCondition, NotNullCondition,
        RangeCondition, RegExpCondition, RequireTextCondition, StringLengthCondition,
    };
    pub use crate::{
        Condition, ConditionCategory, ConditionConfig, ConditionError, ConditionFactory,
        ConditionServices, ConditionType, EvalContext, EvaluateDuringEdit, Evaluation,
        MessageTokenSource, StaticResolver, StaticValueHost, ValueHost, ValueHostName,
        ValueHostResolver, Verdict,
    };
}
