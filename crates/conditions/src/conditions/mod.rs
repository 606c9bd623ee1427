//! The built-in condition families.
//!
//! Each family is one config-driven struct; the factory's defaults map the
//! standard type tags onto them. All of them follow the same shape: resolve
//! the primary value host, judge the value, and keep every data-shaped
//! surprise inside the verdict instead of the error channel.

mod compare;
mod data_type;
mod range;
mod regexp;
mod required;
mod string_length;

pub use compare::{CompareCondition, CompareOperator};
pub use data_type::DataTypeCheckCondition;
pub use range::RangeCondition;
pub use regexp::RegExpCondition;
pub use required::{NotNullCondition, RequireTextCondition};
pub use string_length::StringLengthCondition;

use parallax_value::Value;

use crate::error::ConditionError;
use crate::types::ConditionType;

/// Validates an Integer-shaped bound at build time.
///
/// StringLength and CountMatches bounds count things; a float or text bound
/// there is a config mistake, not a runtime gap.
pub(crate) fn integer_bound(
    condition_type: &ConditionType,
    field: &'static str,
    bound: Option<&Value>,
) -> Result<Option<i64>, ConditionError> {
    match bound {
        None => Ok(None),
        Some(Value::Integer(bound)) => Ok(Some(*bound)),
        Some(other) => {
            tracing::error!(
                condition = %condition_type,
                field,
                kind = %other.kind(),
                "bound must be an integer"
            );
            Err(ConditionError::InvalidParameter {
                condition_type: condition_type.clone(),
                field,
                reason: format!("expected an integer bound, found {}", other.kind()),
            })
        }
    }
}
