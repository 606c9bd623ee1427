//! # parallax-value
//!
//! The value model and the conversion/comparison services underneath the
//! Parallax condition engine.
//!
//! - [`Value`] / [`ValueKind`]: the small set of runtime shapes conditions
//!   evaluate. "No value at all" is `Option<Value>` = `None` at API
//!   boundaries, never a variant, and is always distinct from
//!   [`Value::Null`].
//! - [`LookupKey`] and the [`keys`] constants: string tags naming semantic
//!   types and comparison intents.
//! - [`convert`]: the converter service, an ordered first-match registry
//!   with single-step and chained conversion and a diagnostic trail.
//! - [`compare`]: the comparer service, producing equality/ordering verdicts
//!   with converter fallback for non-primitive operands.
//!
//! # Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use parallax_value::compare::{ComparerRegistry, ComparisonResult};
//! use parallax_value::convert::ConverterRegistry;
//! use parallax_value::Value;
//!
//! let converters = ConverterRegistry::with_defaults();
//! let comparers = ComparerRegistry::with_defaults();
//!
//! // Two instants on the same calendar day are equal by default: the
//! // pre-registered converter reduces both to their UTC day count.
//! let breakfast = Value::DateTime(Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap());
//! let dinner = Value::DateTime(Utc.with_ymd_and_hms(2024, 3, 9, 19, 30, 0).unwrap());
//! assert_eq!(
//!     comparers.compare(&breakfast, &dinner, &converters),
//!     ComparisonResult::Equal
//! );
//! ```

mod kind;
mod lookup;
mod serde_impl;
mod value;

pub mod compare;
pub mod convert;

pub use kind::ValueKind;
pub use lookup::{keys, LookupKey};
pub use value::{CustomValue, Value, ValueError};

/// Everything a host typically needs in scope.
pub mod prelude {
    pub use crate::compare::{ComparerRegistry, ComparisonResult, ValueComparer};
    pub use crate::convert::{ChainedConversion, ConverterRegistry, ValueConverter};
    pub use crate::lookup::{keys, LookupKey};
    pub use crate::{CustomValue, Value, ValueKind};
}
