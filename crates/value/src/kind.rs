//! Field-less discriminants for [`Value`](crate::Value).

use std::fmt;

/// The runtime kind of a value, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    Text,
    /// An instant in time.
    DateTime,
    /// A host-defined type.
    Custom,
}

impl ValueKind {
    /// Human-readable name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::DateTime => "datetime",
            Self::Custom => "custom",
        }
    }

    /// Whether values of this kind compare natively, ending a conversion
    /// chain. Instants are deliberately not primitive: they normalize
    /// through the converter service (day count by default) before any
    /// comparison.
    #[must_use]
    pub const fn is_comparison_primitive(self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Integer | Self::Float | Self::Text
        )
    }

    /// Whether this kind carries a number.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
