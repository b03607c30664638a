//! Loosely typed values read from a secret store and the scalar kinds they
//! can be coerced into.
//!
//! [`RawValue`] is the closed set of shapes a secret-store response can take
//! once decoded. Numbers keep their literal text so that the coercer decides
//! how to interpret them against the declared field type.

use std::collections::BTreeMap;
use std::fmt;

/// Key/value pairs returned for one secret path.
pub type SecretMap = BTreeMap<String, RawValue>;

/// A dynamically typed value supplied by a secret store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue {
    /// A textual value.
    String(String),
    /// A boolean value.
    Bool(bool),
    /// A numeric literal kept in its textual form, such as `8080` or `0.25`.
    Number(String),
    /// An explicit null.
    Null,
    /// A sequence of values.
    List(Vec<RawValue>),
    /// A nested mapping.
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Build a numeric value from anything that renders as a number literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuner::RawValue;
    ///
    /// assert_eq!(RawValue::number(8080), RawValue::Number("8080".to_owned()));
    /// ```
    #[must_use]
    pub fn number(literal: impl fmt::Display) -> Self {
        Self::Number(literal.to_string())
    }

    /// Short name of the variant, used in mismatch diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Null => "null",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.to_string()),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Declared type family of a record field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// `String`.
    String,
    /// `bool`.
    Bool,
    /// A signed integer of the given bit width.
    Int {
        /// Width of the field in bits.
        bits: u32,
    },
    /// A floating-point number of the given bit width.
    Float {
        /// Width of the field in bits.
        bits: u32,
    },
    /// Any other type; carries the type as written in the record.
    Unsupported(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Bool => f.write_str("boolean"),
            Self::Int { bits } => write!(f, "i{bits}"),
            Self::Float { bits } => write!(f, "f{bits}"),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// A value coerced into one of the supported scalar families.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Integer, widened to 128 bits until it is written into the field.
    Int(i128),
    /// Floating point, as double precision until it is written into the field.
    Float(f64),
}

impl Scalar {
    pub(crate) const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
        }
    }
}
