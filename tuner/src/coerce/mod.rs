//! Conversion of raw secret values into declared scalar field types.
//!
//! Coercion is type directed: the dynamic shape of the [`RawValue`] must
//! already belong to the family of the declared [`FieldKind`]. A textual
//! `"8080"` is never turned into an integer, and a boolean is never turned
//! into a string.

use serde::Deserialize;
use thiserror::Error;

use crate::value::{FieldKind, RawValue, Scalar};

/// How numeric values are checked against the width of the target field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericMode {
    /// Write the parsed number with a plain cast. Values that fit in 64 bits
    /// but not in a narrower field are truncated silently.
    #[default]
    Permissive,
    /// Reject numbers that do not fit in the field's bit width.
    Checked,
}

/// Reasons a raw value cannot be coerced into a field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoerceError {
    /// The raw value belongs to a different type family than the field.
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        /// Declared kind of the field.
        expected: FieldKind,
        /// Shape of the raw value that was supplied.
        found: &'static str,
    },

    /// The field type cannot be bound from secrets at all.
    #[error("fields of type `{type_name}` cannot be bound from secrets")]
    UnsupportedKind {
        /// Field type as written in the record.
        type_name: &'static str,
    },

    /// The numeric literal cannot be parsed as the field's number family.
    #[error("'{literal}' is not a valid {expected} literal")]
    InvalidNumber {
        /// Literal received from the secret store.
        literal: String,
        /// Declared kind of the field.
        expected: FieldKind,
    },

    /// The number does not fit in the field's width. Raised for every float
    /// literal beyond `f64`, and otherwise only in [`NumericMode::Checked`].
    #[error("{literal} does not fit in {expected}")]
    OutOfRange {
        /// Literal received from the secret store.
        literal: String,
        /// Declared kind of the field.
        expected: FieldKind,
    },
}

/// Coerce `raw` into a scalar of the declared `kind`.
///
/// # Examples
///
/// ```
/// use tuner::{FieldKind, NumericMode, RawValue, Scalar, coerce};
///
/// let port = coerce(FieldKind::Int { bits: 32 }, &RawValue::number(8080), NumericMode::Permissive)?;
/// assert_eq!(port, Scalar::Int(8080));
/// # Ok::<_, tuner::CoerceError>(())
/// ```
///
/// # Errors
///
/// Returns [`CoerceError::UnsupportedKind`] for kinds outside the scalar
/// families, [`CoerceError::TypeMismatch`] when the raw value has the wrong
/// shape, [`CoerceError::InvalidNumber`] for unparsable literals (including
/// integers beyond 64 bits for fields up to `i64`), and
/// [`CoerceError::OutOfRange`] when `mode` is [`NumericMode::Checked`] and the
/// number is too wide for the field.
pub fn coerce(kind: FieldKind, raw: &RawValue, mode: NumericMode) -> Result<Scalar, CoerceError> {
    match kind {
        FieldKind::Unsupported(type_name) => Err(CoerceError::UnsupportedKind { type_name }),
        FieldKind::String => match raw {
            RawValue::String(text) => Ok(Scalar::String(text.clone())),
            other => Err(mismatch(kind, other)),
        },
        FieldKind::Bool => match raw {
            RawValue::Bool(flag) => Ok(Scalar::Bool(*flag)),
            other => Err(mismatch(kind, other)),
        },
        FieldKind::Int { bits } => {
            let literal = number_literal(kind, raw)?;
            let value = parse_int(literal, bits).ok_or_else(|| invalid_number(kind, literal))?;
            if mode == NumericMode::Checked && !int_fits(value, bits) {
                return Err(out_of_range(kind, literal));
            }
            Ok(Scalar::Int(value))
        }
        FieldKind::Float { bits } => {
            let literal = number_literal(kind, raw)?;
            let value = literal
                .parse::<f64>()
                .map_err(|_| invalid_number(kind, literal))?;
            if !value.is_finite() && !names_non_finite(literal) {
                return Err(out_of_range(kind, literal));
            }
            if mode == NumericMode::Checked && bits < 64 && !f32_fits(value) {
                return Err(out_of_range(kind, literal));
            }
            Ok(Scalar::Float(value))
        }
    }
}

fn number_literal(kind: FieldKind, raw: &RawValue) -> Result<&str, CoerceError> {
    match raw {
        RawValue::Number(literal) => Ok(literal),
        other => Err(mismatch(kind, other)),
    }
}

/// Parses at 64 bits for every field up to `i64`, so wider literals are
/// rejected rather than wrapped.
fn parse_int(literal: &str, bits: u32) -> Option<i128> {
    if bits <= i64::BITS {
        literal.parse::<i64>().ok().map(i128::from)
    } else {
        literal.parse::<i128>().ok()
    }
}

/// True for the spelled-out `inf`, `infinity` and `nan` literals.
fn names_non_finite(literal: &str) -> bool {
    let unsigned = literal.trim_start_matches(['+', '-']);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|name| unsigned.eq_ignore_ascii_case(name))
}

const fn int_fits(value: i128, bits: u32) -> bool {
    if bits >= i128::BITS {
        return true;
    }
    let max = (1_i128 << bits.saturating_sub(1)) - 1;
    let min = -max - 1;
    value >= min && value <= max
}

fn f32_fits(value: f64) -> bool {
    !value.is_finite() || value.abs() <= f64::from(f32::MAX)
}

fn mismatch(expected: FieldKind, raw: &RawValue) -> CoerceError {
    CoerceError::TypeMismatch {
        expected,
        found: raw.type_name(),
    }
}

fn invalid_number(expected: FieldKind, literal: &str) -> CoerceError {
    CoerceError::InvalidNumber {
        literal: literal.to_owned(),
        expected,
    }
}

fn out_of_range(expected: FieldKind, literal: &str) -> CoerceError {
    CoerceError::OutOfRange {
        literal: literal.to_owned(),
        expected,
    }
}

/// Field types that can receive a coerced [`Scalar`].
///
/// Implemented for `String`, `bool`, the signed integers and the floats. The
/// `SecretFields` derive uses [`SecretScalar::KIND`] to describe each tagged
/// field and [`SecretScalar::from_scalar`] to write the value.
pub trait SecretScalar: Sized {
    /// Declared kind reported to the coercer.
    const KIND: FieldKind;

    /// Convert a scalar produced for [`Self::KIND`] into the field type.
    ///
    /// # Errors
    ///
    /// Returns [`CoerceError::TypeMismatch`] if `value` belongs to another
    /// family, which only happens when a hand-written descriptor pairs the
    /// wrong kind with a field.
    fn from_scalar(value: Scalar) -> Result<Self, CoerceError>;
}

fn wrong_scalar(expected: FieldKind, value: &Scalar) -> CoerceError {
    CoerceError::TypeMismatch {
        expected,
        found: value.kind_name(),
    }
}

impl SecretScalar for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
        match value {
            Scalar::String(text) => Ok(text),
            other => Err(wrong_scalar(Self::KIND, &other)),
        }
    }
}

impl SecretScalar for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
        match value {
            Scalar::Bool(flag) => Ok(flag),
            other => Err(wrong_scalar(Self::KIND, &other)),
        }
    }
}

macro_rules! narrow_int_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SecretScalar for $ty {
                const KIND: FieldKind = FieldKind::Int { bits: <$ty>::BITS };

                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "range is enforced by the coercer in checked mode only"
                )]
                fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
                    match value {
                        Scalar::Int(number) => Ok(number as Self),
                        other => Err(wrong_scalar(Self::KIND, &other)),
                    }
                }
            }
        )*
    };
}

narrow_int_scalar!(i8, i16, i32, i64, isize);

impl SecretScalar for i128 {
    const KIND: FieldKind = FieldKind::Int { bits: Self::BITS };

    fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
        match value {
            Scalar::Int(number) => Ok(number),
            other => Err(wrong_scalar(Self::KIND, &other)),
        }
    }
}

impl SecretScalar for f32 {
    const KIND: FieldKind = FieldKind::Float { bits: 32 };

    #[expect(
        clippy::cast_possible_truncation,
        reason = "range is enforced by the coercer in checked mode only"
    )]
    fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
        match value {
            Scalar::Float(number) => Ok(number as Self),
            other => Err(wrong_scalar(Self::KIND, &other)),
        }
    }
}

impl SecretScalar for f64 {
    const KIND: FieldKind = FieldKind::Float { bits: 64 };

    fn from_scalar(value: Scalar) -> Result<Self, CoerceError> {
        match value {
            Scalar::Float(number) => Ok(number),
            other => Err(wrong_scalar(Self::KIND, &other)),
        }
    }
}
