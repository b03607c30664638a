//! Tag-driven binding of secret values onto record fields.
//!
//! A record opts in by implementing [`SecretFields`], normally through
//! `#[derive(SecretFields)]`. The trait exposes a static, ordered table of
//! [`FieldDescriptor`]s; [`bind`] walks that table, looks each tagged field up
//! in the raw mapping and writes the coerced value.
//!
//! Binding is atomic per field but not across fields. When a field fails to
//! coerce, fields earlier in declaration order keep the values already written.

use std::fmt;

use tracing::trace;

use crate::coerce::{CoerceError, NumericMode, coerce};
use crate::value::{FieldKind, RawValue, Scalar, SecretMap};
use crate::{TunerError, TunerResult};

/// Writes a coerced scalar into one field of `T`.
pub type ApplyFn<T> = fn(&mut T, Scalar) -> Result<(), CoerceError>;

/// Static description of one field of a record.
pub struct FieldDescriptor<T> {
    /// Field name as declared.
    pub name: &'static str,
    /// Secret key bound to the field; `None` excludes the field from binding.
    pub tag: Option<&'static str>,
    /// Declared kind of the field.
    pub kind: FieldKind,
    /// Setter invoked once the raw value has been coerced.
    pub apply: ApplyFn<T>,
}

impl<T> FieldDescriptor<T> {
    /// Coerce `raw` into this field's kind and write it into `target`.
    ///
    /// The field is left untouched when coercion fails.
    ///
    /// # Errors
    ///
    /// Returns the [`CoerceError`] raised by the coercer or the setter.
    pub fn bind(&self, target: &mut T, raw: &RawValue, mode: NumericMode) -> Result<(), CoerceError> {
        let scalar = coerce(self.kind, raw, mode)?;
        (self.apply)(target, scalar)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Records whose fields can be populated from a secret store.
///
/// Derive it with `#[derive(SecretFields)]` and mark fields with
/// `#[vault("key")]`, or implement it by hand when a generated table is not
/// wanted.
///
/// # Examples
///
/// ```
/// use tuner::{RawValue, SecretFields, SecretMap, bind};
///
/// #[derive(Default, SecretFields)]
/// struct Service {
///     #[vault("name")]
///     name: String,
///     #[vault("port")]
///     port: i32,
///     region: String,
/// }
///
/// let secrets = SecretMap::from([
///     ("name".to_owned(), RawValue::from("svc-a")),
///     ("port".to_owned(), RawValue::number(8080)),
/// ]);
/// let mut service = Service::default();
/// bind(&mut service, &secrets)?;
/// assert_eq!(service.name, "svc-a");
/// assert_eq!(service.port, 8080);
/// # Ok::<_, tuner::TunerError>(())
/// ```
pub trait SecretFields: Sized + 'static {
    /// Descriptors for every field of the record, in declaration order.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

/// Bind `raw` onto `target` using [`NumericMode::Permissive`].
///
/// # Errors
///
/// Returns [`TunerError::Bind`] naming the tag of the first field whose value
/// cannot be coerced.
pub fn bind<T: SecretFields>(target: &mut T, raw: &SecretMap) -> TunerResult<()> {
    bind_with(target, raw, NumericMode::default())
}

/// Bind `raw` onto `target`, checking numbers according to `mode`.
///
/// Untagged fields and tags missing from `raw` are skipped. An empty mapping
/// leaves the record untouched.
///
/// # Errors
///
/// Returns [`TunerError::Bind`] naming the tag of the first field whose value
/// cannot be coerced. Fields bound before it keep their new values.
pub fn bind_with<T: SecretFields>(
    target: &mut T,
    raw: &SecretMap,
    mode: NumericMode,
) -> TunerResult<()> {
    if raw.is_empty() {
        return Ok(());
    }
    for field in T::fields() {
        let Some(tag) = field.tag else {
            continue;
        };
        let Some(value) = raw.get(tag) else {
            continue;
        };
        field
            .bind(target, value, mode)
            .map_err(|source| TunerError::Bind { tag, source })?;
        trace!(tag, field = field.name, "bound secret value");
    }
    Ok(())
}
