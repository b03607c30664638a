//! Environment provider that keeps string fields verbatim.
//!
//! Figment's [`Env`] parses every value, so `NAME=12345` arrives as an
//! integer and cannot fill a `String` field. [`FieldEnv`] wraps [`Env`] and
//! consults the serialised record: variables naming a field that currently
//! holds a string are emitted as raw text, everything else is parsed as
//! [`Env`] would.

use figment::providers::Env;
use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider};

/// [`Env`] wrapper aware of the target record's string fields.
pub(super) struct FieldEnv {
    inner: Env,
    fields: Dict,
}

impl FieldEnv {
    /// Wrap `inner`, using `current` (the serialised record) to find fields.
    pub(super) fn new(inner: Env, current: Value) -> Self {
        Self {
            inner,
            fields: current.into_dict().unwrap_or_default(),
        }
    }

    /// Field name matching `key` case-insensitively, or the lowercased key.
    fn field_name(&self, key: &str) -> String {
        self.fields
            .keys()
            .find(|name| name.eq_ignore_ascii_case(key))
            .cloned()
            .unwrap_or_else(|| key.to_ascii_lowercase())
    }

    fn value_for(&self, name: &str, raw: String) -> Value {
        match self.fields.get(name) {
            Some(Value::String(..)) => Value::from(raw),
            _ => raw.parse().unwrap_or_else(|_| Value::from(raw.clone())),
        }
    }
}

impl Provider for FieldEnv {
    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        for (key, raw) in self.inner.iter() {
            let name = self.field_name(key.as_str());
            let value = self.value_for(&name, raw);
            dict.insert(name, value);
        }
        Ok(self.inner.profile.collect(dict))
    }
}
