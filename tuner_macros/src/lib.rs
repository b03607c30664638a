//! Procedural macros for `tuner`.
//!
//! [`SecretFields`](macro@SecretFields) derives `tuner::SecretFields` for a
//! struct with named fields. Fields marked `#[vault("key")]` are bound from
//! the secret stored under `key`; unmarked fields are left alone.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod expand;
mod parse;

/// Derive macro for `tuner::SecretFields`.
///
/// Supported field types are `String`, `bool`, the signed integers and the
/// floats. A tagged field of any other type compiles but fails at bind time
/// with an unsupported-kind error. Empty or duplicate tags, enums, tuple
/// structs and generic structs are rejected at compile time.
#[proc_macro_derive(SecretFields, attributes(vault))]
pub fn derive_secret_fields(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);
    parse::parse_input(&derive_input)
        .map_or_else(syn::Error::into_compile_error, |parsed| expand::expand(&parsed))
        .into()
}

#[cfg(test)]
mod tests;
