//! Input parsing for the `SecretFields` derive macro.
//!
//! The struct is validated in one pass so expansion can fail fast: only
//! non-generic structs with named fields are accepted, and every
//! `#[vault("key")]` tag must be non-empty and unique within the struct.

use std::collections::HashSet;

use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr, PathArguments, Type};

const TAG_ATTR: &str = "vault";

/// Field types bound directly from a coerced scalar.
const SCALAR_TYPES: &[&str] = &[
    "String", "bool", "i8", "i16", "i32", "i64", "i128", "isize", "f32", "f64",
];

/// A struct accepted by the derive.
pub(crate) struct SecretInput {
    pub ident: Ident,
    pub fields: Vec<SecretField>,
}

/// One named field and its binding metadata.
pub(crate) struct SecretField {
    pub ident: Ident,
    pub ty: Type,
    pub tag: Option<String>,
    pub shape: FieldShape,
}

/// How the generated setter treats a field.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FieldShape {
    /// The type implements `SecretScalar`.
    Scalar,
    /// The type cannot be bound; the rendered type name is kept for errors.
    Unsupported(String),
}

impl SecretField {
    /// Field name without any raw identifier prefix.
    pub(crate) fn name(&self) -> String {
        self.ident.unraw().to_string()
    }
}

/// Gathers the struct identifier and its fields, validating binding tags.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<SecretInput> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "SecretFields cannot be derived for generic structs",
        ));
    }
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "SecretFields requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "SecretFields can only be derived for structs",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let parsed = parse_field(field)?;
        if let Some(tag) = &parsed.tag
            && !seen.insert(tag.clone())
        {
            return Err(syn::Error::new_spanned(
                &field.ident,
                format!("duplicate vault tag `{tag}`"),
            ));
        }
        fields.push(parsed);
    }
    Ok(SecretInput {
        ident: input.ident.clone(),
        fields,
    })
}

fn parse_field(field: &Field) -> syn::Result<SecretField> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "SecretFields requires named fields"));
    };
    Ok(SecretField {
        ident,
        ty: field.ty.clone(),
        tag: parse_tag(&field.attrs)?,
        shape: classify(&field.ty),
    })
}

/// Reads the `#[vault("key")]` attribute, if present.
pub(crate) fn parse_tag(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident(TAG_ATTR)) {
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate vault attribute"));
        }
        let lit: LitStr = attr.parse_args()?;
        let value = lit.value();
        if value.is_empty() {
            return Err(syn::Error::new_spanned(lit, "vault tag must not be empty"));
        }
        tag = Some(value);
    }
    Ok(tag)
}

/// Classifies `ty` by its final path segment.
///
/// The check is syntactic: `String`, `std::string::String` and the signed
/// integer and float primitives are scalars. Everything else, including
/// unsigned integers, wrappers and references, is unsupported.
pub(crate) fn classify(ty: &Type) -> FieldShape {
    let scalar = match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|last| {
                matches!(last.arguments, PathArguments::None)
                    && SCALAR_TYPES.iter().any(|name| last.ident == *name)
            }),
        _ => false,
    };
    if scalar {
        FieldShape::Scalar
    } else {
        FieldShape::Unsupported(type_name(ty))
    }
}

/// Renders `ty` the way it would be written in source.
fn type_name(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" < ", "<")
        .replace(" >", ">")
        .replace(" :: ", "::")
        .replace(" ,", ",")
        .replace("& ", "&")
}
