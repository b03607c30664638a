//! Code generation for the `SecretFields` derive macro.
//!
//! Each field gets a private setter function and a `FieldDescriptor` entry in
//! a `const` table, so binding never allocates or reflects at run time.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use crate::parse::{FieldShape, SecretField, SecretInput};

/// Emits the `SecretFields` implementation for `input`.
pub(crate) fn expand(input: &SecretInput) -> TokenStream {
    let ident = &input.ident;
    let setters = input.fields.iter().map(|field| setter(ident, field));
    let descriptors = input.fields.iter().map(|field| descriptor(ident, field));

    quote! {
        #[doc(hidden)]
        const _: () = {
            #( #setters )*

            #[automatically_derived]
            impl ::tuner::SecretFields for #ident {
                fn fields() -> &'static [::tuner::FieldDescriptor<Self>] {
                    const FIELDS: &[::tuner::FieldDescriptor<#ident>] = &[
                        #( #descriptors, )*
                    ];
                    FIELDS
                }
            }
        };
    }
}

fn setter_ident(field: &SecretField) -> Ident {
    format_ident!("__tuner_set_{}", field.ident)
}

fn setter(target: &Ident, field: &SecretField) -> TokenStream {
    let name = setter_ident(field);
    match &field.shape {
        FieldShape::Scalar => {
            let member = &field.ident;
            let ty = &field.ty;
            quote! {
                fn #name(
                    target: &mut #target,
                    value: ::tuner::Scalar,
                ) -> ::core::result::Result<(), ::tuner::CoerceError> {
                    target.#member = <#ty as ::tuner::SecretScalar>::from_scalar(value)?;
                    ::core::result::Result::Ok(())
                }
            }
        }
        FieldShape::Unsupported(type_name) => quote! {
            fn #name(
                _: &mut #target,
                _: ::tuner::Scalar,
            ) -> ::core::result::Result<(), ::tuner::CoerceError> {
                ::core::result::Result::Err(::tuner::CoerceError::UnsupportedKind {
                    type_name: #type_name,
                })
            }
        },
    }
}

fn descriptor(target: &Ident, field: &SecretField) -> TokenStream {
    let name = field.name();
    let apply = setter_ident(field);
    let tag = field.tag.as_ref().map_or_else(
        || quote! { ::core::option::Option::None },
        |tag| quote! { ::core::option::Option::Some(#tag) },
    );
    let kind = match &field.shape {
        FieldShape::Scalar => {
            let ty = &field.ty;
            quote! { <#ty as ::tuner::SecretScalar>::KIND }
        }
        FieldShape::Unsupported(type_name) => {
            quote! { ::tuner::FieldKind::Unsupported(#type_name) }
        }
    };
    quote! {
        ::tuner::FieldDescriptor::<#target> {
            name: #name,
            tag: #tag,
            kind: #kind,
            apply: #apply,
        }
    }
}
