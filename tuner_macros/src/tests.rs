//! Unit tests for input validation and token generation.

use crate::expand::expand;
use crate::parse::{FieldShape, classify, parse_input, parse_tag};
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{Attribute, DeriveInput, Type, parse_quote};

fn parse_err(input: &DeriveInput) -> Result<String> {
    parse_input(input)
        .err()
        .map(|err| err.to_string())
        .ok_or_else(|| anyhow!("expected the input to be rejected"))
}

#[rstest]
fn collects_tags_and_shapes_in_declaration_order() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Service {
            #[vault("name")]
            name: String,
            #[vault("port")]
            port: i32,
            region: String,
            #[vault("hosts")]
            hosts: Vec<String>,
        }
    };
    let parsed = parse_input(&input)?;
    let tags: Vec<_> = parsed.fields.iter().map(|f| f.tag.as_deref()).collect();
    ensure!(
        tags == [Some("name"), Some("port"), None, Some("hosts")],
        "unexpected tags {tags:?}"
    );
    let last = parsed
        .fields
        .last()
        .ok_or_else(|| anyhow!("missing fields"))?;
    ensure!(
        last.shape == FieldShape::Unsupported("Vec<String>".to_owned()),
        "unexpected shape {:?}",
        last.shape
    );
    Ok(())
}

#[rstest]
#[case(parse_quote!(String))]
#[case(parse_quote!(std::string::String))]
#[case(parse_quote!(bool))]
#[case(parse_quote!(i8))]
#[case(parse_quote!(i128))]
#[case(parse_quote!(isize))]
#[case(parse_quote!(f32))]
#[case(parse_quote!(f64))]
fn scalar_types_are_recognised(#[case] ty: Type) {
    assert_eq!(classify(&ty), FieldShape::Scalar);
}

#[rstest]
#[case(parse_quote!(u16), "u16")]
#[case(parse_quote!(Option<i32>), "Option<i32>")]
#[case(parse_quote!(&'static str), "&'static str")]
#[case(parse_quote!(std::collections::BTreeMap<String, i64>), "std::collections::BTreeMap<String, i64>")]
fn other_types_are_unsupported(#[case] ty: Type, #[case] rendered: &str) {
    assert_eq!(classify(&ty), FieldShape::Unsupported(rendered.to_owned()));
}

#[rstest]
fn missing_attribute_means_untagged() -> Result<()> {
    let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(default)])];
    ensure!(parse_tag(&attrs)?.is_none(), "unrelated attributes must be ignored");
    Ok(())
}

#[rstest]
#[case::empty_tag(
    parse_quote! { struct S { #[vault("")] name: String } },
    "vault tag must not be empty"
)]
#[case::duplicate_tag(
    parse_quote! { struct S { #[vault("k")] a: String, #[vault("k")] b: String } },
    "duplicate vault tag `k`"
)]
#[case::repeated_attribute(
    parse_quote! { struct S { #[vault("a")] #[vault("b")] name: String } },
    "duplicate vault attribute"
)]
#[case::tuple_struct(parse_quote! { struct S(String); }, "SecretFields requires named fields")]
#[case::unit_struct(parse_quote! { struct S; }, "SecretFields requires named fields")]
#[case::enumeration(
    parse_quote! { enum E { A } },
    "SecretFields can only be derived for structs"
)]
#[case::generic(
    parse_quote! { struct S<T> { #[vault("v")] value: T } },
    "SecretFields cannot be derived for generic structs"
)]
fn invalid_inputs_are_rejected(#[case] input: DeriveInput, #[case] message: &str) -> Result<()> {
    let err = parse_err(&input)?;
    ensure!(err == message, "unexpected error `{err}`");
    Ok(())
}

#[rstest]
fn non_literal_tags_are_rejected() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct S { #[vault(name)] name: String }
    };
    parse_err(&input)?;
    Ok(())
}

#[rstest]
fn expansion_emits_a_setter_and_descriptor_per_field() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Service {
            #[vault("port")]
            port: i32,
            r#type: String,
        }
    };
    let tokens = expand(&parse_input(&input)?).to_string();
    for fragment in [
        "impl :: tuner :: SecretFields for Service",
        "fn __tuner_set_port",
        "fn __tuner_set_type",
        "name : \"type\"",
        "tag : :: core :: option :: Option :: Some (\"port\")",
        "tag : :: core :: option :: Option :: None",
        "< i32 as :: tuner :: SecretScalar > :: KIND",
    ] {
        ensure!(tokens.contains(fragment), "missing `{fragment}` in {tokens}");
    }
    Ok(())
}

#[rstest]
fn unsupported_fields_reject_values_at_bind_time() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Service {
            #[vault("hosts")]
            hosts: Vec<String>,
        }
    };
    let tokens = expand(&parse_input(&input)?).to_string();
    ensure!(
        tokens.contains(":: tuner :: FieldKind :: Unsupported (\"Vec<String>\")"),
        "missing unsupported kind in {tokens}"
    );
    ensure!(
        tokens.contains("UnsupportedKind { type_name : \"Vec<String>\" , }"),
        "missing unsupported setter in {tokens}"
    );
    Ok(())
}
