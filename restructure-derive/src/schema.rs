//! Implementation of the Schema derive macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type};

use crate::attrs::{parse_container_attrs, parse_field_attrs, FieldRole};

/// Main implementation of the Schema derive
pub fn derive_schema_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let container = parse_container_attrs(&input.attrs)?;
    let schema_name = container
        .name
        .unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Schema can only be derived for structs with named fields",
                ))
            }
        },
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Schema cannot be derived for enums; derive Capability instead",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Schema cannot be derived for unions",
            ))
        }
    };

    let calls = fields
        .iter()
        .map(generate_field_call)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::restructure::Schema for #name #ty_generics #where_clause {
            fn descriptor() -> ::restructure::Descriptor {
                ::restructure::SchemaBuilder::<Self>::new(#schema_name)
                    #(#calls)*
                    .build()
            }
        }
    })
}

/// Generate the builder call for one field, or nothing for fields that are
/// not part of the pattern
fn generate_field_call(field: &syn::Field) -> syn::Result<TokenStream> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let attrs = parse_field_attrs(&field.attrs)?;
    let hidden = ident.to_string().starts_with('_');

    let role = match attrs.role {
        Some(role) => role,
        None if is_pos(&field.ty) => FieldRole::Pos,
        None => return Ok(TokenStream::new()),
    };

    let capture = attrs
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    if hidden {
        return match role {
            FieldRole::Scalar(fragment) => Ok(quote! { .separator(#fragment) }),
            FieldRole::Pos => Ok(TokenStream::new()),
            _ => Err(syn::Error::new_spanned(
                ident,
                "only fragments can be hidden; rename the field without the leading `_`",
            )),
        };
    }

    let call = match role {
        FieldRole::Scalar(fragment) => {
            if fragment.value().is_empty() {
                return Ok(TokenStream::new());
            }
            quote! { .scalar(#capture, #fragment, |v| &mut v.#ident) }
        }
        FieldRole::Pos => quote! { .pos(#capture, |v| &mut v.#ident) },
        FieldRole::Nested(marker) => match holder_kind(&field.ty) {
            Holder::Direct => quote! { .nested(#capture, #marker, |v| &mut v.#ident) },
            Holder::Option => quote! { .optional(#capture, #marker, |v| &mut v.#ident) },
            Holder::OptionBox => quote! { .boxed(#capture, #marker, |v| &mut v.#ident) },
        },
        FieldRole::Union(marker) => quote! { .union(#capture, #marker, |v| &mut v.#ident) },
    };

    Ok(call)
}

/// How a nested field holds its composite
enum Holder {
    Direct,
    Option,
    OptionBox,
}

fn holder_kind(ty: &Type) -> Holder {
    match last_segment(ty) {
        Some((ident, Some(inner))) if ident == "Option" => match last_segment(inner) {
            Some((ident, Some(_))) if ident == "Box" => Holder::OptionBox,
            _ => Holder::Option,
        },
        _ => Holder::Direct,
    }
}

fn is_pos(ty: &Type) -> bool {
    matches!(last_segment(ty), Some((ident, None)) if ident == "Pos")
}

/// Last path segment of a type with its first generic type argument
fn last_segment(ty: &Type) -> Option<(&syn::Ident, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let inner = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    };
    Some((&segment.ident, inner))
}
