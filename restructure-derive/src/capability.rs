//! Implementation of the Capability derive macro

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attrs::parse_container_attrs;

/// Main implementation of the Capability derive
pub fn derive_capability_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let container = parse_container_attrs(&input.attrs)?;

    let data = match &input.data {
        Data::Enum(data) => data,
        Data::Struct(data) => {
            return Err(syn::Error::new_spanned(
                data.struct_token,
                "Capability can only be derived for enums",
            ))
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Capability can only be derived for enums",
            ))
        }
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "a capability needs at least one variant",
        ));
    }

    let mut constructors = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                let variant_name = &variant.ident;
                constructors.push(quote! {
                    ::restructure::Variant::new(#name::#variant_name)
                });
            }
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "capability variants must wrap exactly one schema type, e.g. `Phone(Phone)`",
                ))
            }
        }
    }

    let name_fn = container.name.map(|lit| {
        quote! {
            fn name() -> &'static str {
                #lit
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::restructure::Capability for #name #ty_generics #where_clause {
            #name_fn
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Variants in declaration order, for registration
            pub fn variants() -> ::std::vec::Vec<::restructure::Variant<Self>> {
                ::std::vec![#(#constructors),*]
            }
        }
    })
}
