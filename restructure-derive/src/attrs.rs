//! Parsing of `#[restructure(...)]` attributes
//!
//! Uses syn 2.x API for attribute parsing

use syn::{parse::Parse, parse::ParseStream, LitStr, Token};

mod kw {
    syn::custom_keyword!(name);
    syn::custom_keyword!(nested);
    syn::custom_keyword!(optional);
    syn::custom_keyword!(union);
    syn::custom_keyword!(pos);
}

/// What a field attribute declares the field to be
#[derive(Debug, Clone)]
pub enum FieldRole {
    /// A scalar captured by the fragment
    Scalar(LitStr),
    /// A nested schema with its cardinality marker
    Nested(LitStr),
    /// A polymorphic field with its cardinality marker
    Union(LitStr),
    /// A zero-width position marker
    Pos,
}

/// Attributes accepted on a field
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub role: Option<FieldRole>,
    pub name: Option<LitStr>,
}

/// Attributes accepted on a struct or enum
#[derive(Debug, Default)]
pub struct ContainerAttrs {
    pub name: Option<LitStr>,
}

/// An optional `= "marker"` suffix; absent means required
fn parse_marker(input: ParseStream, span: proc_macro2::Span) -> syn::Result<LitStr> {
    if input.peek(Token![=]) {
        input.parse::<Token![=]>()?;
        input.parse()
    } else {
        Ok(LitStr::new("", span))
    }
}

impl FieldAttrs {
    fn set_role(&mut self, role: FieldRole, span: proc_macro2::Span) -> syn::Result<()> {
        if self.role.is_some() {
            return Err(syn::Error::new(
                span,
                "a field takes one of a fragment, `nested`, `optional`, `union` or `pos`",
            ));
        }
        self.role = Some(role);
        Ok(())
    }
}

impl Parse for FieldAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = FieldAttrs::default();

        while !input.is_empty() {
            let lookahead = input.lookahead1();
            if lookahead.peek(LitStr) {
                let lit: LitStr = input.parse()?;
                let span = lit.span();
                // A lone "?" marks an optional nested schema
                let role = if lit.value() == "?" {
                    FieldRole::Nested(lit)
                } else {
                    FieldRole::Scalar(lit)
                };
                attrs.set_role(role, span)?;
            } else if lookahead.peek(kw::nested) {
                let span = input.parse::<kw::nested>()?.span;
                let marker = parse_marker(input, span)?;
                attrs.set_role(FieldRole::Nested(marker), span)?;
            } else if lookahead.peek(kw::optional) {
                let span = input.parse::<kw::optional>()?.span;
                attrs.set_role(FieldRole::Nested(LitStr::new("?", span)), span)?;
            } else if lookahead.peek(kw::union) {
                let span = input.parse::<kw::union>()?.span;
                let marker = parse_marker(input, span)?;
                attrs.set_role(FieldRole::Union(marker), span)?;
            } else if lookahead.peek(kw::pos) {
                let span = input.parse::<kw::pos>()?.span;
                attrs.set_role(FieldRole::Pos, span)?;
            } else if lookahead.peek(kw::name) {
                input.parse::<kw::name>()?;
                input.parse::<Token![=]>()?;
                attrs.name = Some(input.parse()?);
            } else {
                return Err(lookahead.error());
            }

            // Handle optional comma
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(attrs)
    }
}

impl Parse for ContainerAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = ContainerAttrs::default();

        while !input.is_empty() {
            let lookahead = input.lookahead1();
            if lookahead.peek(kw::name) {
                input.parse::<kw::name>()?;
                input.parse::<Token![=]>()?;
                attrs.name = Some(input.parse()?);
            } else {
                return Err(lookahead.error());
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(attrs)
    }
}

/// Parse and merge every `#[restructure]` attribute on a field
pub fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("restructure") {
            let parsed: FieldAttrs = attr.parse_args()?;
            if let Some(role) = parsed.role {
                result.set_role(role, proc_macro2::Span::call_site())?;
            }
            if let Some(name) = parsed.name {
                result.name = Some(name);
            }
        }
    }

    Ok(result)
}

/// Parse and merge every `#[restructure]` attribute on a container
pub fn parse_container_attrs(attrs: &[syn::Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("restructure") {
            let parsed: ContainerAttrs = attr.parse_args()?;
            if let Some(name) = parsed.name {
                result.name = Some(name);
            }
        }
    }

    Ok(result)
}
