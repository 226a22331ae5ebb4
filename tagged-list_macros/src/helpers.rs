// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericArgument, Ident, PathArguments, Result, Type,
};

/// Helper function to derive the trait that designates an empty enum as a list tag.
pub(crate) fn derive_tag_enum_trait(input: DeriveInput) -> Result<TokenStream> {
    if let Data::Enum(e) = &input.data {
        if e.variants.is_empty() && input.generics.params.is_empty() {
            let ident = &input.ident;

            return Ok(quote! {
                impl ::tagged_list::ListTag for #ident {}
            });
        }
    }

    Err(Error::new_spanned(
        input,
        "ListTag can only be derived for an empty enum",
    ))
}

/// Helper function to derive ListElement.
pub(crate) fn derive_element_struct_trait(input: DeriveInput) -> Result<TokenStream> {
    let s = match &input.data {
        Data::Struct(s) => s,
        _ => {
            return Err(Error::new_spanned(
                input,
                "ListElement can only be derived for structs",
            ))
        }
    };

    let f = match &s.fields {
        Fields::Named(f) => f,
        _ => {
            return Err(Error::new_spanned(
                input,
                "ListElement can only be derived for structs with named fields",
            ))
        }
    };

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "ListElement cannot be derived for generic structs",
        ));
    }

    let ident = &input.ident;

    let tokens = f.named.iter().filter_map(|field| {
        parse_element_field(field).map(|info| {
            let field_ident = info.ident;
            let tag_ty = info.tag_ty;

            quote! {
                unsafe impl ::tagged_list::ListElement<#tag_ty> for #ident {
                    fn offset() -> usize {
                        ::tagged_list::__private::offset_of!(#ident, #field_ident)
                    }
                }
            }
        })
    });
    let output = quote! {
        #(#tokens)*
    };

    if output.is_empty() {
        return Err(Error::new_spanned(input, "Found no ListEntry fields"));
    }

    Ok(output)
}

pub(crate) struct ElementFieldInfo<'a> {
    /// The "entry" in `entry: tagged_list::list::ListEntry<Self, mytags::MyList>`
    pub(crate) ident: &'a Ident,
    /// The "mytags::MyList" in `entry: tagged_list::list::ListEntry<Self, mytags::MyList>`,
    /// or the default tag for `entry: ListEntry<Self>`
    pub(crate) tag_ty: TokenStream,
}

/// Checks if the given field is a list entry field of an element structure and returns some
/// information about it.
///
/// `field` can be the syntax tree of e.g.
/// * `entry: ListEntry<Self>`
/// * `entry: ListEntry<Self, MyList>`
/// * `entry: tagged_list::list::ListEntry<Self, mytags::MyList>`
pub(crate) fn parse_element_field(field: &Field) -> Option<ElementFieldInfo<'_>> {
    let ident = field.ident.as_ref()?;

    // Get the last segment of the type path and check it against the type name.
    // This isn't 100% accurate, we may catch similarly named types that are not ours.
    // But a user who derives `ListElement` for a structure shouldn't mix it with foreign `ListEntry` types anyway...
    let ty_path = match &field.ty {
        Type::Path(ty_path) => ty_path,
        _ => return None,
    };

    let segment = ty_path.path.segments.last()?;
    if segment.ident != "ListEntry" {
        return None;
    }

    // Make our check more accurate by also checking that the `ListEntry` type of this field has
    // one or two type parameters.
    let ab_args = match &segment.arguments {
        PathArguments::AngleBracketed(ab_args) => ab_args,
        _ => return None,
    };

    let tag_ty = match ab_args.args.len() {
        1 => quote! { ::tagged_list::DefaultTag },
        2 => match ab_args.args.last()? {
            GenericArgument::Type(ty @ Type::Path(_)) => quote! { #ty },
            _ => return None,
        },
        _ => return None,
    };

    Some(ElementFieldInfo { ident, tag_ty })
}
