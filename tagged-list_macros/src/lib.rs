// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

mod helpers;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(ListTag)]
pub fn derive_list_tag(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_tag_enum_trait(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

#[proc_macro_derive(ListElement)]
pub fn derive_list_element(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    helpers::derive_element_struct_trait(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
