use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use super::utils::{clog2, get_enum_encode_value, get_enum_width};

pub fn derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let name = &ast.ident;
    match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { ref named, .. }), ..
        }) => {
            let fields = named;

            let ty_widths = fields.iter().map(|f| {
                let ty = &f.ty;
                quote! { <#ty as ::elastic::Signal>::WIDTH }
            });

            // fields for `transl`.
            let into_fields = fields.iter().map(|f| {
                let name = &f.ident;
                quote! { .chain(::elastic::Signal::transl(self.#name)) }
            });

            // fields for `from_transl`.
            let from_fields = fields.iter().map(|f| {
                let name = &f.ident;
                let ty = &f.ty;
                quote! {
                    #name: {
                        let width = <#ty as ::elastic::Signal>::WIDTH;
                        let member = <#ty as ::elastic::Signal>::from_transl(&bits[offset..offset + width])?;
                        offset += width;
                        member
                    }
                }
            });

            let expanded = quote! {
                impl #impl_generics ::elastic::Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = 0 #(+ #ty_widths)*;

                    fn transl(self) -> ::std::vec::Vec<bool> {
                        ::std::iter::empty::<bool>()#(#into_fields)*.collect()
                    }

                    #[allow(unused_mut, unused_variables, unused_assignments)]
                    fn from_transl(bits: &[bool]) -> ::std::option::Option<Self> {
                        if bits.len() != <Self as ::elastic::Signal>::WIDTH {
                            return ::std::option::Option::None;
                        }
                        let mut offset = 0;
                        ::std::option::Option::Some(Self { #(#from_fields,)* })
                    }
                }
            };

            expanded.into()
        }
        syn::Data::Enum(syn::DataEnum { ref variants, .. }) => {
            let variant_count = variants.len();
            assert!(variant_count > 0, "{name}: Empty enums cannot be derived as `Signal`");
            let width = if let Some(width) = get_enum_width(&ast.attrs) {
                width.base10_parse::<usize>().unwrap_or_else(|_| panic!("{name}: Enum width should be usize"))
            } else if variant_count == 1 {
                1
            } else {
                clog2(variant_count)
            };
            assert!(width <= 64, "{name}: Enum width should be at most 64");

            let encodings = variants
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let variant_name = &f.ident;
                    assert!(
                        matches!(f.fields, syn::Fields::Unit),
                        "{name}::{variant_name}: Only Unit Variant is allowed to be derived as `Signal`"
                    );

                    let encode_value = if let Some(encode_value_lit) = get_enum_encode_value(&f.attrs) {
                        encode_value_lit
                            .base10_parse::<u64>()
                            .unwrap_or_else(|_| panic!("encoding value of {name}::{variant_name} should be u64"))
                    } else {
                        i as u64
                    };
                    assert!(
                        width == 64 || encode_value < (1 << width),
                        "{encode_value}(encoding of {name}::{variant_name}) exceeds maximum for {width} bits",
                    );

                    (variant_name, encode_value)
                })
                .collect::<Vec<_>>();

            let into_variants = encodings.iter().map(|(variant_name, encode_value)| {
                quote! { Self::#variant_name => #encode_value, }
            });

            let from_variants = encodings.iter().map(|(variant_name, encode_value)| {
                quote! { #encode_value => ::std::option::Option::Some(Self::#variant_name), }
            });

            let expanded = quote! {
                impl #impl_generics ::elastic::Signal for #name #ty_generics #where_clause {
                    const WIDTH: usize = #width;

                    fn transl(self) -> ::std::vec::Vec<bool> {
                        let value: u64 = match self {
                            #(#into_variants)*
                        };
                        (0..#width).map(|idx| ((value >> idx) & 1) != 0).collect()
                    }

                    fn from_transl(bits: &[bool]) -> ::std::option::Option<Self> {
                        if bits.len() != #width {
                            return ::std::option::Option::None;
                        }
                        let value = bits.iter().rev().fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit));
                        match value {
                            #(#from_variants)*
                            _ => ::std::option::Option::None,
                        }
                    }
                }
            };

            expanded.into()
        }
        _ => panic!("{name}: `Signal` can only be derived for structs with named fields and enums"),
    }
}
