use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use std::collections::BTreeMap;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Attribute, Data, DeriveInput, Field, Fields, parse_macro_input};

/// Derives `tripform::form::FormModel` for a struct with named fields.
///
/// For `struct LoginForm { email: String }` this generates a zero-sized
/// `LoginFormEmailLens` implementing `FieldLens<LoginForm>` with
/// `Value = String`, and a `LoginFormFields` accessor returned by
/// `LoginForm::fields()`. Fields marked `#[form(skip)]` get no lens.
#[proc_macro_derive(FormModel, attributes(form))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.ident,
            "FormModel derive supports only non-generic structs",
        ));
    }

    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");
    let named_fields = named_fields(&model_ident, input.data)?;

    let tripform = tripform_path();
    let mut lens_defs = Vec::new();
    let mut fields_methods = Vec::new();
    let mut field_names = Vec::new();
    let mut lens_owners = BTreeMap::new();

    for field in named_fields {
        if is_skipped(&field.attrs)? {
            continue;
        }
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_ty = field.ty;
        let field_name = field_ident.to_string();
        let lens_ident = format_ident!("{model_ident}{}Lens", to_pascal_case(&field_name));
        if let Some(owner) = lens_owners.insert(lens_ident.to_string(), field_name.clone()) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!(
                    "field `{field_name}` produces lens `{lens_ident}`, \
                     already generated for `{owner}`"
                ),
            ));
        }

        lens_defs.push(quote! {
            #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
            pub struct #lens_ident;

            impl #tripform::form::FieldLens<#model_ident> for #lens_ident {
                type Value = #field_ty;

                fn key(self) -> #tripform::form::FieldKey {
                    #tripform::form::FieldKey::new(#field_name)
                }

                fn get<'a>(self, model: &'a #model_ident) -> &'a Self::Value {
                    &model.#field_ident
                }

                fn set(self, model: &mut #model_ident, value: Self::Value) {
                    model.#field_ident = value;
                }
            }
        });

        fields_methods.push(quote! {
            pub const fn #field_ident(&self) -> #lens_ident {
                #lens_ident
            }
        });
        field_names.push(field_name);
    }

    let field_keys = field_names
        .iter()
        .map(|name| quote!(#tripform::form::FieldKey::new(#name)))
        .collect::<Vec<_>>();

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            pub const KEYS: &'static [#tripform::form::FieldKey] = &[#(#field_keys),*];

            #(#fields_methods)*
        }

        impl #tripform::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }
        }

        #(#lens_defs)*
    })
}

fn named_fields(model_ident: &Ident, data: Data) -> syn::Result<Punctuated<Field, Comma>> {
    match data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => Ok(fields.named),
            _ => Err(syn::Error::new_spanned(
                model_ident,
                "FormModel derive requires a struct with named fields",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            model_ident,
            "FormModel derive is only supported on structs",
        )),
    }
}

fn is_skipped(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skipped = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skipped = true;
                Ok(())
            } else {
                Err(meta.error("unsupported form attribute, expected `skip`"))
            }
        })?;
    }
    Ok(skipped)
}

fn tripform_path() -> TokenStream2 {
    match crate_name("tripform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::tripform),
    }
}

fn to_pascal_case(input: &str) -> String {
    let mut out = String::new();
    for segment in input.split('_') {
        if segment.is_empty() {
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
