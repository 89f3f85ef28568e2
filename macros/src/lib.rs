use proc_macro::TokenStream;
use quote::{format_ident, quote, ToTokens};
use syn::{
    parse_macro_input, parse_quote, punctuated::Punctuated, token::Comma, Attribute, Data,
    DeriveInput, Fields, GenericParam, Ident, LitStr, MetaNameValue,
};

#[proc_macro_derive(ToValue, attributes(memokit))]
pub fn derive_to_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = &input.ident;

    let generics = &input.generics;

    let mut cell = None;
    if let Some(attr) = find_attr(&input.attrs) {
        let args: MetaNameValue = match attr.parse_args() {
            Ok(args) => args,
            Err(error) => return error.to_compile_error().into(),
        };
        if args.path.is_ident("path") {
            let value = args.value.to_token_stream().to_string();
            cell = Some(format_ident!("{}", &value[1..value.len() - 1]));
        }
    }
    let memokit = cell.unwrap_or(format_ident!("memokit"));

    let generic_params: Punctuated<_, Comma> = generics
        .params
        .iter()
        .map(|param| match param {
            GenericParam::Lifetime(lifetime_param) => lifetime_param.to_token_stream(),
            GenericParam::Type(type_param) => {
                let ident = &type_param.ident;

                let mut bounds = type_param.bounds.clone();
                bounds.push(parse_quote!(#memokit::value::ToValue));

                quote! {
                    #ident: #bounds
                }
            }
            GenericParam::Const(const_param) => const_param.to_token_stream(),
        })
        .collect();

    let generic_ty_params: Punctuated<_, Comma> = generics
        .params
        .iter()
        .map(|param| match param {
            GenericParam::Lifetime(lifetime_param) => lifetime_param.lifetime.to_token_stream(),
            GenericParam::Type(type_param) => type_param.ident.to_token_stream(),
            GenericParam::Const(const_param) => const_param.ident.to_token_stream(),
        })
        .collect();

    let where_clause = &generics.where_clause;

    let Data::Struct(input_struct) = &input.data else {
        return syn::Error::new_spanned(ident, "`ToValue` can only be derived for structs")
            .to_compile_error()
            .into();
    };

    let body = match &input_struct.fields {
        Fields::Named(fields) => {
            let mut inserts = Vec::new();
            for field in &fields.named {
                let Some(field_ident) = field.ident.as_ref() else {
                    continue;
                };

                let key = match field_key(&field.attrs, field_ident) {
                    Ok(Some(key)) => key,
                    Ok(None) => continue,
                    Err(error) => return error.to_compile_error().into(),
                };

                inserts.push(quote! {
                    object.insert(
                        #key,
                        #memokit::value::ToValue::to_value(&self.#field_ident),
                    );
                });
            }

            quote! {
                let mut object = #memokit::value::Object::new();
                #( #inserts )*
                #memokit::value::Value::from(object)
            }
        }
        Fields::Unnamed(fields) => {
            let items = (0..fields.unnamed.len()).map(|idx| {
                let idx = syn::Index::from(idx);
                quote! {
                    #memokit::value::ToValue::to_value(&self.#idx)
                }
            });

            quote! {
                #memokit::value::Value::array([#( #items ),*])
            }
        }
        Fields::Unit => quote! {
            #memokit::value::Value::from(#memokit::value::Object::new())
        },
    };

    let gen = quote! {
        impl <#generic_params> #memokit::value::ToValue for #ident <#generic_ty_params> #where_clause {
            fn to_value(&self) -> #memokit::value::Value {
                #body
            }
        }
    };
    gen.into()
}

fn find_attr(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident("memokit"))
}

/// Returns the object key for a field, or `None` if the field is skipped.
fn field_key(attrs: &[Attribute], ident: &Ident) -> syn::Result<Option<LitStr>> {
    let mut key = LitStr::new(&ident.to_string(), ident.span());

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("memokit")) {
        let mut is_skipped = false;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                is_skipped = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                key = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;

        if is_skipped {
            return Ok(None);
        }
    }

    Ok(Some(key))
}
