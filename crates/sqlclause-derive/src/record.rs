//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Result, parse_quote};

struct FieldTags {
    skip: bool,
    pairs: Vec<(String, LitStr)>,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    // Every type parameter may reach a field, so each must be walkable.
    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: sqlclause::Walkable));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let tags = parse_field_tags(field)?;
        if tags.skip {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_name = ident.to_string();
        let field_name = field_name.trim_start_matches("r#");
        let pairs = tags.pairs.iter().map(|(k, v)| quote! { (#k, #v) });

        entries.push(quote! {
            sqlclause::Field::new(
                #field_name,
                sqlclause::Tags::new(&[#(#pairs),*]),
                &self.#ident,
            )
        });
    }

    Ok(quote! {
        impl #impl_generics sqlclause::Record for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<sqlclause::Field<'_>> {
                ::std::vec![#(#entries),*]
            }
        }

        impl #impl_generics sqlclause::Walkable for #name #ty_generics #where_clause {
            fn node(&self) -> sqlclause::Node<'_> {
                sqlclause::Node::Record(self)
            }
        }
    })
}

fn parse_field_tags(field: &syn::Field) -> Result<FieldTags> {
    let mut tags = FieldTags {
        skip: false,
        pairs: Vec::new(),
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("tag") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                tags.skip = true;
                return Ok(());
            }

            let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected a tag key such as `param` or `db`"));
            };
            let value: LitStr = meta.value()?.parse()?;
            if tags.pairs.iter().any(|(k, _)| *k == key) {
                return Err(meta.error(format!("duplicate tag key `{key}`")));
            }
            tags.pairs.push((key, value));
            Ok(())
        })?;
    }

    Ok(tags)
}
