use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let (kind, collection) = extract_names(&input);
    let fields = collect_fields(&input);

    let id_field = fields.id;
    let required_checks = fields.required.iter().map(|field| {
        let message = LitStr::new(&format!("{} is required", field), field.span());
        quote! {
            if ::bookstore::Required::is_missing(&self.#field) {
                return Err(::bookstore::Error::Validation {
                    kind: Self::KIND,
                    message: #message.to_string(),
                });
            }
        }
    });
    let non_negative_checks = fields.non_negative.iter().map(|field| {
        let message = LitStr::new(&format!("{} must not be negative", field), field.span());
        quote! {
            if ::bookstore::NonNegative::is_negative(&self.#field) {
                return Err(::bookstore::Error::Validation {
                    kind: Self::KIND,
                    message: #message.to_string(),
                });
            }
        }
    });
    let stamps = fields.created_at.iter().map(|field| {
        quote! { self.#field = now; }
    });
    let carries = fields.created_at.iter().map(|field| {
        quote! { self.#field = existing.#field; }
    });

    let expanded = quote! {
        impl ::bookstore::Entity for #name {
            const KIND: &'static str = #kind;
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> ::bookstore::EntityId {
                self.#id_field
            }

            fn set_id(&mut self, id: ::bookstore::EntityId) {
                self.#id_field = id;
            }

            fn validate(&self) -> ::bookstore::Result<()> {
                #(#required_checks)*
                #(#non_negative_checks)*
                Ok(())
            }

            #[allow(unused_variables)]
            fn stamp_created(&mut self, now: ::bookstore::Timestamp) {
                #(#stamps)*
            }

            #[allow(unused_variables)]
            fn retain_server_fields(&mut self, existing: &Self) {
                #(#carries)*
            }
        }
    };

    TokenStream::from(expanded)
}

struct EntityFields {
    id: Ident,
    required: Vec<Ident>,
    non_negative: Vec<Ident>,
    created_at: Vec<Ident>,
}

fn extract_names(input: &DeriveInput) -> (String, String) {
    let mut kind = None;
    let mut collection = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                kind = Some(value.value());
            } else if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
            }
            Ok(())
        });
    }

    // Default: snake_case struct name, collection = kind + "s"
    let kind = kind.unwrap_or_else(|| to_snake_case(&input.ident.to_string()));
    let collection = collection.unwrap_or_else(|| format!("{}s", kind));
    (kind, collection)
}

fn collect_fields(input: &DeriveInput) -> EntityFields {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Entity derive only supports structs with named fields"),
        },
        _ => panic!("Entity derive only supports structs"),
    };

    let mut id = None;
    let mut required = Vec::new();
    let mut non_negative = Vec::new();
    let mut created_at = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };

        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }

            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    id = Some(ident.clone());
                } else if meta.path.is_ident("required") {
                    required.push(ident.clone());
                } else if meta.path.is_ident("non_negative") {
                    non_negative.push(ident.clone());
                } else if meta.path.is_ident("created_at") {
                    created_at.push(ident.clone());
                }
                Ok(())
            });
        }
    }

    // Default: look for a field named "id"
    let id = id.or_else(|| {
        fields
            .iter()
            .filter_map(|field| field.ident.clone())
            .find(|ident| ident == "id")
    });

    let Some(id) = id else {
        panic!("Entity derive: no field marked with #[entity(id)] and no field named `id`");
    };

    EntityFields {
        id,
        required,
        non_negative,
        created_at,
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
