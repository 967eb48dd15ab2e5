use super::{format_tokens, parse_path};
use crate::config::ModulePaths;
use crate::entity_fields::EntityModel;
use crate::error::Result;
use crate::types::ArtifactKind;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{Attribute, Field};

pub fn generate_request_model(entity: &EntityModel, modules: &ModulePaths) -> Result<String> {
    let tokens = request_model_tokens(entity, modules)?;

    format_tokens(ArtifactKind::RequestModel, tokens)
}

pub fn request_model_tokens(entity: &EntityModel, modules: &ModulePaths) -> Result<TokenStream> {
    let naming = &entity.naming;

    let entity_path = parse_path(ArtifactKind::RequestModel, &modules.entity_path(naming))?;
    let entity_ident = format_ident!("{}", naming.entity);
    let request_ident = format_ident!("{}", naming.request_type);
    let key_type = &entity.identity.key_type;

    let module_doc = format!(
        " Query and batch parameters for `{}`, extending every field of the base entity.",
        naming.entity
    );

    let serde_attrs: Vec<&Attribute> = entity
        .item
        .attrs
        .iter()
        .filter(|attr: &&Attribute| attr.path().is_ident("serde"))
        .collect();

    let fields: Vec<&Field> = entity.item.fields.iter().collect();

    let field_idents: Vec<&Ident> = entity
        .item
        .fields
        .iter()
        .filter_map(|field: &Field| field.ident.as_ref())
        .collect();

    Ok(quote! {
        #![doc = #module_doc]

        use serde::{Deserialize, Serialize};
        use #entity_path;

        #[derive(Clone, Debug, Default, Serialize, Deserialize)]
        #(#serde_attrs)*
        pub struct #request_ident {
            #(#fields,)*
            #[serde(default)]
            pub id_list: Option<Vec<#key_type>>,
            #[serde(default)]
            pub start: i64,
            #[serde(default)]
            pub limit: i64,
        }

        impl From<#request_ident> for #entity_ident {
            fn from(req: #request_ident) -> Self {
                #entity_ident {
                    #(#field_idents: req.#field_idents,)*
                }
            }
        }
    })
}
