pub mod dao_methods;
pub mod form_script;
pub mod handler;
pub mod list_script;
pub mod list_view;
pub mod request_model;

use crate::config::GeneratorConfig;
use crate::entity_fields::EntityModel;
use crate::error::{Result, ScaffoldError};
use crate::mapping_document::MappingInspection;
use crate::types::{Anchor, ArtifactKind, ArtifactSpec, QueryFragment, Splice};
use proc_macro2::TokenStream;

use dao_methods::generate_dao_methods;
use form_script::generate_form_script;
use handler::generate_handler;
use list_script::generate_list_script;
use list_view::generate_list_view;
use request_model::generate_request_model;

/// Renders every derived artifact for one entity, in commit order.
pub fn render_artifacts(
    entity: &EntityModel,
    mapping: &MappingInspection,
    query: &QueryFragment,
    config: &GeneratorConfig,
) -> Result<Vec<ArtifactSpec>> {
    let naming = &entity.naming;
    let targets = &config.targets;

    Ok(vec![
        ArtifactSpec::create(
            ArtifactKind::RequestModel,
            targets.request_model_path(naming),
            generate_request_model(entity, &config.modules)?,
        ),
        ArtifactSpec::append(
            ArtifactKind::DaoQuery,
            mapping.path.clone(),
            query.mapper_fragment(),
            Splice {
                anchor: Anchor::XmlRootClose,
                guard: query.list_statement_id.clone(),
            },
        ),
        ArtifactSpec::append(
            ArtifactKind::DaoMethods,
            targets.dao_path(naming),
            generate_dao_methods(entity, &config.modules),
            Splice {
                anchor: Anchor::TraitClose {
                    trait_name: naming.mapper_trait.clone(),
                },
                guard: naming.list_method.clone(),
            },
        ),
        ArtifactSpec::create(
            ArtifactKind::Handler,
            targets.handler_path(naming),
            generate_handler(entity, &config.modules)?,
        ),
        ArtifactSpec::create(
            ArtifactKind::ListView,
            targets.list_view_path(naming),
            generate_list_view(entity),
        ),
        ArtifactSpec::create(
            ArtifactKind::ListScript,
            targets.list_script_path(naming),
            generate_list_script(entity),
        ),
        ArtifactSpec::create(
            ArtifactKind::FormScript,
            targets.form_script_path(naming),
            generate_form_script(entity),
        ),
    ])
}

/// Re-parses generated tokens as a file and pretty prints them.
pub(crate) fn format_tokens(kind: ArtifactKind, tokens: TokenStream) -> Result<String> {
    let file: syn::File = syn::parse2(tokens).map_err(|err| ScaffoldError::Render {
        artifact: kind.as_str(),
        reason: err.to_string(),
    })?;

    Ok(prettyplease::unparse(&file))
}

pub(crate) fn parse_path(kind: ArtifactKind, path: &str) -> Result<syn::Path> {
    syn::parse_str(path).map_err(|err| ScaffoldError::Render {
        artifact: kind.as_str(),
        reason: format!("invalid path `{}`: {}", path, err),
    })
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Body of a double-quoted JavaScript string literal.
pub(crate) fn escape_js(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '<' => escaped.push_str("\\u003c"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::FieldRoleNames;
    use crate::entity_fields::{parse_entity, EntityModel};
    use crate::sources::SourceUnit;

    pub const ORDER: &str = r#"
        use serde::{Deserialize, Serialize};

        #[derive(Clone, Debug, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct Order {
            /// Column: order_tbl.id
            /// Id
            pub id: Option<i64>,
            /// Column: order_tbl.add_time
            /// Created
            pub add_time: Option<String>,
            /// Column: order_tbl.update_time
            /// Updated
            pub update_time: Option<String>,
            /// Column: order_tbl.del_flag
            /// Deleted
            pub del_flag: Option<i32>,
            /// Column: order_tbl.cust_name
            /// Customer Name, varchar(64)
            pub customer_name: Option<String>,
        }
    "#;

    pub const PING: &str = r#"
        pub struct Ping {
            /// Column: ping.id
            /// Id
            pub id: i32,
        }
    "#;

    pub const KEBAB: &str = r#"
        #[derive(Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub struct Invoice {
            /// Column: invoice.id
            /// Id
            pub id: Option<i64>,
            /// Column: invoice.add_time
            /// Created
            pub add_time: Option<String>,
            /// Column: invoice.customer_name
            /// Customer
            pub customer_name: Option<String>,
            /// Column: invoice.memo
            /// Memo
            #[serde(rename = "memo\"x")]
            pub memo: Option<String>,
        }
    "#;

    pub fn entity(source: &str) -> EntityModel {
        parse_entity(&SourceUnit::new("model.rs", source), &FieldRoleNames::default()).unwrap()
    }
}
