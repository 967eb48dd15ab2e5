use super::{format_tokens, parse_path};
use crate::config::ModulePaths;
use crate::entity_fields::EntityModel;
use crate::error::Result;
use crate::types::{ArtifactKind, NamingProfile, Route};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

pub fn generate_handler(entity: &EntityModel, modules: &ModulePaths) -> Result<String> {
    let naming = &entity.naming;

    let entity_path = parse_path(ArtifactKind::Handler, &modules.entity_path(naming))?;
    let request_path = parse_path(ArtifactKind::Handler, &modules.request_path(naming))?;
    let mapper_path = parse_path(ArtifactKind::Handler, &modules.mapper_path(naming))?;
    let response_path = parse_path(ArtifactKind::Handler, &modules.response)?;

    let module_doc = format!(" HTTP endpoints for `{}`.", naming.entity);
    let controller = format_ident!("{}", naming.controller_type);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);

    let routes = generate_routes(naming);
    let handlers = vec![
        generate_query(naming),
        generate_save(naming),
        generate_find_by_id(entity),
        generate_delete(naming),
        generate_update(naming),
    ];

    let tokens = quote! {
        #![doc = #module_doc]

        use std::fmt::Display;
        use std::sync::Arc;

        use axum::extract::{Query, State};
        use axum::routing::{get, post};
        use axum::{Json, Router};
        use tracing::{error, info};

        use #entity_path;
        use #request_path;
        use #mapper_path;
        use #response_path;

        pub struct #controller;

        impl #controller {
            pub fn router<M>(mapper: Arc<M>) -> Router
            where
                M: #mapper_trait + Send + Sync + 'static,
                M::Error: Display,
            {
                Router::new()
                    #(#routes)*
                    .with_state(mapper)
            }
        }

        #(#handlers)*
    };

    format_tokens(ArtifactKind::Handler, tokens)
}

fn handler_ident(naming: &NamingProfile, route: Route) -> Ident {
    format_ident!("{}", naming.handler_fn(route))
}

fn generate_routes(naming: &NamingProfile) -> Vec<TokenStream> {
    Route::ALL
        .iter()
        .map(|route: &Route| {
            let path = naming.route_path(*route);
            let handler = handler_ident(naming, *route);
            let method = match route {
                Route::Query => format_ident!("get"),
                _ => format_ident!("post"),
            };

            quote! {
                .route(#path, #method(#handler::<M>))
            }
        })
        .collect()
}

/// Turns a mapper call into the response envelope, logging failures.
fn respond(call: TokenStream, success: TokenStream, context: String) -> TokenStream {
    quote! {
        match #call {
            Ok(data) => Json(ResponseVo::success(#success)),
            Err(err) => {
                error!(error = %err, #context);
                Json(ResponseVo::failure(err.to_string()))
            }
        }
    }
}

fn generate_query(naming: &NamingProfile) -> TokenStream {
    let handler = handler_ident(naming, Route::Query);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);
    let request = format_ident!("{}", naming.request_type);
    let request_var = format_ident!("{}", naming.request_variable);
    let list_method = format_ident!("{}", naming.list_method);
    let count_method = format_ident!("{}", naming.count_method);
    let param_log = format!("query {} list", naming.variable);
    let result_log = format!("query {} list result", naming.variable);
    let failure_log = format!("query {} list failed", naming.variable);

    quote! {
        async fn #handler<M>(
            State(mapper): State<Arc<M>>,
            Query(#request_var): Query<#request>,
        ) -> Json<ResponseVo>
        where
            M: #mapper_trait,
            M::Error: Display,
        {
            info!(param = ?#request_var, #param_log);

            let rows = match mapper.#list_method(&#request_var) {
                Ok(rows) => rows,
                Err(err) => {
                    error!(error = %err, #failure_log);
                    return Json(ResponseVo::failure(err.to_string()));
                }
            };

            let count = match mapper.#count_method(&#request_var) {
                Ok(count) => count,
                Err(err) => {
                    error!(error = %err, #failure_log);
                    return Json(ResponseVo::failure(err.to_string()));
                }
            };

            info!(count, rows = rows.len(), #result_log);

            Json(ResponseVo::success(serde_json::json!({
                "count": count,
                "rows": rows,
            })))
        }
    }
}

fn generate_save(naming: &NamingProfile) -> TokenStream {
    let handler = handler_ident(naming, Route::Save);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);
    let entity = format_ident!("{}", naming.entity);
    let var = format_ident!("{}", naming.module);
    let param_log = format!("save {}", naming.variable);

    let body = respond(
        quote! { mapper.insert_selective(&#var) },
        quote! { data },
        format!("save {} failed", naming.variable),
    );

    quote! {
        async fn #handler<M>(
            State(mapper): State<Arc<M>>,
            Json(#var): Json<#entity>,
        ) -> Json<ResponseVo>
        where
            M: #mapper_trait,
            M::Error: Display,
        {
            info!(param = ?#var, #param_log);

            #body
        }
    }
}

fn generate_find_by_id(entity: &EntityModel) -> TokenStream {
    let naming = &entity.naming;
    let handler = handler_ident(naming, Route::FindById);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);
    let entity_ident = format_ident!("{}", naming.entity);
    let var = format_ident!("{}", naming.module);
    let id_field = format_ident!("{}", entity.identity.field);
    let param_log = format!("find {} by id", naming.variable);
    let missing = format!("{} is required", entity.identity.wire_name);

    let id_binding = if entity.identity.optional {
        quote! {
            let Some(id) = #var.#id_field else {
                return Json(ResponseVo::failure(#missing.to_string()));
            };
        }
    } else {
        quote! {
            let id = #var.#id_field;
        }
    };

    let body = respond(
        quote! { mapper.select_by_primary_key(id) },
        quote! { data },
        format!("find {} by id failed", naming.variable),
    );

    quote! {
        async fn #handler<M>(
            State(mapper): State<Arc<M>>,
            Json(#var): Json<#entity_ident>,
        ) -> Json<ResponseVo>
        where
            M: #mapper_trait,
            M::Error: Display,
        {
            info!(param = ?#var, #param_log);

            #id_binding

            #body
        }
    }
}

fn generate_delete(naming: &NamingProfile) -> TokenStream {
    let handler = handler_ident(naming, Route::Delete);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);
    let request = format_ident!("{}", naming.request_type);
    let request_var = format_ident!("{}", naming.request_variable);
    let param_log = format!("delete {}", naming.variable);

    let body = respond(
        quote! {
            ids.into_iter()
                .try_for_each(|id| mapper.delete_by_primary_key(id).map(|_| ()))
                .map(|()| deleted)
        },
        quote! { data },
        format!("delete {} failed", naming.variable),
    );

    quote! {
        async fn #handler<M>(
            State(mapper): State<Arc<M>>,
            Json(#request_var): Json<#request>,
        ) -> Json<ResponseVo>
        where
            M: #mapper_trait,
            M::Error: Display,
        {
            info!(param = ?#request_var, #param_log);

            let ids = #request_var.id_list.unwrap_or_default();
            let deleted = ids.len();

            #body
        }
    }
}

fn generate_update(naming: &NamingProfile) -> TokenStream {
    let handler = handler_ident(naming, Route::Update);
    let mapper_trait = format_ident!("{}", naming.mapper_trait);
    let entity = format_ident!("{}", naming.entity);
    let var = format_ident!("{}", naming.module);
    let param_log = format!("update {}", naming.variable);

    let body = respond(
        quote! { mapper.update_by_primary_key_selective(&#var) },
        quote! { data },
        format!("update {} failed", naming.variable),
    );

    quote! {
        async fn #handler<M>(
            State(mapper): State<Arc<M>>,
            Json(#var): Json<#entity>,
        ) -> Json<ResponseVo>
        where
            M: #mapper_trait,
            M::Error: Display,
        {
            info!(param = ?#var, #param_log);

            #body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::fixtures;

    fn render(source: &str) -> String {
        generate_handler(&fixtures::entity(source), &ModulePaths::default()).unwrap()
    }

    #[test]
    fn exposes_five_routes() {
        let rendered = render(fixtures::ORDER);

        for path in ["/order/query", "/order/save", "/order/findById", "/order/delete", "/order/update"] {
            assert!(rendered.contains(&format!("\"{}\"", path)), "{}", path);
        }
        assert!(rendered.contains("get(query_order_list::<M>)"));
        assert!(rendered.contains("post(delete_order::<M>)"));
    }

    #[test]
    fn every_handler_contains_failures() {
        let rendered = render(fixtures::ORDER);

        assert_eq!(rendered.matches("ResponseVo::failure(").count(), 7);
        assert!(rendered.contains("use crate::web::ResponseVo;"));
        assert!(rendered.contains("use crate::mapper::order_mapper::OrderMapper;"));
    }

    #[test]
    fn optional_identity_is_checked() {
        let rendered = render(fixtures::ORDER);
        assert!(rendered.contains("let Some(id) = order.id else"));

        let rendered = render(fixtures::PING);
        assert!(rendered.contains("let id = ping.id;"));
        assert!(!rendered.contains("let Some(id)"));
    }

    #[test]
    fn output_is_a_valid_source_file() {
        let rendered = render(fixtures::ORDER);

        let file = syn::parse_file(&rendered).unwrap();
        let functions = file
            .items
            .iter()
            .filter(|item| matches!(item, syn::Item::Fn(_)))
            .count();
        assert_eq!(functions, 5);
    }
}
