use crate::config::FieldRoleNames;
use crate::error::{Result, ScaffoldError};
use crate::sources::SourceUnit;
use crate::types::{FieldDescriptor, FieldRole, NamingProfile};
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, Field, Fields, GenericArgument, Item, ItemStruct, Lit, Meta,
    MetaNameValue, PathArguments, Type,
};
use tracing::{debug, warn};

/// Primary key of the base entity.
#[derive(Clone, Debug)]
pub struct IdentityInfo {
    pub field: String,
    pub wire_name: String,
    pub key_type: Type, // Option unwrapped
    pub optional: bool,
}

/// The base entity as seen by every template.
#[derive(Clone, Debug)]
pub struct EntityModel {
    pub naming: NamingProfile,
    pub item: ItemStruct,
    pub rename_all: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub identity: IdentityInfo,
}

impl EntityModel {
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.in_form())
    }

    pub fn list_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.in_list())
    }

    /// Serialized name of a field added to the request model.
    pub fn request_wire_name(&self, field: &str) -> String {
        match &self.rename_all {
            Some(rule) => apply_rename_rule(rule, field),
            None => field.to_string(),
        }
    }
}

pub fn parse_entity(unit: &SourceUnit, roles: &FieldRoleNames) -> Result<EntityModel> {
    let file = syn::parse_file(&unit.content).map_err(|source| ScaffoldError::SourceParse {
        path: unit.path.clone(),
        source,
    })?;

    let item = file
        .items
        .into_iter()
        .find_map(|item: Item| match item {
            Item::Struct(item) if !matches!(item.fields, Fields::Unnamed(_)) => Some(item),
            _ => None,
        })
        .ok_or_else(|| ScaffoldError::malformed(&unit.path, "no struct with named fields"))?;

    let naming = NamingProfile::new(&item.ident.unraw().to_string());
    let rename_all = serde_string_arg(&item.attrs, "rename_all");
    let fields = extract_fields(&item, roles, rename_all.as_deref());
    let identity = identity_info(&item, roles, rename_all.as_deref());

    debug!(
        entity = %naming.entity,
        declared = item.fields.len(),
        described = fields.len(),
        "extracted field metadata"
    );

    Ok(EntityModel {
        naming,
        item,
        rename_all,
        fields,
        identity,
    })
}

pub fn extract_fields(
    item: &ItemStruct,
    roles: &FieldRoleNames,
    rename_all: Option<&str>,
) -> Vec<FieldDescriptor> {
    item.fields
        .iter()
        .filter_map(|field: &Field| {
            let name = field.ident.as_ref()?.unraw().to_string();
            let docs = doc_lines(&field.attrs);

            if docs.is_empty() {
                debug!(field = %name, "field has no documentation lines, skipped");
                return None;
            }

            let role = roles.role_of(&name);

            Some(FieldDescriptor {
                wire_name: wire_name(field, &name, rename_all),
                label: label_from_docs(&docs, &name),
                is_excluded_from_forms: !role.policy().include_in_form,
                role,
                name,
            })
        })
        .collect()
}

/// Non-blank documentation lines attached to an item, in order.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(doc), ..
                    }),
                ..
            }) => Some(doc.value()),
            _ => None,
        })
        .flat_map(|doc| {
            doc.lines()
                .map(str::trim_end)
                .filter(|line| !line.trim().is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The label is the first word of the second documentation line.
pub fn label_from_docs(docs: &[String], fallback: &str) -> String {
    docs.get(1)
        .map(|line| clean_label(line))
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn clean_label(line: &str) -> String {
    let line = line.trim_start();
    let line = line.strip_prefix('*').unwrap_or(line).trim_start();
    let end = line.find([',', ' ']).unwrap_or(line.len());

    line[..end].to_string()
}

fn wire_name(field: &Field, name: &str, rename_all: Option<&str>) -> String {
    if let Some(renamed) = serde_string_arg(&field.attrs, "rename") {
        return renamed;
    }

    match rename_all {
        Some(rule) => apply_rename_rule(rule, name),
        None => name.to_string(),
    }
}

fn serde_string_arg(attrs: &[Attribute], key: &str) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Meta, syn::Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .find_map(|meta| match meta {
            Meta::NameValue(MetaNameValue {
                path,
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(value),
                        ..
                    }),
                ..
            }) if path.is_ident(key) => Some(value.value()),
            _ => None,
        })
}

fn apply_rename_rule(rule: &str, name: &str) -> String {
    match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_upper_camel_case(),
        "camelCase" => name.to_lower_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        "SCREAMING-KEBAB-CASE" => name.to_shouty_kebab_case(),
        _ => name.to_string(),
    }
}

fn identity_info(item: &ItemStruct, roles: &FieldRoleNames, rename_all: Option<&str>) -> IdentityInfo {
    let identity = item.fields.iter().find_map(|field: &Field| {
        let name = field.ident.as_ref()?.unraw().to_string();
        (roles.role_of(&name) == FieldRole::Identity).then(|| (field, name))
    });

    match identity {
        Some((field, name)) => {
            let (key_type, optional) = unwrap_option(&field.ty);
            IdentityInfo {
                wire_name: wire_name(field, &name, rename_all),
                field: name,
                key_type,
                optional,
            }
        }
        None => {
            warn!(
                entity = %item.ident,
                identity = %roles.identity,
                "base entity declares no identity field, assuming i64"
            );
            IdentityInfo {
                field: roles.identity.clone(),
                wire_name: match rename_all {
                    Some(rule) => apply_rename_rule(rule, &roles.identity),
                    None => roles.identity.clone(),
                },
                key_type: syn::parse_quote!(i64),
                optional: true,
            }
        }
    }
}

fn unwrap_option(ty: &Type) -> (Type, bool) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner.clone(), true);
                    }
                }
            }
        }
    }

    (ty.clone(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;

    const ORDER: &str = r#"
        use serde::{Deserialize, Serialize};

        #[derive(Clone, Debug, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct Order {
            /// Column: order_tbl.id
            /// Identifier
            pub id: Option<i64>,
            /// Column: order_tbl.add_time
            /// Created,datetime
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
            pub internal_note: Option<String>,
            /// Column: order_tbl.ref_no
            #[serde(rename = "refNumber")]
            pub ref_no: Option<String>,
        }
    "#;

    fn parse(source: &str) -> EntityModel {
        parse_entity(
            &SourceUnit::new("order.rs", source),
            &FieldRoleNames::default(),
        )
        .unwrap()
    }

    #[test]
    fn keeps_declaration_order_and_skips_undocumented() {
        let entity = parse(ORDER);
        let names: Vec<&str> = entity.fields.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["id", "add_time", "update_time", "del_flag", "customer_name", "ref_no"]
        );
        assert_eq!(entity.naming.entity, "Order");
    }

    #[test]
    fn label_is_first_word_of_second_line() {
        let entity = parse(ORDER);
        let label = |name: &str| {
            entity
                .fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.label.clone())
                .unwrap()
        };

        assert_eq!(label("customer_name"), "Customer");
        assert_eq!(label("add_time"), "Created");
        // single documentation line falls back to the raw name
        assert_eq!(label("ref_no"), "ref_no");
    }

    #[test]
    fn block_comment_marker_is_stripped() {
        assert_eq!(
            label_from_docs(&[" Column: t.a".into(), " * Amount, decimal".into()], "amount"),
            "Amount"
        );
        assert_eq!(label_from_docs(&[" Column".into(), " * ".into()], "amount"), "amount");
    }

    #[test]
    fn audit_fields_are_excluded_from_forms() {
        let entity = parse(ORDER);
        let form: Vec<&str> = entity.form_fields().map(|f| f.name.as_str()).collect();
        let list: Vec<&str> = entity.list_fields().map(|f| f.name.as_str()).collect();

        assert_eq!(form, vec!["customer_name", "ref_no"]);
        assert!(list.contains(&"id"));
        assert!(list.contains(&"add_time"));
        assert!(!list.contains(&"del_flag"));
    }

    #[test]
    fn wire_names_follow_serde_renames() {
        let entity = parse(ORDER);
        let wire: Vec<&str> = entity.fields.iter().map(|f| f.wire_name.as_str()).collect();

        assert_eq!(
            wire,
            vec!["id", "addTime", "updateTime", "delFlag", "customerName", "refNumber"]
        );
        assert_eq!(entity.request_wire_name("id_list"), "idList");
    }

    #[test]
    fn identity_type_is_unwrapped() {
        let entity = parse(ORDER);

        assert_eq!(entity.identity.field, "id");
        assert!(entity.identity.optional);
        assert_eq!(entity.identity.key_type.to_token_stream().to_string(), "i64");
    }

    #[test]
    fn parsed_model_is_debug_printable() {
        let entity = parse(ORDER);
        let printed = format!("{:?}", entity);

        assert!(printed.starts_with("EntityModel {"));
        assert!(printed.contains("ItemStruct"));
        assert!(format!("{:?}", entity.identity).contains("key_type: Type::Path"));
    }

    #[test]
    fn empty_struct_yields_no_descriptors() {
        let entity = parse("pub struct Ping {}");

        assert!(entity.fields.is_empty());
        assert_eq!(entity.identity.field, "id");
        assert_eq!(entity.identity.key_type.to_token_stream().to_string(), "i64");
    }

    #[test]
    fn camel_case_field_names_resolve_roles() {
        let entity = parse(
            r#"
            #[allow(non_snake_case)]
            pub struct Order {
                /// Column: id
                /// Id
                pub id: u64,
                /// Column: addTime
                /// Created
                pub addTime: String,
            }
            "#,
        );

        assert_eq!(entity.fields[1].role, FieldRole::CreatedAt);
        assert!(!entity.identity.optional);
        assert_eq!(entity.identity.key_type.to_token_stream().to_string(), "u64");
    }

    #[test]
    fn source_without_struct_is_malformed() {
        let result = parse_entity(
            &SourceUnit::new("order.rs", "pub fn nothing() {}"),
            &FieldRoleNames::default(),
        );

        assert!(matches!(result, Err(ScaffoldError::MalformedBase { .. })));
    }
}
