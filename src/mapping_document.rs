//! Reads the base mapper document the external generator produced.
//!
//! Anchors are looked up by role (tag name and statement id), never by
//! position, and every missing anchor is reported before anything is written.

use crate::error::{Result, ScaffoldError};
use crate::sources::SourceUnit;
use crate::types::PropertyColumnMap;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const RESULT_MAP_TAG: &str = "resultMap";
pub const COLUMN_LIST_ID: &str = "Base_Column_List";
pub const PRIMARY_KEY_SELECT_ID: &str = "selectByPrimaryKey";
const DEFAULT_IDENTITY_COLUMN: &str = "id";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingInspection {
    pub path: PathBuf,
    pub result_map_id: String,
    pub column_list_id: String,
    pub identity_column: String,
    pub from_clause: String, // verbatim line, indentation included
    pub properties: PropertyColumnMap,
}

pub fn inspect_mapping(unit: &SourceUnit) -> Result<MappingInspection> {
    let document = parse_document(&unit.path, &unit.content)?;
    let root = document.root_element();

    let result_map = child_element(root, RESULT_MAP_TAG, None).ok_or_else(|| {
        ScaffoldError::malformed(&unit.path, "missing result shape element <resultMap>")
    })?;
    let result_map_id = result_map.attribute("id").ok_or_else(|| {
        ScaffoldError::malformed(&unit.path, "<resultMap> has no id attribute")
    })?;

    child_element(root, "sql", Some(COLUMN_LIST_ID)).ok_or_else(|| {
        ScaffoldError::malformed(
            &unit.path,
            format!("missing column list fragment <sql id=\"{}\">", COLUMN_LIST_ID),
        )
    })?;

    let primary_key_select = child_element(root, "select", Some(PRIMARY_KEY_SELECT_ID))
        .ok_or_else(|| {
            ScaffoldError::malformed(
                &unit.path,
                format!("missing <select id=\"{}\">", PRIMARY_KEY_SELECT_ID),
            )
        })?;
    let from_clause = from_clause_line(&unit.content, primary_key_select).ok_or_else(|| {
        ScaffoldError::malformed(
            &unit.path,
            format!("<select id=\"{}\"> has no from clause", PRIMARY_KEY_SELECT_ID),
        )
    })?;

    let (properties, identity_column) = property_columns(result_map);

    debug!(
        path = %unit.path.display(),
        properties = properties.len(),
        "inspected mapping document"
    );

    Ok(MappingInspection {
        path: unit.path.clone(),
        result_map_id: result_map_id.to_string(),
        column_list_id: COLUMN_LIST_ID.to_string(),
        identity_column: identity_column.unwrap_or_else(|| DEFAULT_IDENTITY_COLUMN.to_string()),
        from_clause,
        properties,
    })
}

pub(crate) fn parse_document<'input>(path: &Path, text: &'input str) -> Result<Document<'input>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };

    Document::parse_with_options(text, options).map_err(|source| ScaffoldError::MappingParse {
        path: path.to_path_buf(),
        source,
    })
}

fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &str,
    id: Option<&str>,
) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .filter(|node| node.is_element() && node.has_tag_name(tag))
        .find(|node| id.map_or(true, |id| node.attribute("id") == Some(id)))
}

fn from_clause_line(source: &str, select: Node) -> Option<String> {
    select
        .children()
        .filter(|node| node.is_text())
        .flat_map(|node| source[node.range()].lines())
        .find(|line| {
            line.split_whitespace()
                .next()
                .map_or(false, |word| word.eq_ignore_ascii_case("from"))
        })
        .map(|line| before_where(line).trim_end().to_string())
}

/// Drops a `where` predicate written on the same line as the table list.
fn before_where(line: &str) -> &str {
    let lower = line.to_ascii_lowercase();
    let mut start = 0;

    while let Some(found) = lower[start..].find("where") {
        let at = start + found;
        let end = at + "where".len();
        let standalone = lower[..at].ends_with(char::is_whitespace)
            && lower[end..]
                .chars()
                .next()
                .map_or(true, |next| next.is_whitespace() || next == '(');
        if standalone {
            return &line[..at];
        }
        start = end;
    }

    line
}

#[derive(Default)]
struct AttributeRecord {
    property: Option<String>,
    column: Option<String>,
}

fn property_columns(result_map: Node) -> (PropertyColumnMap, Option<String>) {
    let mut properties = PropertyColumnMap::new();
    let mut identity_column = None;

    for child in result_map.children().filter(Node::is_element) {
        let mut record = AttributeRecord::default();
        for attribute in child.attributes() {
            match attribute.name() {
                "property" => record.property = Some(attribute.value().to_string()),
                "column" => record.column = Some(attribute.value().to_string()),
                _ => {}
            }
        }

        let (Some(property), Some(column)) = (record.property, record.column) else {
            debug!(tag = child.tag_name().name(), "result map child without property/column pair");
            continue;
        };

        if child.has_tag_name("id") && identity_column.is_none() {
            identity_column = Some(column.clone());
        }
        properties.insert(property, column);
    }

    (properties, identity_column)
}
