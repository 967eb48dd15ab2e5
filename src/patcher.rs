//! Commits rendered artifacts to storage.
//!
//! New files are written whole. Appended fragments are spliced in front of a
//! structurally located anchor, unless the guard name shows the fragment is
//! already there. Every write goes through a temporary file in the target
//! directory followed by a rename, so a failed commit never leaves a partially
//! written artifact behind.

use crate::error::{Result, ScaffoldError};
use crate::mapping_document::parse_document;
use crate::types::{Anchor, ArtifactSpec, Splice, WriteMode};
use proc_macro2::LineColumn;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use syn::{Item, ItemTrait, TraitItem};
use tempfile::Builder;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    Created,
    Appended,
    Skipped, // guard already present
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatchOutcome::Created => "created",
            PatchOutcome::Appended => "appended",
            PatchOutcome::Skipped => "skipped",
        })
    }
}

pub fn commit(spec: ArtifactSpec) -> Result<PatchOutcome> {
    let ArtifactSpec {
        kind,
        target_path,
        content,
        mode,
    } = spec;

    match mode {
        WriteMode::CreateNew => {
            write_atomic(&target_path, &content)?;
            info!(artifact = %kind, path = %target_path.display(), "artifact written");

            Ok(PatchOutcome::Created)
        }
        WriteMode::AppendToExisting(splice) => {
            let existing = fs::read_to_string(&target_path)
                .map_err(|err| ScaffoldError::storage(&target_path, err))?;

            match splice_content(&target_path, &existing, &content, &splice)? {
                Some(patched) => {
                    write_atomic(&target_path, &patched)?;
                    info!(
                        artifact = %kind,
                        path = %target_path.display(),
                        anchor = %splice.anchor,
                        "fragment appended"
                    );

                    Ok(PatchOutcome::Appended)
                }
                None => {
                    warn!(
                        artifact = %kind,
                        path = %target_path.display(),
                        guard = %splice.guard,
                        "fragment already present, skipped"
                    );

                    Ok(PatchOutcome::Skipped)
                }
            }
        }
    }
}

/// Returns the patched text, or `None` when the guard name is already present.
pub fn splice_content(
    path: &Path,
    existing: &str,
    fragment: &str,
    splice: &Splice,
) -> Result<Option<String>> {
    let offset = match &splice.anchor {
        Anchor::XmlRootClose => {
            let document = parse_document(path, existing)?;
            let root = document.root_element();

            let guarded = root
                .descendants()
                .any(|node| node.is_element() && node.attribute("id") == Some(splice.guard.as_str()));
            if guarded {
                return Ok(None);
            }

            let range = root.range();
            existing[range.clone()]
                .rfind("</")
                .map(|index| range.start + index)
                .ok_or_else(|| ScaffoldError::anchor_not_found(path, splice.anchor.to_string()))?
        }
        Anchor::TraitClose { trait_name } => {
            let file = syn::parse_file(existing).map_err(|source| ScaffoldError::SourceParse {
                path: path.to_path_buf(),
                source,
            })?;
            let item = find_trait(&file.items, trait_name)
                .ok_or_else(|| ScaffoldError::anchor_not_found(path, splice.anchor.to_string()))?;

            let guarded = item.items.iter().any(|member: &TraitItem| match member {
                TraitItem::Fn(method) => method.sig.ident == splice.guard.as_str(),
                _ => false,
            });
            if guarded {
                return Ok(None);
            }

            let close = item.brace_token.span.close().start();
            byte_offset(existing, close)
                .filter(|offset| existing[*offset..].starts_with('}'))
                .ok_or_else(|| ScaffoldError::anchor_not_found(path, splice.anchor.to_string()))?
        }
    };

    debug!(path = %path.display(), offset, "anchor located");

    let mut patched = String::with_capacity(existing.len() + fragment.len());
    patched.push_str(&existing[..offset]);
    patched.push_str(fragment);
    patched.push_str(&existing[offset..]);

    Ok(Some(patched))
}

fn find_trait<'a>(items: &'a [Item], name: &str) -> Option<&'a ItemTrait> {
    items.iter().find_map(|item: &Item| match item {
        Item::Trait(item) if item.ident == name => Some(item),
        _ => None,
    })
}

/// Byte offset of a span location; lines are 1-based, columns count chars.
fn byte_offset(text: &str, location: LineColumn) -> Option<usize> {
    let line_start = text
        .split_inclusive('\n')
        .take(location.line.checked_sub(1)?)
        .map(str::len)
        .sum::<usize>();

    text.get(line_start..)?
        .char_indices()
        .nth(location.column)
        .map(|(index, _)| line_start + index)
}

pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|err| ScaffoldError::storage(path, err))?;

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = Builder::new();
    // Fresh files get the process umask applied, like a plain create.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut temp = builder
        .tempfile_in(dir)
        .map_err(|err| ScaffoldError::storage(path, err))?;
    if let Some(permissions) = existing {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|err| ScaffoldError::storage(path, err))?;
    }
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|err| ScaffoldError::storage(path, err))?;
    temp.persist(path)
        .map_err(|err| ScaffoldError::storage(path, err.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArtifactKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MAPPER_XML: &str = "<mapper namespace=\"OrderMapper\">\n  <select id=\"selectByPrimaryKey\">\n    select 1\n  </select>\n</mapper>\n";

    const MAPPER_TRAIT: &str = "use crate::model::order::Order;\n\npub trait OrderMapper {\n    type Error;\n\n    fn select_by_primary_key(&self, id: i64) -> Result<Option<Order>, Self::Error>;\n}\n\npub struct Unrelated {}\n";

    fn xml_splice(guard: &str) -> Splice {
        Splice {
            anchor: Anchor::XmlRootClose,
            guard: guard.into(),
        }
    }

    fn trait_splice(trait_name: &str, guard: &str) -> Splice {
        Splice {
            anchor: Anchor::TraitClose {
                trait_name: trait_name.into(),
            },
            guard: guard.into(),
        }
    }

    #[test]
    fn xml_fragment_goes_before_root_close() {
        let patched = splice_content(
            Path::new("OrderMapper.xml"),
            MAPPER_XML,
            "  <select id=\"queryOrderList\">\n  </select>\n",
            &xml_splice("queryOrderList"),
        )
        .unwrap()
        .unwrap();

        assert!(patched.ends_with("  </select>\n  <select id=\"queryOrderList\">\n  </select>\n</mapper>\n"));
        assert!(patched.starts_with(MAPPER_XML.trim_end_matches("</mapper>\n")));
    }

    #[test]
    fn xml_guard_skips_existing_statement() {
        let result = splice_content(
            Path::new("OrderMapper.xml"),
            MAPPER_XML,
            "<select id=\"selectByPrimaryKey\"/>",
            &xml_splice("selectByPrimaryKey"),
        )
        .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn self_closing_root_has_no_anchor() {
        let result = splice_content(
            Path::new("OrderMapper.xml"),
            "<mapper/>",
            "<select/>",
            &xml_splice("queryOrderList"),
        );

        assert!(matches!(result, Err(ScaffoldError::AnchorNotFound { .. })));
    }

    #[test]
    fn rust_fragment_goes_before_trait_close() {
        let patched = splice_content(
            Path::new("order_mapper.rs"),
            MAPPER_TRAIT,
            "\n    fn query_order_list(&self) -> Result<Vec<Order>, Self::Error>;\n",
            &trait_splice("OrderMapper", "query_order_list"),
        )
        .unwrap()
        .unwrap();

        assert!(patched.contains(
            "Self::Error>;\n\n    fn query_order_list(&self) -> Result<Vec<Order>, Self::Error>;\n}\n\npub struct Unrelated {}"
        ));
        let item: syn::File = syn::parse_file(&patched).unwrap();
        assert_eq!(item.items.len(), 3);
    }

    #[test]
    fn non_ascii_text_before_the_anchor_is_handled() {
        let source = "/// Mapper für Bestellungen ✓\npub trait OrderMapper { fn a(&self); }\n";
        let patched = splice_content(
            Path::new("order_mapper.rs"),
            source,
            " fn b(&self); ",
            &trait_splice("OrderMapper", "b"),
        )
        .unwrap()
        .unwrap();

        assert!(patched.ends_with("{ fn a(&self);  fn b(&self); }\n"));
    }

    #[test]
    fn rust_guard_and_missing_trait() {
        let skipped = splice_content(
            Path::new("order_mapper.rs"),
            MAPPER_TRAIT,
            "",
            &trait_splice("OrderMapper", "select_by_primary_key"),
        )
        .unwrap();
        assert!(skipped.is_none());

        let missing = splice_content(
            Path::new("order_mapper.rs"),
            MAPPER_TRAIT,
            "",
            &trait_splice("CustomerMapper", "query_customer_list"),
        );
        assert!(matches!(missing, Err(ScaffoldError::AnchorNotFound { .. })));
    }

    #[test]
    fn create_overwrites_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let target: PathBuf = dir.path().join("static/nested/OrderList.js");

        let outcome = commit(ArtifactSpec::create(
            ArtifactKind::ListScript,
            target.clone(),
            "first".into(),
        ))
        .unwrap();
        assert_eq!(outcome, PatchOutcome::Created);

        commit(ArtifactSpec::create(
            ArtifactKind::ListScript,
            target.clone(),
            "second".into(),
        ))
        .unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(fs::read_dir(target.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn append_twice_only_splices_once() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("OrderMapper.xml");
        fs::write(&target, MAPPER_XML).unwrap();

        let spec = || {
            ArtifactSpec::append(
                ArtifactKind::DaoQuery,
                target.clone(),
                "  <select id=\"queryOrderList\">\n  </select>\n".into(),
                xml_splice("queryOrderList"),
            )
        };

        assert_eq!(commit(spec()).unwrap(), PatchOutcome::Appended);
        assert_eq!(commit(spec()).unwrap(), PatchOutcome::Skipped);

        let content = fs::read_to_string(&target).unwrap();
        assert_eq!(content.matches("id=\"queryOrderList\"").count(), 1);
    }

    #[test]
    fn append_to_missing_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let result = commit(ArtifactSpec::append(
            ArtifactKind::DaoMethods,
            dir.path().join("missing_mapper.rs"),
            String::new(),
            trait_splice("OrderMapper", "query_order_list"),
        ));

        assert!(matches!(result, Err(ScaffoldError::Storage { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn appending_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("OrderMapper.xml");
        fs::write(&path, MAPPER_XML).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, "<mapper/>\n").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<mapper/>\n");
    }

    #[cfg(unix)]
    #[test]
    fn created_file_matches_a_plain_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.js");
        let created = dir.path().join("OrderList.js");
        fs::write(&reference, "").unwrap();

        write_atomic(&created, "function OrderList() {}\n").unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&created), mode(&reference));
    }
}
