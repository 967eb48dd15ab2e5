use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Malformed base artifact {path}: {reason}")]
    MalformedBase { path: PathBuf, reason: String },

    #[error("Failed to parse Rust source {path}: {source}")]
    SourceParse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("Failed to parse mapping document {path}: {source}")]
    MappingParse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Anchor '{anchor}' not found in {path}")]
    AnchorNotFound { path: PathBuf, anchor: String },

    #[error("I/O error on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No {0} supplied by the base artifact source")]
    MissingSource(&'static str),

    #[error("Failed to render {artifact}: {reason}")]
    Render { artifact: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;

impl ScaffoldError {
    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedBase {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn anchor_not_found(path: &Path, anchor: impl Into<String>) -> Self {
        Self::AnchorNotFound {
            path: path.to_path_buf(),
            anchor: anchor.into(),
        }
    }
}
