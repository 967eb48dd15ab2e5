//! Inputs handed over by the external entity/mapper generator.

use crate::config::TargetLayout;
use crate::error::{Result, ScaffoldError};
use crate::types::NamingProfile;
use std::fs;
use std::path::{Path, PathBuf};

/// One generated file, read whole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub content: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| ScaffoldError::storage(path, err))?;

        Ok(Self::new(path, content))
    }
}

/// The base artifacts produced by the external generator run.
///
/// The first model unit is the base entity and the first mapping document is
/// the base mapper; the rest are ignored.
pub trait BaseArtifactSource {
    fn model_units(&self) -> Result<Vec<SourceUnit>>;

    fn mapping_documents(&self) -> Result<Vec<SourceUnit>>;
}

/// Generated files already on disk.
#[derive(Clone, Debug, Default)]
pub struct GeneratedFiles {
    models: Vec<PathBuf>,
    mappings: Vec<PathBuf>,
}

impl GeneratedFiles {
    pub fn new(models: Vec<PathBuf>, mappings: Vec<PathBuf>) -> Self {
        Self { models, mappings }
    }

    /// The files the external generator writes for `entity` under `layout`.
    pub fn for_entity(layout: &TargetLayout, entity: &str) -> Self {
        let naming = NamingProfile::new(entity);

        Self::new(
            vec![layout.model_path(&naming)],
            vec![layout.mapping_path(&naming)],
        )
    }
}

impl BaseArtifactSource for GeneratedFiles {
    fn model_units(&self) -> Result<Vec<SourceUnit>> {
        self.models.iter().map(|path| SourceUnit::read(path)).collect()
    }

    fn mapping_documents(&self) -> Result<Vec<SourceUnit>> {
        self.mappings.iter().map(|path| SourceUnit::read(path)).collect()
    }
}
