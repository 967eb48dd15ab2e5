use crate::config::GeneratorConfig;
use crate::entity_fields::{parse_entity, EntityModel};
use crate::error::{Result, ScaffoldError};
use crate::mapping_document::{inspect_mapping, MappingInspection};
use crate::patcher::{commit, PatchOutcome};
use crate::query_synthesizer::synthesize;
use crate::sources::BaseArtifactSource;
use crate::templates::render_artifacts;
use crate::types::{ArtifactKind, ArtifactSpec};
use std::path::PathBuf;
use tracing::{error, info};

/// What one run committed, in commit order.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub entity: String,
    pub committed: Vec<(ArtifactKind, PathBuf, PatchOutcome)>,
}

impl RunReport {
    pub fn outcome(&self, kind: ArtifactKind) -> Option<PatchOutcome> {
        self.committed
            .iter()
            .find(|(committed, _, _)| *committed == kind)
            .map(|(_, _, outcome)| *outcome)
    }
}

pub struct Scaffold<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Scaffold<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Extract, inspect, synthesize and render everything before the first write.
    pub fn run(&self, source: &dyn BaseArtifactSource) -> Result<RunReport> {
        let entity = self.load_entity(source)?;
        let mapping = self.load_mapping(source)?;

        info!(
            entity = %entity.naming.entity,
            fields = entity.fields.len(),
            properties = mapping.properties.len(),
            "base artifacts loaded"
        );

        let query = synthesize(&entity.naming, &mapping, self.config.dialect);
        let artifacts = render_artifacts(&entity, &mapping, &query, self.config)?;

        let committed = commit_all(artifacts)?;

        Ok(RunReport {
            entity: entity.naming.entity,
            committed,
        })
    }

    fn load_entity(&self, source: &dyn BaseArtifactSource) -> Result<EntityModel> {
        let unit = source
            .model_units()?
            .into_iter()
            .next()
            .ok_or(ScaffoldError::MissingSource("model source unit"))?;

        parse_entity(&unit, &self.config.fields)
    }

    fn load_mapping(&self, source: &dyn BaseArtifactSource) -> Result<MappingInspection> {
        let unit = source
            .mapping_documents()?
            .into_iter()
            .next()
            .ok_or(ScaffoldError::MissingSource("mapping document"))?;

        inspect_mapping(&unit)
    }
}

fn commit_all(artifacts: Vec<ArtifactSpec>) -> Result<Vec<(ArtifactKind, PathBuf, PatchOutcome)>> {
    let mut committed = Vec::with_capacity(artifacts.len());

    for spec in artifacts {
        let kind = spec.kind;
        let path = spec.target_path.clone();

        match commit(spec) {
            Ok(outcome) => committed.push((kind, path, outcome)),
            Err(err) => {
                error!(
                    artifact = %kind,
                    path = %path.display(),
                    committed = committed.len(),
                    "commit failed, earlier artifacts stay committed"
                );
                return Err(err);
            }
        }
    }

    Ok(committed)
}
