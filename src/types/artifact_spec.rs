use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    RequestModel,
    DaoQuery,
    DaoMethods,
    Handler,
    ListView,
    ListScript,
    FormScript,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::RequestModel => "request model",
            ArtifactKind::DaoQuery => "mapper queries",
            ArtifactKind::DaoMethods => "mapper methods",
            ArtifactKind::Handler => "endpoint handler",
            ArtifactKind::ListView => "list view",
            ArtifactKind::ListScript => "list script",
            ArtifactKind::FormScript => "form script",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    XmlRootClose,
    TraitClose { trait_name: String },
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::XmlRootClose => f.write_str("closing tag of the root element"),
            Anchor::TraitClose { trait_name } => write!(f, "closing brace of trait {}", trait_name),
        }
    }
}

/// Where appended content goes, and the name whose presence means it is already there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Splice {
    pub anchor: Anchor,
    pub guard: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteMode {
    CreateNew,
    AppendToExisting(Splice),
}

#[derive(Debug)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub target_path: PathBuf,
    pub content: String,
    pub mode: WriteMode,
}

impl ArtifactSpec {
    pub fn create(kind: ArtifactKind, target_path: PathBuf, content: String) -> Self {
        Self {
            kind,
            target_path,
            content,
            mode: WriteMode::CreateNew,
        }
    }

    pub fn append(kind: ArtifactKind, target_path: PathBuf, content: String, splice: Splice) -> Self {
        Self {
            kind,
            target_path,
            content,
            mode: WriteMode::AppendToExisting(splice),
        }
    }
}
