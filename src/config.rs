use crate::error::{Result, ScaffoldError};
use crate::types::{FieldRole, NamingProfile};
use heck::ToSnakeCase;
use serde_derive::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Pagination syntax of the target database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    #[default]
    MySql,
    PostgreSql,
}

impl Dialect {
    pub fn pagination_clause(self) -> &'static str {
        match self {
            Dialect::MySql => "limit #{start},#{limit}",
            Dialect::PostgreSql => "limit #{limit} offset #{start}",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSql),
            _ => Err(format!("unknown dialect '{}'", value)),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// Target directories, relative to `project_folder`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TargetLayout {
    pub project_folder: PathBuf,
    pub model_dir: PathBuf,
    pub mapping_dir: PathBuf,
    pub dao_dir: PathBuf,
    pub handler_dir: PathBuf,
    pub view_dir: PathBuf,
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self {
            project_folder: PathBuf::from("."),
            model_dir: PathBuf::from("src/model"),
            mapping_dir: PathBuf::from("src/resources/mapper"),
            dao_dir: PathBuf::from("src/mapper"),
            handler_dir: PathBuf::from("src/web"),
            view_dir: PathBuf::from("static"),
        }
    }
}

impl TargetLayout {
    fn resolve(&self, dir: &Path, file: String) -> PathBuf {
        self.project_folder.join(dir).join(file)
    }

    pub fn model_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.model_dir, format!("{}.rs", naming.module))
    }

    pub fn request_model_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.model_dir, format!("{}.rs", naming.request_module))
    }

    pub fn mapping_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.mapping_dir, naming.mapping_file.clone())
    }

    pub fn dao_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.dao_dir, format!("{}.rs", naming.mapper_module))
    }

    pub fn handler_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.handler_dir, format!("{}.rs", naming.controller_module))
    }

    pub fn list_view_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.view_dir, format!("{}.html", naming.list_view))
    }

    pub fn list_script_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.view_dir, format!("{}.js", naming.list_view))
    }

    pub fn form_script_path(&self, naming: &NamingProfile) -> PathBuf {
        self.resolve(&self.view_dir, format!("{}.js", naming.form_script))
    }
}

/// Rust module paths the generated code imports from.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ModulePaths {
    pub model: String,
    pub dao: String,
    pub response: String, // full path of the success/failure envelope type
}

impl Default for ModulePaths {
    fn default() -> Self {
        Self {
            model: "crate::model".into(),
            dao: "crate::mapper".into(),
            response: "crate::web::ResponseVo".into(),
        }
    }
}

impl ModulePaths {
    pub fn entity_path(&self, naming: &NamingProfile) -> String {
        format!("{}::{}::{}", self.model, naming.module, naming.entity)
    }

    pub fn request_path(&self, naming: &NamingProfile) -> String {
        format!("{}::{}::{}", self.model, naming.request_module, naming.request_type)
    }

    pub fn mapper_path(&self, naming: &NamingProfile) -> String {
        format!("{}::{}::{}", self.dao, naming.mapper_module, naming.mapper_trait)
    }
}

/// Field names carrying the identity/audit roles.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FieldRoleNames {
    pub identity: String,
    pub created_at: String,
    pub updated_at: String,
    pub soft_delete: String,
}

impl Default for FieldRoleNames {
    fn default() -> Self {
        Self {
            identity: "id".into(),
            created_at: "add_time".into(),
            updated_at: "update_time".into(),
            soft_delete: "del_flag".into(),
        }
    }
}

impl FieldRoleNames {
    pub fn role_of(&self, field_name: &str) -> FieldRole {
        let name = field_name.to_snake_case();
        let table = [
            (&self.identity, FieldRole::Identity),
            (&self.created_at, FieldRole::CreatedAt),
            (&self.updated_at, FieldRole::UpdatedAt),
            (&self.soft_delete, FieldRole::SoftDelete),
        ];

        table
            .iter()
            .find(|(role_name, _)| role_name.to_snake_case() == name)
            .map(|(_, role)| *role)
            .unwrap_or(FieldRole::Regular)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub dialect: Dialect,
    pub targets: TargetLayout,
    pub modules: ModulePaths,
    pub fields: FieldRoleNames,
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| ScaffoldError::Config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| ScaffoldError::storage(path, err))?;

        Self::from_toml_str(&content)
    }
}
