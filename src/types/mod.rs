pub mod artifact_spec;
pub mod field_descriptor;
pub mod field_policy;
pub mod naming_profile;
pub mod property_column_map;
pub mod query_fragment;

pub use artifact_spec::{Anchor, ArtifactKind, ArtifactSpec, Splice, WriteMode};
pub use field_descriptor::FieldDescriptor;
pub use field_policy::{FieldPolicy, FieldRole, ListRenderer};
pub use naming_profile::{NamingProfile, Route};
pub use property_column_map::PropertyColumnMap;
pub use query_fragment::{FilterClause, QueryFragment};
