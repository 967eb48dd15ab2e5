pub mod config;
pub mod entity_fields;
pub mod error;
pub mod mapping_document;
pub mod patcher;
pub mod pipeline;
pub mod query_synthesizer;
pub mod sources;
pub mod templates;
pub mod types;

pub use error::{Result, ScaffoldError};
pub use pipeline::{RunReport, Scaffold};
