//! sf-records: records, header mapping, metadata and the project file format.

pub mod accessor;
pub mod error;
pub mod headers;
pub mod metadata;
pub mod record;
pub mod schema;
pub mod validate;

pub use accessor::RowAccessor;
pub use error::{RecordsError, RecordsResult};
pub use headers::{keys, HeaderMapping};
pub use metadata::{names, ClassificationRange, ClassificationTable, MetaValue, MetadataSet};
pub use record::Record;
pub use schema::*;
pub use validate::{validate_project, ValidationError, ALL_GROUP, LATEST_VERSION};

pub fn load_yaml(path: &std::path::Path) -> RecordsResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> RecordsResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> RecordsResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_project(path: &std::path::Path) -> RecordsResult<Project> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
