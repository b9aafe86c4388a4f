//! Project loading and introspection.

use sf_records::{DeviceDef, Project, UseCase};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Summary of a device for listing.
#[derive(Debug, Clone)]
pub struct DeviceSummary {
    pub id: String,
    pub use_case: UseCase,
    pub header_count: usize,
    pub has_data: bool,
}

/// Load and validate a project file (YAML, or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(sf_records::load_project(path)?)
}

pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    Ok(sf_records::save_yaml(path, project)?)
}

pub fn list_devices(project: &Project) -> Vec<DeviceSummary> {
    project
        .devices
        .iter()
        .map(|d| DeviceSummary {
            id: d.id.clone(),
            use_case: d.use_case,
            header_count: d.headers.columns().count(),
            has_data: d.data.is_some(),
        })
        .collect()
}

pub fn get_device<'a>(project: &'a Project, device_id: &str) -> AppResult<&'a DeviceDef> {
    project
        .devices
        .iter()
        .find(|d| d.id == device_id)
        .ok_or_else(|| AppError::DeviceNotFound(device_id.to_string()))
}

/// Device data file, relative paths resolved against the project file's
/// directory.
pub fn data_path(project_path: &Path, device: &DeviceDef) -> AppResult<PathBuf> {
    let data = device
        .data
        .as_ref()
        .ok_or_else(|| AppError::MissingData(device.id.clone()))?;
    if data.is_absolute() {
        return Ok(data.clone());
    }
    let base = project_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(base.join(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_records::HeaderMapping;

    fn device(data: Option<&str>) -> DeviceDef {
        DeviceDef {
            id: "fv-1".into(),
            use_case: UseCase::ValvePerformance,
            identifier: Default::default(),
            headers: HeaderMapping::from([("time", "Time")]),
            static_metadata: Default::default(),
            stroke_width_in: None,
            groups: None,
            data: data.map(PathBuf::from),
        }
    }

    #[test]
    fn data_path_is_relative_to_project() {
        let p =
            data_path(Path::new("/plant/project.yaml"), &device(Some("data/fv-1.json"))).unwrap();
        assert_eq!(p, PathBuf::from("/plant/data/fv-1.json"));
        let p = data_path(Path::new("/plant/project.yaml"), &device(Some("/abs/fv.json"))).unwrap();
        assert_eq!(p, PathBuf::from("/abs/fv.json"));
    }

    #[test]
    fn missing_data_is_reported() {
        let err = data_path(Path::new("p.yaml"), &device(None)).unwrap_err();
        assert!(matches!(err, AppError::MissingData(id) if id == "fv-1"));
    }

    #[test]
    fn unknown_device() {
        let project = Project {
            version: 1,
            name: "p".into(),
            atmospheric_pressure_psia: None,
            classification: vec![],
            devices: vec![device(None)],
        };
        assert!(get_device(&project, "fv-1").is_ok());
        assert!(matches!(
            get_device(&project, "nope"),
            Err(AppError::DeviceNotFound(_))
        ));
        assert_eq!(list_devices(&project)[0].header_count, 1);
    }
}
