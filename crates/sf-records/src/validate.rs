//! Project validation logic.

use crate::headers::keys;
use crate::schema::{DeviceDef, Project};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

/// Name reserved for the unfiltered output group.
pub const ALL_GROUP: &str = "all";

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing header '{key}' for device {device}")]
    MissingHeader { device: String, key: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if let Some(p) = project.atmospheric_pressure_psia {
        if !p.is_finite() || p <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "atmospheric_pressure_psia".to_string(),
                value: p.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }

    for (i, range) in project.classification.iter().enumerate() {
        if !(range.drum_pressure_min <= range.drum_pressure_max) {
            return Err(ValidationError::InvalidValue {
                field: format!("classification[{i}]"),
                value: format!("{}..{}", range.drum_pressure_min, range.drum_pressure_max),
                reason: "min must not exceed max".to_string(),
            });
        }
    }

    let mut device_ids = HashSet::new();
    for device in &project.devices {
        if !device_ids.insert(&device.id) {
            return Err(ValidationError::DuplicateId {
                id: device.id.clone(),
                context: "devices".to_string(),
            });
        }
        validate_device(device)?;
    }

    Ok(())
}

fn validate_device(device: &DeviceDef) -> Result<(), ValidationError> {
    if device.headers.optional(keys::TIME).is_none() {
        return Err(ValidationError::MissingHeader {
            device: device.id.clone(),
            key: keys::TIME.to_string(),
        });
    }

    if let Some(width) = device.stroke_width_in {
        if !width.is_finite() || width <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.stroke_width_in", device.id),
                value: width.to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }

    if let Some(groups) = &device.groups {
        let mut names = HashSet::new();
        for group in groups {
            if group.name == ALL_GROUP {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.groups", device.id),
                    value: group.name.clone(),
                    reason: "name is reserved".to_string(),
                });
            }
            if !names.insert(&group.name) {
                return Err(ValidationError::DuplicateId {
                    id: group.name.clone(),
                    context: format!("{} groups", device.id),
                });
            }
        }
    }

    Ok(())
}
