use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::DeviceGeneration;
use crate::utils::InspectionError;

/// Minimum classifier confidence for a photo category to be trusted.
pub const DEFAULT_CLASSIFICATION_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    pub device_generation: DeviceGeneration,
    pub classification_threshold: f64,
    pub include_images_in_export: bool,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        InspectionConfig {
            device_generation: DeviceGeneration::G5,
            classification_threshold: DEFAULT_CLASSIFICATION_THRESHOLD,
            include_images_in_export: true,
        }
    }
}

impl InspectionConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InspectionError> {
        let contents = fs::read_to_string(&path)?;
        let config: InspectionConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded config from {:?}: {:?}", path.as_ref(), config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InspectionError> {
        if !(0.0..=1.0).contains(&self.classification_threshold) {
            return Err(InspectionError::InvalidConfig(format!(
                "classification_threshold must be between 0 and 1, got {}",
                self.classification_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = InspectionConfig::default();
        assert_eq!(config.device_generation, DeviceGeneration::G5);
        assert_eq!(config.classification_threshold, 0.3);
        assert!(config.include_images_in_export);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"device_generation": "G3"}}"#).unwrap();

        let config = InspectionConfig::load(file.path()).unwrap();
        assert_eq!(config.device_generation, DeviceGeneration::G3);
        assert_eq!(config.classification_threshold, DEFAULT_CLASSIFICATION_THRESHOLD);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"classification_threshold": 1.5}}"#).unwrap();

        let err = InspectionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, InspectionError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_file_is_a_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = InspectionConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, InspectionError::Json(_)));
    }
}
