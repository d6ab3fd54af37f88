//! Detector defaults and the serde-loadable [`DetectorConfig`].
//!
//! A config file is YAML (`.yml`/`.yaml`) or JSON with camelCase keys; every
//! key is optional and falls back to the constants below.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    error::{Error, Result},
    field::FieldType,
};

pub const DEFAULT_BYTE_VOLUME: usize = 10_000;
pub const DEFAULT_DATA_VOLUME: usize = 100;
pub const DEFAULT_ENCODING_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_FIELD_CONFIDENCE: f64 = 0.9;
pub const DEFAULT_FLOAT_NUMBERS: bool = false;
pub const DEFAULT_MISSING_VALUES: &[&str] = &[""];

pub const DEFAULT_TRUE_VALUES: &[&str] = &["true", "True", "TRUE", "1"];
pub const DEFAULT_FALSE_VALUES: &[&str] = &["false", "False", "FALSE", "0"];

pub fn default_missing_values() -> Vec<String> {
    DEFAULT_MISSING_VALUES.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub byte_volume: usize,
    pub data_volume: usize,
    pub encoding_confidence: f64,
    pub field_type: Option<FieldType>,
    pub field_names: Option<Vec<String>>,
    pub field_confidence: f64,
    pub field_float_numbers: bool,
    pub field_missing_values: Vec<String>,
    pub schema_sync: bool,
    pub schema_patch: Option<Map<String, JsonValue>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            byte_volume: DEFAULT_BYTE_VOLUME,
            data_volume: DEFAULT_DATA_VOLUME,
            encoding_confidence: DEFAULT_ENCODING_CONFIDENCE,
            field_type: None,
            field_names: None,
            field_confidence: DEFAULT_FIELD_CONFIDENCE,
            field_float_numbers: DEFAULT_FLOAT_NUMBERS,
            field_missing_values: default_missing_values(),
            schema_sync: false,
            schema_patch: None,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        let confidence = self.field_confidence;
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "fieldConfidence must be within (0, 1], got {confidence}"
            )));
        }
        let encoding = self.encoding_confidence;
        if !(0.0..=1.0).contains(&encoding) {
            return Err(Error::InvalidConfig(format!(
                "encodingConfidence must be within [0, 1], got {encoding}"
            )));
        }
        if self.byte_volume == 0 {
            return Err(Error::InvalidConfig(
                "byteVolume must be positive".to_string(),
            ));
        }
        if self.data_volume == 0 {
            return Err(Error::InvalidConfig(
                "dataVolume must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_default_missing_values(&self) -> bool {
        self.field_missing_values.len() == DEFAULT_MISSING_VALUES.len()
            && self
                .field_missing_values
                .iter()
                .zip(DEFAULT_MISSING_VALUES)
                .all(|(a, b)| a == b)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DetectorConfig = if is_yaml_path(path) {
            serde_yaml::from_str(&raw)?
        } else {
            serde_json::from_str(&raw)?
        };
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.has_default_missing_values());
    }

    #[test]
    fn confidence_outside_unit_interval_is_rejected() {
        for confidence in [0.0, -0.5, 1.5, f64::NAN] {
            let config = DetectorConfig {
                field_confidence: confidence,
                ..DetectorConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn yaml_config_uses_camel_case_keys() {
        let config: DetectorConfig = serde_yaml::from_str(
            "fieldConfidence: 0.75\nfieldFloatNumbers: true\nfieldMissingValues: ['', 'NA']\nfieldType: string\n",
        )
        .expect("parse config");
        assert_eq!(config.field_confidence, 0.75);
        assert!(config.field_float_numbers);
        assert_eq!(config.field_type, Some(FieldType::String));
        assert!(!config.has_default_missing_values());
        assert_eq!(config.data_volume, DEFAULT_DATA_VOLUME);
    }
}
