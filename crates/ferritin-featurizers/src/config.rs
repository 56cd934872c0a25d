//! Generator configuration.
//!
//! Class counts are fixed when a generator is built. They can be overridden
//! from JSON but must still agree with the vocabularies in `ferritin-core`.
use crate::error::{FeatureError, Result};
use ferritin_core::{NUM_MSA_DATA_SOURCES, NUM_RESIDUE_TYPES};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Classes of the residue one-hot and profile features.
    pub num_residue_types: usize,
    /// Classes of the data source one-hot, including the trailing `None` code.
    pub num_data_sources: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            num_residue_types: NUM_RESIDUE_TYPES,
            num_data_sources: NUM_MSA_DATA_SOURCES,
        }
    }
}

impl FeatureConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_residue_types != NUM_RESIDUE_TYPES {
            return Err(FeatureError::Config(format!(
                "num_residue_types is {} but the residue vocabulary has {} entries",
                self.num_residue_types, NUM_RESIDUE_TYPES
            )));
        }
        if self.num_data_sources != NUM_MSA_DATA_SOURCES {
            return Err(FeatureError::Config(format!(
                "num_data_sources is {} but the data source vocabulary has {} entries",
                self.num_data_sources, NUM_MSA_DATA_SOURCES
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FeatureConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() -> Result<()> {
        let config = FeatureConfig::from_json(r#"{"num_data_sources": 5}"#)?;
        assert_eq!(config, FeatureConfig::default());
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_mismatch() {
        let err = FeatureConfig::from_json(r#"{"num_data_sources": 6}"#).unwrap_err();
        assert!(matches!(err, FeatureError::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        let err = FeatureConfig::from_json(r#"{"num_classes": 5}"#).unwrap_err();
        assert!(matches!(err, FeatureError::Json(_)));
    }
}
