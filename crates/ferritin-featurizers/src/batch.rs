//! Named raw tensors handed to the feature generators.
use crate::error::{FeatureError, Result};
use candle_core::Tensor;
use std::collections::HashMap;

/// Field names produced by the MSA loading stage.
///
/// All of them are `[batch, depth, tokens]` grids.
pub mod fields {
    pub const MSA_TOKENS: &str = "msa_tokens";
    pub const MSA_DELETION_MATRIX: &str = "msa_deletion_matrix";
    pub const MSA_MASK: &str = "msa_mask";
    pub const MSA_SPECIES: &str = "msa_species";
    pub const MSA_SEQUENCE_SOURCE: &str = "msa_sequence_source";
    pub const MAIN_MSA_TOKENS: &str = "main_msa_tokens";
    pub const MAIN_MSA_MASK: &str = "main_msa_mask";
    pub const MAIN_MSA_DELETION_MATRIX: &str = "main_msa_deletion_matrix";
}

#[derive(Clone, Debug, Default)]
pub struct Batch {
    inputs: HashMap<String, Tensor>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) -> Option<Tensor> {
        self.inputs.insert(name.into(), tensor)
    }

    pub fn with(mut self, name: impl Into<String>, tensor: Tensor) -> Self {
        self.insert(name, tensor);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Tensor> {
        self.inputs
            .get(name)
            .ok_or_else(|| FeatureError::MissingField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    #[test]
    fn test_missing_field() -> Result<()> {
        let batch = Batch::new().with(
            fields::MSA_MASK,
            Tensor::zeros((1, 2, 3), DType::U8, &Device::Cpu)?,
        );
        assert!(batch.contains(fields::MSA_MASK));
        assert_eq!(batch.get(fields::MSA_MASK)?.dims(), &[1, 2, 3]);
        match batch.get(fields::MSA_SPECIES) {
            Err(FeatureError::MissingField(name)) => assert_eq!(name, "msa_species"),
            other => panic!("expected missing field, got {other:?}"),
        }
        Ok(())
    }
}
