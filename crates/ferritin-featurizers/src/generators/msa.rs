//! MSA feature generators.
//!
//! Per-row features (`FeatureType::Msa`) read the full alignment. Summary
//! features (`FeatureType::Token`) read only the main MSA and collapse the
//! depth axis.
use crate::base::{FeatureGenerator, FeatureSpec, FeatureType};
use crate::batch::{fields, Batch};
use crate::config::FeatureConfig;
use crate::error::{FeatureError, Result};
use crate::utilities::{
    check_class_range, check_msa_grid, check_msa_mask, check_same_shape, masked_mean,
    scale_deletions, unsqueeze_last, INT_DTYPES, UINT_DTYPES,
};
use candle_core::{DType, Tensor};
use ferritin_core::{NUM_MSA_DATA_SOURCES, NUM_RESIDUE_TYPES, UNKNOWN_SPECIES};
use itertools::iproduct;
use tracing::{debug, trace};

fn residue_count(config: &FeatureConfig) -> Result<usize> {
    config.validate()?;
    Ok(config.num_residue_types)
}

/// One-hot encoding of the full MSA, same classes as the residue vocabulary.
#[derive(Debug, Clone)]
pub struct MsaFeatureGenerator {
    spec: FeatureSpec,
}

pub struct MsaTokensInputs {
    pub msa_tokens: Tensor,
}

impl MsaFeatureGenerator {
    pub fn new() -> Self {
        Self {
            spec: FeatureSpec::one_hot(FeatureType::Msa, NUM_RESIDUE_TYPES),
        }
    }

    pub fn from_config(config: &FeatureConfig) -> Result<Self> {
        Ok(Self {
            spec: FeatureSpec::one_hot(FeatureType::Msa, residue_count(config)?),
        })
    }
}

impl Default for MsaFeatureGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGenerator for MsaFeatureGenerator {
    type Inputs = MsaTokensInputs;

    fn name(&self) -> &'static str {
        "msa_one_hot"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        Ok(MsaTokensInputs {
            msa_tokens: batch.get(fields::MSA_TOKENS)?.clone(),
        })
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        check_msa_grid(fields::MSA_TOKENS, &inputs.msa_tokens, UINT_DTYPES)?;
        unsqueeze_last(&inputs.msa_tokens)
    }
}

pub struct MsaDeletionInputs {
    pub msa_deletion_matrix: Tensor,
}

fn deletion_inputs(batch: &Batch) -> Result<MsaDeletionInputs> {
    Ok(MsaDeletionInputs {
        msa_deletion_matrix: batch.get(fields::MSA_DELETION_MATRIX)?.clone(),
    })
}

/// Binary flag for a deletion to the left of each position.
#[derive(Debug, Clone)]
pub struct MsaHasDeletionGenerator {
    spec: FeatureSpec,
}

impl Default for MsaHasDeletionGenerator {
    fn default() -> Self {
        Self {
            spec: FeatureSpec::identity(FeatureType::Msa, 1),
        }
    }
}

impl FeatureGenerator for MsaHasDeletionGenerator {
    type Inputs = MsaDeletionInputs;

    fn name(&self) -> &'static str {
        "msa_has_deletion"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        deletion_inputs(batch)
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let deletions = inputs.msa_deletion_matrix;
        check_msa_grid(fields::MSA_DELETION_MATRIX, &deletions, UINT_DTYPES)?;
        unsqueeze_last(&deletions.gt(0f64)?)
    }
}

/// Deletion counts left of each position, squashed into `[0, 1)` with
/// s(d) = 2 / pi * arctan(d / 3).
#[derive(Debug, Clone)]
pub struct MsaDeletionValueGenerator {
    spec: FeatureSpec,
}

impl Default for MsaDeletionValueGenerator {
    fn default() -> Self {
        Self {
            spec: FeatureSpec::identity(FeatureType::Msa, 1),
        }
    }
}

impl FeatureGenerator for MsaDeletionValueGenerator {
    type Inputs = MsaDeletionInputs;

    fn name(&self) -> &'static str {
        "msa_deletion_value"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        deletion_inputs(batch)
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let deletions = inputs.msa_deletion_matrix;
        check_msa_grid(fields::MSA_DELETION_MATRIX, &deletions, UINT_DTYPES)?;
        unsqueeze_last(&scale_deletions(&deletions)?)
    }
}

/// Distribution over residue types at each token, taken over the valid rows
/// of the main MSA.
#[derive(Debug, Clone)]
pub struct MsaProfileGenerator {
    spec: FeatureSpec,
}

pub struct MsaProfileInputs {
    pub main_msa_tokens: Tensor,
    pub main_msa_mask: Tensor,
}

impl MsaProfileGenerator {
    pub fn new() -> Self {
        Self {
            spec: FeatureSpec::identity(FeatureType::Token, NUM_RESIDUE_TYPES),
        }
    }

    pub fn from_config(config: &FeatureConfig) -> Result<Self> {
        Ok(Self {
            spec: FeatureSpec::identity(FeatureType::Token, residue_count(config)?),
        })
    }
}

impl Default for MsaProfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGenerator for MsaProfileGenerator {
    type Inputs = MsaProfileInputs;

    fn name(&self) -> &'static str {
        "msa_profile"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        Ok(MsaProfileInputs {
            main_msa_tokens: batch.get(fields::MAIN_MSA_TOKENS)?.clone(),
            main_msa_mask: batch.get(fields::MAIN_MSA_MASK)?.clone(),
        })
    }

    /// Returns `[batch, tokens, num_classes]` in `f32`.
    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let MsaProfileInputs {
            main_msa_tokens,
            main_msa_mask,
        } = inputs;
        let (batch, depth, tokens) =
            check_msa_grid(fields::MAIN_MSA_TOKENS, &main_msa_tokens, UINT_DTYPES)?;
        check_msa_mask(fields::MAIN_MSA_MASK, &main_msa_mask)?;
        check_same_shape(
            fields::MAIN_MSA_TOKENS,
            &main_msa_tokens,
            fields::MAIN_MSA_MASK,
            &main_msa_mask,
        )?;
        let num_classes = self.spec.class_count();

        let residues = main_msa_tokens
            .to_dtype(DType::U32)?
            .flatten_all()?
            .to_vec1::<u32>()?;
        let weights = main_msa_mask
            .to_dtype(DType::F32)?
            .flatten_all()?
            .to_vec1::<f32>()?;

        // scatter-add: [batch, depth, tokens] -> [batch, tokens, classes]
        let mut profile = vec![0f32; batch * tokens * num_classes];
        for (b, d, t) in iproduct!(0..batch, 0..depth, 0..tokens) {
            let src = (b * depth + d) * tokens + t;
            let class = residues[src] as usize;
            if class >= num_classes {
                return Err(FeatureError::OutOfRange {
                    name: fields::MAIN_MSA_TOKENS.to_string(),
                    value: class as i64,
                    limit: num_classes,
                });
            }
            profile[(b * tokens + t) * num_classes + class] += weights[src];
        }

        for bins in profile.chunks_mut(num_classes) {
            let total = bins.iter().sum::<f32>().max(1.0);
            bins.iter_mut().for_each(|count| *count /= total);
        }
        trace!(batch, depth, tokens, "accumulated msa profile");

        Ok(Tensor::from_vec(
            profile,
            (batch, tokens, num_classes),
            main_msa_tokens.device(),
        )?)
    }
}

/// Mean deletion count at each token over the valid rows of the main MSA.
#[derive(Debug, Clone)]
pub struct MsaDeletionMeanGenerator {
    spec: FeatureSpec,
}

pub struct MsaDeletionMeanInputs {
    pub main_msa_mask: Tensor,
    pub main_msa_deletion_matrix: Tensor,
}

impl Default for MsaDeletionMeanGenerator {
    fn default() -> Self {
        Self {
            spec: FeatureSpec::identity(FeatureType::Token, 1),
        }
    }
}

impl FeatureGenerator for MsaDeletionMeanGenerator {
    type Inputs = MsaDeletionMeanInputs;

    fn name(&self) -> &'static str {
        "msa_deletion_mean"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        Ok(MsaDeletionMeanInputs {
            main_msa_mask: batch.get(fields::MAIN_MSA_MASK)?.clone(),
            main_msa_deletion_matrix: batch.get(fields::MAIN_MSA_DELETION_MATRIX)?.clone(),
        })
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let mask = inputs.main_msa_mask;
        let deletions = inputs.main_msa_deletion_matrix;
        check_msa_mask(fields::MAIN_MSA_MASK, &mask)?;
        check_msa_grid(fields::MAIN_MSA_DELETION_MATRIX, &deletions, UINT_DTYPES)?;
        check_same_shape(
            fields::MAIN_MSA_MASK,
            &mask,
            fields::MAIN_MSA_DELETION_MATRIX,
            &deletions,
        )?;
        // average out the depth axis
        let mean = masked_mean(&mask, &deletions.to_dtype(DType::F32)?, 1)?;
        unsqueeze_last(&mean)
    }
}

/// Whether each row shares the species of the first row of the alignment.
///
/// Rows that are masked out or whose species is [`UNKNOWN_SPECIES`] are never
/// paired, including row 0 itself.
#[derive(Debug, Clone)]
pub struct IsPairedMsaGenerator {
    spec: FeatureSpec,
}

pub struct IsPairedMsaInputs {
    pub msa_mask: Tensor,
    pub msa_species: Tensor,
}

impl Default for IsPairedMsaGenerator {
    fn default() -> Self {
        Self {
            spec: FeatureSpec::identity(FeatureType::Msa, 1),
        }
    }
}

impl FeatureGenerator for IsPairedMsaGenerator {
    type Inputs = IsPairedMsaInputs;

    fn name(&self) -> &'static str {
        "is_paired_msa"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        Ok(IsPairedMsaInputs {
            msa_mask: batch.get(fields::MSA_MASK)?.clone(),
            msa_species: batch.get(fields::MSA_SPECIES)?.clone(),
        })
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let mask = inputs.msa_mask;
        let species = inputs.msa_species;
        check_msa_mask(fields::MSA_MASK, &mask)?;
        check_msa_grid(fields::MSA_SPECIES, &species, INT_DTYPES)?;
        check_same_shape(fields::MSA_MASK, &mask, fields::MSA_SPECIES, &species)?;

        let species = species.to_dtype(DType::I64)?;
        let first_species = species.narrow(1, 0, 1)?;
        let is_paired = species.broadcast_eq(&first_species)?;

        let known = species.ne(UNKNOWN_SPECIES)?;
        let valid = mask.ne(0u8)?;
        let is_paired = ((is_paired * known)? * valid)?;

        unsqueeze_last(&is_paired)
    }
}

/// Source database of each MSA row, one-hot encoded. Masked-out positions
/// are written as the last class, `num_classes - 1`.
#[derive(Debug, Clone)]
pub struct MsaDataSourceGenerator {
    spec: FeatureSpec,
}

pub struct MsaDataSourceInputs {
    pub msa_mask: Tensor,
    pub msa_sequence_source: Tensor,
}

impl MsaDataSourceGenerator {
    pub fn new(num_classes: usize) -> Result<Self> {
        if num_classes != NUM_MSA_DATA_SOURCES {
            return Err(FeatureError::Config(format!(
                "msa data source feature needs {} classes, got {}",
                NUM_MSA_DATA_SOURCES, num_classes
            )));
        }
        debug!(num_classes, "built msa data source generator");
        Ok(Self {
            spec: FeatureSpec::one_hot(FeatureType::Msa, num_classes).maskable(),
        })
    }

    pub fn from_config(config: &FeatureConfig) -> Result<Self> {
        Self::new(config.num_data_sources)
    }
}

impl FeatureGenerator for MsaDataSourceGenerator {
    type Inputs = MsaDataSourceInputs;

    fn name(&self) -> &'static str {
        "msa_data_source"
    }

    fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs> {
        Ok(MsaDataSourceInputs {
            msa_mask: batch.get(fields::MSA_MASK)?.clone(),
            msa_sequence_source: batch.get(fields::MSA_SEQUENCE_SOURCE)?.clone(),
        })
    }

    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor> {
        let mask = inputs.msa_mask;
        let source = inputs.msa_sequence_source;
        check_msa_mask(fields::MSA_MASK, &mask)?;
        check_msa_grid(fields::MSA_SEQUENCE_SOURCE, &source, UINT_DTYPES)?;
        check_same_shape(fields::MSA_MASK, &mask, fields::MSA_SEQUENCE_SOURCE, &source)?;

        // valid rows must carry a recognized source, `None` is reserved for padding
        let invalid = (self.spec.class_count() - 1) as u32;
        let recognized = mask.where_cond(&source, &source.zeros_like()?)?;
        check_class_range(fields::MSA_SEQUENCE_SOURCE, &recognized, invalid as usize)?;

        let fill = Tensor::full(invalid, source.dims(), source.device())?.to_dtype(source.dtype())?;
        let source = mask.where_cond(&source, &fill)?;

        unsqueeze_last(&source)
    }
}
