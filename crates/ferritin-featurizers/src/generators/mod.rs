//! Concrete feature generators.
mod msa;

pub use msa::{
    IsPairedMsaGenerator, IsPairedMsaInputs, MsaDataSourceGenerator, MsaDataSourceInputs,
    MsaDeletionInputs, MsaDeletionMeanGenerator, MsaDeletionMeanInputs, MsaDeletionValueGenerator,
    MsaFeatureGenerator, MsaHasDeletionGenerator, MsaProfileGenerator, MsaProfileInputs,
    MsaTokensInputs,
};

use crate::base::{Feature, Featurize};
use crate::batch::Batch;
use crate::config::FeatureConfig;
use crate::error::Result;
use std::collections::BTreeMap;
use tracing::debug;

pub type BoxedGenerator = Box<dyn Featurize + Send + Sync>;

/// All MSA generators, in the order the model inputs are assembled.
pub fn msa_feature_generators(config: &FeatureConfig) -> Result<Vec<BoxedGenerator>> {
    config.validate()?;
    let generators: Vec<BoxedGenerator> = vec![
        Box::new(MsaFeatureGenerator::from_config(config)?),
        Box::new(MsaHasDeletionGenerator::default()),
        Box::new(MsaDeletionValueGenerator::default()),
        Box::new(IsPairedMsaGenerator::default()),
        Box::new(MsaDataSourceGenerator::from_config(config)?),
        Box::new(MsaProfileGenerator::from_config(config)?),
        Box::new(MsaDeletionMeanGenerator::default()),
    ];
    debug!(count = generators.len(), "built msa feature generators");
    Ok(generators)
}

/// Run every generator against the same batch, keyed by feature name.
pub fn generate_all(
    generators: &[BoxedGenerator],
    batch: &Batch,
) -> Result<BTreeMap<String, Feature>> {
    generators
        .iter()
        .map(|generator| {
            let feature = generator.featurize(batch)?;
            Ok((generator.feature_name().to_string(), feature))
        })
        .collect()
}
