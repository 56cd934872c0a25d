//! ferritin-featurizers
//!
//! Turns a batch of raw MSA tensors (tokens, deletion counts, masks, species
//! and source identifiers) into the numeric features consumed by a structure
//! prediction model.
//!
//! ```ignore
//! use ferritin_featurizers::{generate_all, msa_feature_generators, Batch, FeatureConfig};
//!
//! let generators = msa_feature_generators(&FeatureConfig::default())?;
//! let features = generate_all(&generators, &batch)?;
//! let profile = &features["msa_profile"].data; // [batch, tokens, 32]
//! ```
pub mod base;
pub mod batch;
pub mod config;
pub mod error;
pub mod generators;
pub mod utilities;

pub use base::{EncodingType, Feature, FeatureGenerator, FeatureSpec, FeatureType, Featurize};
pub use batch::{fields, Batch};
pub use config::FeatureConfig;
pub use error::{FeatureError, Result};
pub use generators::{
    generate_all, msa_feature_generators, BoxedGenerator, IsPairedMsaGenerator,
    MsaDataSourceGenerator, MsaDeletionMeanGenerator, MsaDeletionValueGenerator,
    MsaFeatureGenerator, MsaHasDeletionGenerator, MsaProfileGenerator,
};
