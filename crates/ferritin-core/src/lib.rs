//! ferritin-core
//!
//! Shared vocabularies for MSA featurization: the residue type ordering used
//! for tokenized alignments, the MSA data sources and the species sentinel.
pub mod info;

pub use info::constants::{ResidueType, NUM_RESIDUE_TYPES};
pub use info::msa::{MsaDataSource, NUM_MSA_DATA_SOURCES, UNKNOWN_SPECIES};
