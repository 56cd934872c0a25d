//! MSA provenance vocabularies.
//!
//! Every aligned row carries the database it was retrieved from and the
//! species of the hit. Both are stored as small integers in the raw batch.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Species identifier reserved for hits whose species could not be resolved.
pub const UNKNOWN_SPECIES: i64 = 0;

/// Database an aligned sequence was retrieved from.
///
/// `None` is the last code and doubles as the value written for padded or
/// otherwise invalid rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MsaDataSource {
    BfdUniclust,
    Mgnify,
    Uniref90,
    Uniprot,
    None,
}

impl MsaDataSource {
    pub const fn to_int(&self) -> u8 {
        match self {
            Self::BfdUniclust => 0,
            Self::Mgnify => 1,
            Self::Uniref90 => 2,
            Self::Uniprot => 3,
            Self::None => 4,
        }
    }

    pub fn from_int(value: u8) -> Option<Self> {
        Self::iter().find(|source| source.to_int() == value)
    }
}

/// Size of the data source vocabulary, `max(code) + 1`.
pub const NUM_MSA_DATA_SOURCES: usize = MsaDataSource::None.to_int() as usize + 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_source_codes() {
        assert_eq!(NUM_MSA_DATA_SOURCES, 5);
        let max = MsaDataSource::iter().map(|s| s.to_int()).max();
        assert_eq!(max, Some(MsaDataSource::None.to_int()));
        assert_eq!(MsaDataSource::from_int(2), Some(MsaDataSource::Uniref90));
        assert_eq!(MsaDataSource::from_int(5), None);
    }

    #[test]
    fn test_source_names() {
        assert_eq!(
            MsaDataSource::from_str("bfd_uniclust").unwrap(),
            MsaDataSource::BfdUniclust
        );
        assert_eq!(MsaDataSource::Mgnify.to_string(), "mgnify");
        assert!(MsaDataSource::from_str("pdb70").is_err());
    }
}
