//! # Constants
//!
//! Residue vocabulary used to tokenize alignments.
//!
//! ## Residue Types
//! Tokens are small unsigned integers indexing into a single ordering shared by
//! proteins and nucleic acids:
//!
//! - `0..=19` - the canonical amino acids
//! - `20` - unknown amino acid
//! - `21..=25` - RNA (A, G, C, U, unknown)
//! - `26..=30` - DNA (A, G, C, T, unknown)
//! - `31` - alignment gap
//!
//! The one-hot MSA feature and the MSA profile both have exactly
//! [`NUM_RESIDUE_TYPES`] classes.
//!
use strum::{Display, EnumIter, EnumString};

macro_rules! define_residue_types {
    ($($name:ident: $code3:expr, $code1:expr, $idx:expr),* $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
        pub enum ResidueType {
            $($name),*
        }

        impl ResidueType {
            pub const fn code3(&self) -> &'static str {
                match self {
                    $(Self::$name => $code3),*
                }
            }
            pub const fn code1(&self) -> char {
                match self {
                    $(Self::$name => $code1),*
                }
            }
            pub const fn index(&self) -> u8 {
                match self {
                    $(Self::$name => $idx),*
                }
            }
            pub fn from_index(value: u8) -> Option<Self> {
                match value {
                    $($idx => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    }
}

define_residue_types! {
    ALA: "ALA", 'A', 0,   ARG: "ARG", 'R', 1,   ASN: "ASN", 'N', 2,   ASP: "ASP", 'D', 3,
    CYS: "CYS", 'C', 4,   GLN: "GLN", 'Q', 5,   GLU: "GLU", 'E', 6,   GLY: "GLY", 'G', 7,
    HIS: "HIS", 'H', 8,   ILE: "ILE", 'I', 9,   LEU: "LEU", 'L', 10,  LYS: "LYS", 'K', 11,
    MET: "MET", 'M', 12,  PHE: "PHE", 'F', 13,  PRO: "PRO", 'P', 14,  SER: "SER", 'S', 15,
    THR: "THR", 'T', 16,  TRP: "TRP", 'W', 17,  TYR: "TYR", 'Y', 18,  VAL: "VAL", 'V', 19,
    UNK: "UNK", 'X', 20,
    A:   "A",   'A', 21,  G:   "G",   'G', 22,  C:   "C",   'C', 23,  U:   "U",   'U', 24,
    N:   "N",   'N', 25,
    DA:  "DA",  'A', 26,  DG:  "DG",  'G', 27,  DC:  "DC",  'C', 28,  DT:  "DT",  'T', 29,
    DN:  "DN",  'N', 30,
    GAP: "-",   '-', 31,
}

/// Number of classes in the residue vocabulary.
pub const NUM_RESIDUE_TYPES: usize = 32;

impl ResidueType {
    pub fn is_amino_acid(&self) -> bool {
        self.index() <= Self::UNK.index()
    }

    pub fn is_nucleotide(&self) -> bool {
        (Self::A.index()..=Self::DN.index()).contains(&self.index())
    }
}
