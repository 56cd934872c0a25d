pub mod constants;
pub mod msa;
