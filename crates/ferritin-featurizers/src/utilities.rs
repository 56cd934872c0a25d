//! Tensor helpers shared by the generators.
//!
//! The `check_*` functions are the typed boundary: every generator validates
//! its inputs with them before doing any arithmetic.
use crate::error::{FeatureError, Result};
use candle_core::{DType, Tensor};
use std::f32::consts::PI;

/// Dtypes accepted for boolean masks. Candle has no bool dtype.
pub const MASK_DTYPES: &[DType] = &[DType::U8];
/// Dtypes accepted for small non-negative integer grids (tokens, deletions, sources).
pub const UINT_DTYPES: &[DType] = &[DType::U8, DType::U32];
/// Dtypes accepted for identifiers that may be large (species).
pub const INT_DTYPES: &[DType] = &[DType::I64, DType::U32];

/// Validate a `[batch, depth, tokens]` grid and return its dims.
pub fn check_msa_grid(
    name: &str,
    tensor: &Tensor,
    dtypes: &[DType],
) -> Result<(usize, usize, usize)> {
    if tensor.rank() != 3 {
        return Err(FeatureError::Rank {
            name: name.to_string(),
            expected: 3,
            got: tensor.dims().to_vec(),
        });
    }
    if !dtypes.contains(&tensor.dtype()) {
        return Err(FeatureError::DType {
            name: name.to_string(),
            expected: dtypes.to_vec(),
            got: tensor.dtype(),
        });
    }
    Ok(tensor.dims3()?)
}

pub fn check_same_shape(left: &str, a: &Tensor, right: &str, b: &Tensor) -> Result<()> {
    if a.dims() != b.dims() {
        return Err(FeatureError::ShapeMismatch {
            left: left.to_string(),
            left_shape: a.dims().to_vec(),
            right: right.to_string(),
            right_shape: b.dims().to_vec(),
        });
    }
    Ok(())
}

/// Validate a `[batch, depth, tokens]` mask whose values are all 0 or 1.
pub fn check_msa_mask(name: &str, tensor: &Tensor) -> Result<(usize, usize, usize)> {
    let dims = check_msa_grid(name, tensor, MASK_DTYPES)?;
    check_class_range(name, tensor, 2)?;
    Ok(dims)
}

/// Every value of an integer tensor must lie in `0..limit`.
pub fn check_class_range(name: &str, tensor: &Tensor, limit: usize) -> Result<()> {
    let values = tensor.to_dtype(DType::I64)?.flatten_all()?.to_vec1::<i64>()?;
    match values.into_iter().find(|&v| v < 0 || v as usize >= limit) {
        Some(value) => Err(FeatureError::OutOfRange {
            name: name.to_string(),
            value,
            limit,
        }),
        None => Ok(()),
    }
}

/// Append a trailing singleton dimension.
pub fn unsqueeze_last(tensor: &Tensor) -> Result<Tensor> {
    Ok(tensor.unsqueeze(tensor.rank())?)
}

/// `sum(mask * value, dim) / max(sum(mask, dim), 1)`
///
/// Positions where the mask is empty along `dim` come out as zero.
pub fn masked_mean(mask: &Tensor, value: &Tensor, dim: usize) -> Result<Tensor> {
    let mask = mask.ne(0f64)?.to_dtype(value.dtype())?;
    let numerator = (value * &mask)?.sum(dim)?;
    let denominator = mask.sum(dim)?.maximum(1f64)?;
    Ok((numerator / denominator)?)
}

/// s(d) = 2 / pi * arctan(d / 3)
pub fn scale_deletion(count: f32) -> f32 {
    2.0 / PI * (count / 3.0).atan()
}

/// Elementwise [`scale_deletion`] over a deletion count tensor, as `f32`.
pub fn scale_deletions(deletions: &Tensor) -> Result<Tensor> {
    // candle has no arctan kernel
    let scaled: Vec<f32> = deletions
        .to_dtype(DType::F32)?
        .flatten_all()?
        .to_vec1::<f32>()?
        .into_iter()
        .map(scale_deletion)
        .collect();
    Ok(Tensor::from_vec(scaled, deletions.dims(), deletions.device())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_scale_deletion_fixed_points() {
        assert_eq!(scale_deletion(0.0), 0.0);
        assert!((scale_deletion(3.0) - 0.5).abs() < 1e-6);
        assert!((scale_deletion(1.0) - 0.204_833).abs() < 1e-4);
    }

    #[test]
    fn test_scale_deletion_monotone_and_bounded() {
        let mut previous = scale_deletion(0.0);
        for d in 1..=255u8 {
            let current = scale_deletion(d as f32);
            assert!(current > previous);
            assert!(current < 1.0);
            previous = current;
        }
    }

    #[test]
    fn test_masked_mean_empty_mask_is_zero() -> Result<()> {
        let device = Device::Cpu;
        let mask = Tensor::new(&[[[1u8, 0], [1, 0], [0, 0]]], &device)?;
        let value = Tensor::new(&[[[2f32, 7.], [4., 9.], [100., 5.]]], &device)?;
        let mean = masked_mean(&mask, &value, 1)?;
        assert_eq!(mean.to_vec2::<f32>()?, vec![vec![3.0, 0.0]]);
        Ok(())
    }

    #[test]
    fn test_check_msa_grid() -> Result<()> {
        let device = Device::Cpu;
        let grid = Tensor::zeros((2, 3, 4), DType::U8, &device)?;
        assert_eq!(check_msa_grid("grid", &grid, UINT_DTYPES)?, (2, 3, 4));

        let flat = Tensor::zeros((3, 4), DType::U8, &device)?;
        assert!(matches!(
            check_msa_grid("flat", &flat, UINT_DTYPES),
            Err(FeatureError::Rank { expected: 3, .. })
        ));

        let floats = Tensor::zeros((2, 3, 4), DType::F32, &device)?;
        assert!(matches!(
            check_msa_grid("floats", &floats, UINT_DTYPES),
            Err(FeatureError::DType { got: DType::F32, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_masked_mean_counts_each_row_once() -> Result<()> {
        let device = Device::Cpu;
        let mask = Tensor::new(&[[[3u8], [1]]], &device)?;
        let value = Tensor::new(&[[[2f32], [4.]]], &device)?;
        let mean = masked_mean(&mask, &value, 1)?;
        assert_eq!(mean.flatten_all()?.to_vec1::<f32>()?, vec![3.0]);
        Ok(())
    }

    #[test]
    fn test_check_msa_mask_rejects_non_binary() -> Result<()> {
        let device = Device::Cpu;
        let mask = Tensor::new(&[[[1u8, 0], [0, 1]]], &device)?;
        assert_eq!(check_msa_mask("mask", &mask)?, (1, 2, 2));

        let weighted = Tensor::new(&[[[2u8], [1]]], &device)?;
        assert!(matches!(
            check_msa_mask("mask", &weighted),
            Err(FeatureError::OutOfRange { value: 2, limit: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_check_class_range() -> Result<()> {
        let codes = Tensor::new(&[[[0u8, 4, 5]]], &Device::Cpu)?;
        assert!(check_class_range("codes", &codes, 6).is_ok());
        assert!(matches!(
            check_class_range("codes", &codes, 5),
            Err(FeatureError::OutOfRange { value: 5, limit: 5, .. })
        ));
        Ok(())
    }
}
