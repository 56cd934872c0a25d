//! Feature generator contract.
//!
//! A generator reads named fields out of a [`Batch`], runs a small numeric
//! transform on them and hands the raw tensor to its [`FeatureSpec`], which
//! applies the encoding. `FeatureSpec` is the only place encoding and masking are
//! implemented; the individual generators never one-hot anything themselves.
use crate::batch::Batch;
use crate::error::{FeatureError, Result};
use crate::utilities::check_class_range;
use candle_core::{DType, Tensor};
use candle_nn::encoding::one_hot;
use strum::{Display, EnumString};
use tracing::debug;

/// Which axis layout a feature lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    /// `[batch, tokens, channels]`
    Token,
    /// `[batch, depth, tokens, channels]`
    Msa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EncodingType {
    OneHot,
    Identity,
}

/// Static declaration attached to every generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    ty: FeatureType,
    encoding: EncodingType,
    can_mask: bool,
    num_classes: usize,
    mult: usize,
}

impl FeatureSpec {
    pub const fn one_hot(ty: FeatureType, num_classes: usize) -> Self {
        Self {
            ty,
            encoding: EncodingType::OneHot,
            can_mask: false,
            num_classes,
            mult: 1,
        }
    }

    pub const fn identity(ty: FeatureType, num_classes: usize) -> Self {
        Self {
            ty,
            encoding: EncodingType::Identity,
            can_mask: false,
            num_classes,
            mult: 1,
        }
    }

    pub const fn maskable(mut self) -> Self {
        self.can_mask = true;
        self
    }

    pub const fn with_mult(mut self, mult: usize) -> Self {
        self.mult = mult;
        self
    }

    pub fn feature_type(&self) -> FeatureType {
        self.ty
    }

    pub fn encoding_kind(&self) -> EncodingType {
        self.encoding
    }

    pub fn class_count(&self) -> usize {
        self.num_classes
    }

    pub fn is_maskable(&self) -> bool {
        self.can_mask
    }

    pub fn mult(&self) -> usize {
        self.mult
    }

    /// Channels per multiplier slot of a one-hot feature. Maskable features
    /// reserve index `num_classes` for the mask.
    pub fn one_hot_width(&self) -> usize {
        self.num_classes + usize::from(self.can_mask)
    }

    /// Apply the declared encoding to a raw generator output.
    ///
    /// One-hot inputs are integer codes whose trailing dimension is `mult`;
    /// the output trailing dimension is `mult * one_hot_width()`. Identity
    /// inputs are passed through as `f32`.
    pub fn finalize(&self, name: &str, raw: Tensor) -> Result<Feature> {
        let data = match self.encoding {
            EncodingType::OneHot => self.encode_one_hot(name, &raw)?,
            EncodingType::Identity => raw.to_dtype(DType::F32)?,
        };
        Ok(Feature {
            name: name.to_string(),
            ty: self.ty,
            encoding: self.encoding,
            num_classes: self.num_classes,
            can_mask: self.can_mask,
            mult: self.mult,
            data,
        })
    }

    fn encode_one_hot(&self, name: &str, raw: &Tensor) -> Result<Tensor> {
        let mut dims = raw.dims().to_vec();
        let trailing = dims.last().copied().unwrap_or(0);
        if trailing != self.mult {
            return Err(FeatureError::TrailingDim {
                name: name.to_string(),
                expected: self.mult,
                got: trailing,
            });
        }
        let width = self.one_hot_width();
        check_class_range(name, raw, width)?;
        let encoded = one_hot(raw.to_dtype(DType::U32)?, width, 1f32, 0f32)?;
        if let Some(last) = dims.last_mut() {
            *last = self.mult * width;
        }
        Ok(encoded.reshape(dims)?)
    }

    /// Replace raw codes with the mask index `num_classes` wherever `hide` is
    /// non-zero. Only maskable one-hot features have a slot for it.
    pub fn mask(&self, raw: &Tensor, hide: &Tensor) -> Result<Tensor> {
        if !self.can_mask || self.encoding != EncodingType::OneHot {
            return Err(FeatureError::Config(format!(
                "cannot mask a {} feature declared with can_mask={}",
                self.encoding, self.can_mask
            )));
        }
        let sentinel =
            Tensor::full(self.num_classes as u32, raw.dims(), raw.device())?.to_dtype(raw.dtype())?;
        Ok(hide.where_cond(&sentinel, raw)?)
    }
}

/// A finalized feature, ready to be collected into the model inputs.
#[derive(Debug, Clone)]
pub struct Feature {
    pub name: String,
    pub ty: FeatureType,
    pub encoding: EncodingType,
    pub num_classes: usize,
    pub can_mask: bool,
    pub mult: usize,
    pub data: Tensor,
}

pub trait FeatureGenerator {
    /// Fields pulled out of the batch for [`FeatureGenerator::generate_raw`].
    type Inputs;

    fn name(&self) -> &'static str;

    fn spec(&self) -> &FeatureSpec;

    fn get_input_kwargs_from_batch(&self, batch: &Batch) -> Result<Self::Inputs>;

    /// The numeric transform, before encoding.
    fn generate_raw(&self, inputs: Self::Inputs) -> Result<Tensor>;

    fn generate(&self, batch: &Batch) -> Result<Feature> {
        let inputs = self.get_input_kwargs_from_batch(batch)?;
        let raw = self.generate_raw(inputs)?;
        debug!(feature = self.name(), dims = ?raw.dims(), "generated raw feature");
        self.spec().finalize(self.name(), raw)
    }
}

/// Object safe view of a [`FeatureGenerator`].
pub trait Featurize {
    fn feature_name(&self) -> &'static str;
    fn feature_spec(&self) -> &FeatureSpec;
    fn featurize(&self, batch: &Batch) -> Result<Feature>;
}

impl<G: FeatureGenerator> Featurize for G {
    fn feature_name(&self) -> &'static str {
        self.name()
    }

    fn feature_spec(&self) -> &FeatureSpec {
        self.spec()
    }

    fn featurize(&self, batch: &Batch) -> Result<Feature> {
        self.generate(batch)
    }
}
