use candle_core::DType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeatureError>;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("batch is missing required field `{0}`")]
    MissingField(String),

    #[error("`{name}` must have rank {expected}, got shape {got:?}")]
    Rank {
        name: String,
        expected: usize,
        got: Vec<usize>,
    },

    #[error("`{name}` has dtype {got:?}, expected one of {expected:?}")]
    DType {
        name: String,
        expected: Vec<DType>,
        got: DType,
    },

    #[error("`{name}` trailing dimension is {got}, expected {expected}")]
    TrailingDim {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("shape mismatch: `{left}` is {left_shape:?} but `{right}` is {right_shape:?}")]
    ShapeMismatch {
        left: String,
        left_shape: Vec<usize>,
        right: String,
        right_shape: Vec<usize>,
    },

    #[error("`{name}` contains value {value}, valid range is 0..{limit}")]
    OutOfRange { name: String, value: i64, limit: usize },

    #[error("invalid feature configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}
