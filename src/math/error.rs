// src/math/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("{matrix} が正定値ではありません (Cholesky 分解に失敗)")]
    NotPositiveDefinite { matrix: &'static str },

    #[error("predict を呼ばずに update が呼ばれました")]
    UpdateWithoutPredict,

    #[error("{quantity} に有限でない値が含まれています")]
    NonFinite { quantity: &'static str },
}
