// src/simulation/error.rs

use thiserror::Error;

use crate::config::ConfigError;
use crate::math::MathError;
use crate::simulation::Phase;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("設定エラー: {0}")]
    Config(#[from] ConfigError),

    #[error("数値計算エラー: {0}")]
    Math(#[from] MathError),

    #[error("シミュレーションは終了済みです ({0:?})")]
    Finished(Phase),
}
