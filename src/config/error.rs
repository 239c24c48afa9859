// src/config/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("時間刻みは正の有限値である必要があります: {0}")]
    InvalidTimeStep(f64),

    #[error("ステップ数が不足しています: {steps} (最低 {minimum})")]
    TooFewSteps { steps: usize, minimum: usize },

    #[error("{name} は正の値である必要があります: {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} は負にできません: {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("発射遅延 {delay} がステップ数 {steps} を超えています")]
    DelayExceedsSteps { delay: usize, steps: usize },

    #[error("設定ファイルを読み込めません: {0}")]
    Io(#[from] std::io::Error),

    #[error("設定ファイルの形式が不正です: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
