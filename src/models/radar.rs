// src/models/radar.rs

use nalgebra::{Matrix2, Vector2};
use rand::Rng;

use crate::math::error::MathError;
use crate::math::gaussian::MultivariateNormal;

/// 目標位置をガウス雑音付きで観測するレーダ
#[derive(Debug, Clone, PartialEq)]
pub struct Radar {
    noise: MultivariateNormal,
}

impl Radar {
    /// # 引数
    /// - `measurement_covariance`: 観測雑音の共分散行列 R
    pub fn new(measurement_covariance: Matrix2<f64>) -> Result<Self, MathError> {
        Ok(Radar {
            noise: MultivariateNormal::zero_mean(measurement_covariance)?,
        })
    }

    /// 各軸の分散が等しい R = variance * I のレーダ
    pub fn isotropic(variance: f64) -> Result<Self, MathError> {
        Self::new(Matrix2::identity() * variance)
    }

    pub fn measurement_covariance(&self) -> &Matrix2<f64> {
        self.noise.covariance()
    }

    /// 真の位置を中心とした正規分布から観測値を1つ引く
    pub fn measure<R: Rng + ?Sized>(&self, true_position: &Vector2<f64>, rng: &mut R) -> Vector2<f64> {
        true_position + self.noise.sample(rng)
    }
}
