// src/math/gaussian.rs

use nalgebra::{Matrix2, Vector2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::math::error::MathError;

/// 2次元の多変量正規分布
///
/// 共分散行列は生成時に Cholesky 分解しておき、
/// サンプリングでは `mean + L * z` (z ~ N(0, I)) を返す。
#[derive(Debug, Clone, PartialEq)]
pub struct MultivariateNormal {
    mean: Vector2<f64>,
    covariance: Matrix2<f64>,
    cholesky_l: Matrix2<f64>,
}

impl MultivariateNormal {
    /// 多変量正規分布を生成する
    ///
    /// # 引数
    /// - `mean`: 平均ベクトル
    /// - `covariance`: 共分散行列（正定値であること）
    ///
    /// # 戻り値
    /// - 共分散が正定値でなければ `MathError::NotPositiveDefinite`
    pub fn new(mean: Vector2<f64>, covariance: Matrix2<f64>) -> Result<Self, MathError> {
        let cholesky = covariance
            .cholesky()
            .ok_or(MathError::NotPositiveDefinite {
                matrix: "measurement noise covariance",
            })?;
        Ok(MultivariateNormal {
            mean,
            covariance,
            cholesky_l: cholesky.l(),
        })
    }

    /// 平均ゼロの分布
    pub fn zero_mean(covariance: Matrix2<f64>) -> Result<Self, MathError> {
        Self::new(Vector2::zeros(), covariance)
    }

    pub fn mean(&self) -> &Vector2<f64> {
        &self.mean
    }

    pub fn covariance(&self) -> &Matrix2<f64> {
        &self.covariance
    }

    /// 1サンプルを引く。呼び出しごとに独立。
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2<f64> {
        let z = Vector2::new(rng.sample(StandardNormal), rng.sample(StandardNormal));
        self.mean + self.cholesky_l * z
    }
}
