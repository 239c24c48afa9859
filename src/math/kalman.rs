// src/math/kalman.rs

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};
use serde::Deserialize;

use crate::math::error::MathError;

/// 共分散更新の形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CovarianceUpdate {
    /// P = (I - K H) P
    #[default]
    Standard,
    /// P = (I - K H) P (I - K H)^T + K R K^T
    Joseph,
}

/// 線形カルマンフィルタの構成
///
/// 状態は `[x, y, vx, vy]`、観測は `[x, y]`。
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanConfig {
    pub dt: f64,
    pub process_noise: f64,     // Q の対角成分
    pub measurement_noise: f64, // R の対角成分
    pub initial_state: Vector4<f64>,
    pub initial_covariance: f64, // P0 の対角成分
    pub control: Vector4<f64>,   // 1ステップごとに加える制御入力
    pub covariance_update: CovarianceUpdate,
}

/// 位置・速度を推定する 4 状態カルマンフィルタ
#[derive(Debug, Clone, PartialEq)]
pub struct KalmanFilter {
    x: Vector4<f64>,
    p: Matrix4<f64>,
    f: Matrix4<f64>,
    h: Matrix2x4<f64>,
    q: Matrix4<f64>,
    r: Matrix2<f64>,
    control: Vector4<f64>,
    covariance_update: CovarianceUpdate,
    predicted: bool,
    last_gain: Option<Matrix4x2<f64>>,
    last_innovation: Option<Vector2<f64>>,
}

/// 1ステップ分の自由飛行を表す状態遷移行列
pub fn transition_matrix(dt: f64) -> Matrix4<f64> {
    let mut f = Matrix4::identity();
    // 位置 += 速度 * dt
    f[(0, 2)] = dt;
    f[(1, 3)] = dt;
    f
}

/// 状態から位置成分を取り出す観測行列
pub fn observation_matrix() -> Matrix2x4<f64> {
    Matrix2x4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0,
    )
}

/// 重力による鉛直速度の減少 (vy -= g * dt)
pub fn gravity_control(g: f64, dt: f64) -> Vector4<f64> {
    Vector4::new(0.0, 0.0, 0.0, -g * dt)
}

impl KalmanFilter {
    pub fn new(config: &KalmanConfig) -> Self {
        KalmanFilter {
            x: config.initial_state,
            p: Matrix4::identity() * config.initial_covariance,
            f: transition_matrix(config.dt),
            h: observation_matrix(),
            q: Matrix4::identity() * config.process_noise,
            r: Matrix2::identity() * config.measurement_noise,
            control: config.control,
            covariance_update: config.covariance_update,
            predicted: false,
            last_gain: None,
            last_innovation: None,
        }
    }

    /// 予測ステップ
    ///
    /// x = F x + u、P = F P F^T + Q
    pub fn predict(&mut self) {
        self.x = self.f * self.x + self.control;
        self.p = self.f * self.p * self.f.transpose() + self.q;
        self.predicted = true;
    }

    /// 更新ステップ
    ///
    /// # 引数
    /// - `z`: 観測値 `[x, y]`
    ///
    /// # 戻り値
    /// - イノベーション共分散が正定値でなければ `MathError::NotPositiveDefinite`
    /// - 直前に `predict` が呼ばれていなければ `MathError::UpdateWithoutPredict`
    pub fn update(&mut self, z: &Vector2<f64>) -> Result<(), MathError> {
        if !self.predicted {
            return Err(MathError::UpdateWithoutPredict);
        }
        if !(z[0].is_finite() && z[1].is_finite()) {
            return Err(MathError::NonFinite {
                quantity: "observation",
            });
        }

        // イノベーションとその共分散 S = H P H^T + R
        let innovation = z - self.h * self.x;
        let s = self.h * self.p * self.h.transpose() + self.r;
        let s_chol = s.cholesky().ok_or(MathError::NotPositiveDefinite {
            matrix: "innovation covariance",
        })?;

        // K = P H^T S^-1。S と P は対称なので K^T = S^-1 H P を解く
        let gain: Matrix4x2<f64> = s_chol.solve(&(self.h * self.p)).transpose();

        let x = self.x + gain * innovation;
        let i_kh = Matrix4::identity() - gain * self.h;
        let p = match self.covariance_update {
            CovarianceUpdate::Standard => i_kh * self.p,
            CovarianceUpdate::Joseph => {
                i_kh * self.p * i_kh.transpose() + gain * self.r * gain.transpose()
            }
        };
        // 丸め誤差による非対称性を除去
        let p = (p + p.transpose()) * 0.5;

        if x.iter().any(|v| !v.is_finite()) {
            return Err(MathError::NonFinite { quantity: "state" });
        }
        if p.iter().any(|v| !v.is_finite()) {
            return Err(MathError::NonFinite {
                quantity: "covariance",
            });
        }

        self.x = x;
        self.p = p;
        self.last_gain = Some(gain);
        self.last_innovation = Some(innovation);
        self.predicted = false;
        Ok(())
    }

    pub fn state(&self) -> &Vector4<f64> {
        &self.x
    }

    pub fn covariance(&self) -> &Matrix4<f64> {
        &self.p
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x[0], self.x[1])
    }

    pub fn velocity(&self) -> Vector2<f64> {
        Vector2::new(self.x[2], self.x[3])
    }

    pub fn last_gain(&self) -> Option<&Matrix4x2<f64>> {
        self.last_gain.as_ref()
    }

    pub fn last_innovation(&self) -> Option<&Vector2<f64>> {
        self.last_innovation.as_ref()
    }

    pub fn transition(&self) -> &Matrix4<f64> {
        &self.f
    }

    pub fn observation(&self) -> &Matrix2x4<f64> {
        &self.h
    }
}
