// src/config/parameters.rs

use serde::Deserialize;

use crate::math::kalman::CovarianceUpdate;

/// 時間刻みの設定
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimeParameters {
    pub dt: Option<f64>, // 時間刻み (s)。省略時は飛翔時間から算出
    pub steps: usize,    // 最大ステップ数
}

impl Default for TimeParameters {
    fn default() -> Self {
        TimeParameters { dt: None, steps: 500 }
    }
}

/// 目標（弾道ミサイル）のパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TargetParameters {
    pub launch_speed: f64,     // 初速 (m/s)
    pub launch_angle_deg: f64, // 発射角（度）
    pub gravity: f64,          // 重力加速度 (m/s²)
}

impl Default for TargetParameters {
    fn default() -> Self {
        TargetParameters {
            launch_speed: 1500.0,
            launch_angle_deg: 45.0,
            gravity: 9.81,
        }
    }
}

/// 迎撃ミサイルのパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InterceptorParameters {
    pub speed: f64,                 // 速さ (m/s)
    pub launch_delay: usize,        // 発射までの待機ステップ数
    pub initial_position: [f64; 2], // 発射位置 [x, y] (m)
}

impl Default for InterceptorParameters {
    fn default() -> Self {
        InterceptorParameters {
            speed: 1600.0,
            launch_delay: 50,
            initial_position: [200_000.0, 0.0],
        }
    }
}

/// カルマンフィルタのパラメータ
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FilterParameters {
    pub process_noise: f64,                // Q の対角成分
    pub measurement_noise: f64,            // R の対角成分 (m²)
    pub initial_covariance: f64,           // P0 の対角成分
    pub initial_state: Option<[f64; 4]>,   // 初期推定 [x, y, vx, vy]
    pub gravity_control: bool,             // 予測時に vy -= g dt を加えるか
    pub covariance_update: CovarianceUpdate,
}

impl Default for FilterParameters {
    fn default() -> Self {
        FilterParameters {
            process_noise: 0.01,
            measurement_noise: 100.0 * 100.0,
            initial_covariance: 500.0,
            initial_state: None,
            gravity_control: true,
            covariance_update: CovarianceUpdate::Standard,
        }
    }
}
